//! Saving the story to the persistence backend.
//!
//! A story without an id is created (and the route moves to it), one with
//! an id is updated. A failure is recorded in the store's save errors and
//! leaves the edited story as it is.

use crate::engine::{next_action, Context};
use crate::services::{Level, Notification, PersistedResource};
use geostory_common::{value, Value};
use geostory_editor::{Action, StoryResource};
use tokio::sync::broadcast;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    while let Some(action) = next_action(&mut actions).await {
        if let Action::SaveStory { resource } = action {
            save(&ctx, resource).await;
        }
    }
}

async fn save(ctx: &Context, resource: StoryResource) {
    ctx.emit(Action::loading(true, "saving"));

    let story = ctx.read(|state| state.story.current_story().to_json());
    let payload = PersistedResource {
        id: resource.id.clone(),
        data: Value::from(story.to_string()),
        name: resource.name.clone(),
        description: resource.description.clone(),
        can_edit: resource.can_edit,
        can_delete: resource.can_delete,
    };
    let created = resource.id.is_none();
    let saved = if created {
        ctx.services.persistence.create_resource(payload).await
    } else {
        ctx.services.persistence.update_resource(payload).await
    };

    match saved {
        Ok(id) => {
            tracing::info!(id = %id, created, "story saved");
            ctx.emit(Action::SetResource {
                resource: StoryResource {
                    id: Some(id.clone()),
                    ..resource
                },
            });
            ctx.emit(Action::StorySaved { id: id.clone() });
            ctx.emit(Action::GeostoryLoaded { id: id.clone() });
            ctx.services.notifier.notify(Notification {
                title: "saveDialog.saveSuccessTitle".to_string(),
                message: "saveDialog.saveSuccessMessage".to_string(),
                level: Level::Success,
            });
            if created {
                ctx.services.router.navigate(&format!("/geostory/{}", id));
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "story save failed");
            ctx.emit(Action::SaveGeostoryError {
                error: value!({"status": err.status(), "message": err.to_string()}),
            });
        }
    }

    ctx.emit(Action::loading(false, "saving"));
}
