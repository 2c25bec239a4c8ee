//! Story loading.
//!
//! A numeric id is a stored resource, anything else names a static story
//! configuration. The store is emptied before fetching so nothing of the
//! previous story stays on screen, and a newer load intent aborts the
//! one in flight.

use crate::engine::{next_action, Context};
use crate::services::{Level, Notification, ServiceError};
use crate::timer::SwitchTask;
use geostory_common::Value;
use geostory_editor::{Action, StoryResource};
use tokio::sync::broadcast;

const LOADING_ERROR_TITLE: &str = "geostory.errors.loading.title";

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut current = SwitchTask::new();
    while let Some(action) = next_action(&mut actions).await {
        if let Action::LoadGeostory { id } = action {
            tracing::info!(id = %id, "loading story");
            current.start(load_story(ctx.clone(), id));
        }
    }
}

/// Message id shown when a load fails
pub fn load_error_message(err: &ServiceError, logged_in: bool) -> &'static str {
    match err.status() {
        Some(403) if logged_in => "geostory.errors.loading.geostoryNotAccessible",
        Some(403) => "geostory.errors.loading.pleaseLogin",
        Some(404) => "geostory.errors.loading.geostoryDoesNotExist",
        _ => "geostory.errors.loading.unknownError",
    }
}

fn is_resource_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
}

/// Stories may come as JSON text
fn parse_payload(payload: Value) -> Result<Value, ServiceError> {
    if let Value::String(text) = &payload {
        return serde_json::from_str(text).map_err(|err| ServiceError::Payload(err.to_string()));
    }
    Ok(payload)
}

struct Fetched {
    story: Value,
    resource: Option<StoryResource>,
}

async fn fetch(ctx: &Context, id: &str) -> Result<Fetched, ServiceError> {
    if is_resource_id(id) {
        let stored = ctx.services.persistence.get_resource(id).await?;
        let resource = StoryResource {
            id: Some(id.to_string()),
            name: stored.name,
            description: stored.description,
            can_edit: stored.can_edit,
            can_delete: stored.can_delete,
        };
        Ok(Fetched {
            story: parse_payload(stored.data)?,
            resource: Some(resource),
        })
    } else {
        let payload = ctx.services.stories.fetch(id).await?;
        Ok(Fetched {
            story: parse_payload(payload)?,
            resource: None,
        })
    }
}

async fn load_story(ctx: Context, id: String) {
    ctx.emit(Action::loading(true, "loading"));
    ctx.emit(Action::set_current_story(Value::object()));

    match fetch(&ctx, &id).await {
        Ok(Fetched { story, resource }) if story.is_object() => {
            ctx.emit(Action::set_current_story(story));
            if let Some(resource) = resource {
                ctx.emit(Action::SetResource { resource });
            }
            ctx.emit(Action::GeostoryLoaded { id: id.clone() });
            tracing::info!(id = %id, "story loaded");
        }
        Ok(_) => tracing::warn!(id = %id, "story payload is not an object"),
        Err(err) => fail(&ctx, &id, &err),
    }

    ctx.emit(Action::loading(false, "loading"));
}

fn fail(ctx: &Context, id: &str, err: &ServiceError) {
    let (logged_in, new_story) = ctx.read(|state| {
        (
            state.session.is_logged_in(),
            state.session.is_new_story_route(),
        )
    });
    let message_id = load_error_message(err, logged_in);
    tracing::warn!(id, error = %err, message_id, "story load failed");

    ctx.emit(Action::LoadGeostoryError {
        message_id: message_id.to_string(),
    });
    ctx.services.notifier.notify(Notification {
        title: LOADING_ERROR_TITLE.to_string(),
        message: message_id.to_string(),
        level: Level::Error,
    });
    if err.status() == Some(403) && !logged_in && !new_story {
        ctx.services.notifier.prompt_login();
    }
}
