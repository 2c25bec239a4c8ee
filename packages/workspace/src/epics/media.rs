//! Attaching media resources to story nodes.
//!
//! Adding a media content (or a section whose first column starts with
//! one) opens the media editor for that placeholder. Editing the media of
//! an existing content or background opens it on the current resource.
//! The next choice is written into the node; closing the editor without a
//! choice drops an unfilled placeholder.
//!
//! Only one pick is listened for at a time: a new add or a media edit
//! replaces the previous one.

use crate::engine::{next_action, Context};
use crate::media::GEOSTORY_SOURCE;
use geostory_common::{value, Value};
use geostory_editor::selectors::{resource_id_selector_creator, resources_selector};
use geostory_editor::{Action, MediaResource, UpdateMode};
use geostory_parser::parse;
use tokio::sync::broadcast;

const MEDIA: &str = "media";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pick {
    /// Freshly added media content, removed when nothing is chosen
    Placeholder { path: String },
    /// Content or background already in the story
    Existing { path: String },
}

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut pick: Option<Pick> = None;

    while let Some(action) = next_action(&mut actions).await {
        match action {
            Action::Add { path, element, .. } => {
                pick = placeholder_path(&path, &element).map(|path| Pick::Placeholder { path });
                if pick.is_some() {
                    ctx.emit(Action::ShowMediaEditor {
                        owner: GEOSTORY_SOURCE.to_string(),
                    });
                }
            }
            Action::EditMedia { path, owner } => {
                let current = match resource_id_selector_creator(&path) {
                    Ok(select) => ctx.read(|state| select(state.story.state())),
                    Err(err) => {
                        tracing::error!(path = %path, error = %err, "cannot edit media at malformed path");
                        continue;
                    }
                };
                ctx.emit(Action::ShowMediaEditor { owner });
                if let Some(id) = current {
                    ctx.emit(Action::SelectItem { id });
                }
                pick = Some(Pick::Existing { path });
            }
            Action::ChooseMedia { resource } => {
                if let Some(pick) = pick.take() {
                    choose(&ctx, pick, resource);
                }
            }
            Action::HideMediaEditor => {
                if let Some(Pick::Placeholder { path }) = pick.take() {
                    tracing::debug!(path = %path, "media editor closed, dropping placeholder");
                    ctx.emit(Action::remove(path));
                }
            }
            _ => {}
        }
    }
}

/// Path of the media node an added element brings, if it brings one
fn placeholder_path(add_path: &str, element: &Value) -> Option<String> {
    let id = element.id()?;
    let node = parse(add_path).ok()?.predicate("id", id);
    if element.node_type() == Some(MEDIA) {
        return Some(node.to_string());
    }

    let first = element
        .get("contents")?
        .get_index(0)?
        .get("contents")?
        .get_index(0)?;
    (first.node_type() == Some(MEDIA)).then(|| {
        node.child("contents")
            .index(0)
            .child("contents")
            .index(0)
            .to_string()
    })
}

fn choose(ctx: &Context, pick: Pick, resource: Option<MediaResource>) {
    let resource = resource.filter(|resource| !resource.id.is_empty());
    match (pick, resource) {
        (Pick::Placeholder { path } | Pick::Existing { path }, Some(resource)) => {
            let known = ctx.read(|state| {
                resources_selector(state.story.state())
                    .iter()
                    .any(|r| r.id() == Some(resource.id.as_str()))
            });
            if !known {
                ctx.emit(Action::AddResource {
                    id: resource.id.clone(),
                    media_type: resource.media_type,
                    data: resource.data.clone(),
                });
            }
            ctx.emit(Action::update(
                path,
                value!({"resourceId": resource.id, "type": resource.media_type.as_str()}),
                UpdateMode::Merge,
            ));
        }
        (Pick::Placeholder { path }, None) => {
            ctx.emit(Action::remove(path));
            ctx.emit(Action::HideMediaEditor);
        }
        (Pick::Existing { .. }, None) => {}
    }
}
