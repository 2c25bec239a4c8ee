//! Workflows reacting to dispatched actions.
//!
//! Each workflow is one task reading the action bus. Whatever it starts in
//! the background (a fetch, a retry loop, a timer) is owned by that task
//! and dies with it.

use crate::engine::Context;
use tokio::task::JoinHandle;

mod auth;
mod load;
mod media;
mod media_editor;
mod pending;
mod save;
mod scroll;
mod url_sync;

pub use load::load_error_message;

pub(crate) fn spawn_all(ctx: &Context) -> Vec<JoinHandle<()>> {
    vec![
        tokio::spawn(load::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(scroll::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(media::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(media_editor::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(pending::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(auth::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(save::run(ctx.clone(), ctx.subscribe())),
        tokio::spawn(url_sync::run(ctx.clone(), ctx.subscribe())),
    ]
}
