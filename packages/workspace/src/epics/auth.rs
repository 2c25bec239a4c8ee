//! Reload the story when the user logs in or out, so permission dependent
//! fields (can the story be edited, is it visible at all) are refreshed.

use crate::engine::{next_action, Context};
use crate::timer::Debouncer;
use geostory_editor::Action;
use tokio::sync::broadcast;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut reload = Debouncer::new(ctx.config.auth_reload_delay());

    while let Some(action) = next_action(&mut actions).await {
        match action {
            Action::LoginSuccess { .. } | Action::Logout => {
                let Some(id) = ctx.read(|state| state.phase.story_id().map(String::from)) else {
                    continue;
                };
                let ctx = ctx.clone();
                reload.call(async move {
                    tracing::info!(id = %id, "reloading story after authentication change");
                    ctx.emit(Action::load(id));
                });
            }
            Action::LocationChange { .. } => reload.cancel(),
            _ => {}
        }
    }
}
