//! Unsaved changes tracking.
//!
//! Armed by each successful load. The first story edit afterwards raises
//! the pending changes flag and disarms it; saving, leaving the page or
//! logging out clears the flag and keeps it disarmed until the next load.

use crate::engine::{next_action, Context};
use geostory_editor::selectors::has_pending_changes;
use geostory_editor::Action;
use tokio::sync::broadcast;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut armed = false;

    while let Some(action) = next_action(&mut actions).await {
        match &action {
            Action::GeostoryLoaded { .. } => armed = true,
            Action::StorySaved { .. } | Action::LocationChange { .. } | Action::Logout => {
                armed = false;
                if ctx.read(|state| has_pending_changes(state.story.state())) {
                    ctx.emit(Action::SetPendingChanges { value: false });
                }
            }
            action if armed && action.is_story_edit() => {
                armed = false;
                tracing::debug!("story has unsaved changes");
                ctx.emit(Action::SetPendingChanges { value: true });
            }
            _ => {}
        }
    }
}
