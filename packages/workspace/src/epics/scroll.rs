//! Bring a freshly added element into view.
//!
//! The element is usually not rendered yet when the add is committed, so
//! the lookup is retried on a fixed delay and abandoned without error after
//! the configured number of attempts. A later add replaces the pending one.

use crate::engine::{next_action, Context};
use crate::services::ScrollOptions;
use crate::timer::SwitchTask;
use geostory_editor::Action;
use tokio::sync::broadcast;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut pending = SwitchTask::new();
    while let Some(action) = next_action(&mut actions).await {
        if let Action::Add { element, .. } = &action {
            if let Some(id) = element.id() {
                pending.start(scroll_into_view(ctx.clone(), id.to_string()));
            }
        }
    }
}

async fn scroll_into_view(ctx: Context, id: String) {
    let attempts = ctx.config.scroll_max_attempts;
    let delay = ctx.config.scroll_retry_delay();
    let dom = ctx.services.dom.clone();

    for attempt in 1..=attempts {
        if dom.element_exists(&id) {
            dom.scroll_to_element(&id, ScrollOptions::default());
            tracing::debug!(id = %id, attempt, "scrolled to added content");
            return;
        }
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }
    tracing::debug!(id = %id, attempts, "added content never mounted");
}
