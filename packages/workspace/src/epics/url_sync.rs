//! Keep the route on the section (and column) the reader is looking at.
//!
//! Only while `updateUrlOnScroll` is on. Page changes are debounced so
//! scrolling through several sections replaces the route once; leaving the
//! page or loading another story drops a pending update.

use crate::engine::{next_action, Context};
use crate::state::EngineState;
use crate::timer::Debouncer;
use geostory_editor::selectors::geostory_id_selector;
use geostory_editor::Action;
use tokio::sync::broadcast;

pub(crate) async fn run(ctx: Context, mut actions: broadcast::Receiver<Action>) {
    let mut update = Debouncer::new(ctx.config.url_update_debounce());

    while let Some(action) = next_action(&mut actions).await {
        match action {
            Action::UpdateCurrentPage { .. } => {
                if !ctx.read(|state| state.story.state().update_url_on_scroll) {
                    continue;
                }
                let ctx = ctx.clone();
                update.call(async move {
                    if let Some(route) = ctx.read(page_route) {
                        tracing::debug!(route = %route, "following reader position");
                        ctx.services.router.replace(&route);
                    }
                });
            }
            Action::LocationChange { .. } | Action::LoadGeostory { .. } => update.cancel(),
            _ => {}
        }
    }
}

/// `/geostory/<id>/section/<sectionId>[/column/<columnId>]`
fn page_route(state: &EngineState) -> Option<String> {
    let story = state.story.state();
    let id = geostory_id_selector(story).or_else(|| state.phase.story_id())?;
    let section = story.current_page.section_id.as_deref()?;

    let mut route = format!("/geostory/{}/section/{}", id, section);
    if let Some(column) = story.current_page.columns.get(section) {
        route.push_str(&format!("/column/{}", column));
    }
    Some(route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostory_common::value;
    use geostory_editor::StoryStore;

    #[test]
    fn test_page_route() {
        let mut state = EngineState::new(StoryStore::from_story(value!({
            "sections": [{"id": "imm", "type": "immersive", "contents": [{"id": "c1"}]}]
        })));
        assert_eq!(page_route(&state), None);

        state.reduce(&Action::load("sample")).unwrap();
        state.story.update_current_page(Some("imm"), None);
        assert_eq!(page_route(&state).as_deref(), Some("/geostory/sample/section/imm"));

        state.story.update_current_page(None, Some("c1"));
        assert_eq!(
            page_route(&state).as_deref(),
            Some("/geostory/sample/section/imm/column/c1")
        );
    }
}
