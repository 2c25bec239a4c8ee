//! Story loading through the engine

mod common;

use common::Harness;
use geostory_common::{value, Value};
use geostory_editor::selectors::{can_edit_selector, geostory_id_selector, loading_selector};
use geostory_editor::{Action, StoryResource};
use geostory_workspace::{LoadPhase, PersistedResource};
use std::time::Duration;

const SAMPLE: &str = r#"{"title": "Sample", "sections": [{"id": "s1", "type": "title", "title": "Hello"}]}"#;

fn loading_failure(id: &str, message_id: &str) -> Vec<Action> {
    vec![
        Action::load(id),
        Action::loading(true, "loading"),
        Action::set_current_story(Value::object()),
        Action::LoadGeostoryError {
            message_id: message_id.to_string(),
        },
        Action::loading(false, "loading"),
    ]
}

#[tokio::test(start_paused = true)]
async fn test_load_static_story() {
    let mut harness = Harness::new();
    harness.stories.insert("sampleStory", Ok(Value::from(SAMPLE)));

    harness.dispatch(Action::load("sampleStory"));
    let actions = harness.settle().await;

    let story: Value = serde_json::from_str(SAMPLE).unwrap();
    assert_eq!(
        actions,
        vec![
            Action::load("sampleStory"),
            Action::loading(true, "loading"),
            Action::set_current_story(Value::object()),
            Action::set_current_story(story.clone()),
            Action::GeostoryLoaded {
                id: "sampleStory".into()
            },
            Action::loading(false, "loading"),
        ]
    );
    assert_eq!(harness.engine.story(), story);
    assert_eq!(
        harness.engine.load_phase(),
        LoadPhase::Loaded {
            id: "sampleStory".into()
        }
    );
    assert!(!harness.engine.with_state(loading_selector));
    assert!(harness.notifier.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_load_stored_resource() {
    let mut harness = Harness::new();
    harness.persistence.insert(
        "42",
        Ok(PersistedResource {
            data: Value::from(SAMPLE),
            name: Some("My story".into()),
            can_edit: true,
            ..PersistedResource::default()
        }),
    );

    harness.dispatch(Action::load("42"));
    let actions = harness.settle().await;

    assert!(actions.contains(&Action::SetResource {
        resource: StoryResource {
            id: Some("42".into()),
            name: Some("My story".into()),
            can_edit: true,
            ..StoryResource::default()
        }
    }));
    assert!(harness.engine.with_state(can_edit_selector));
    assert_eq!(
        harness.engine.with_state(|s| geostory_id_selector(s).map(String::from)),
        Some("42".to_string())
    );
    let title = harness
        .engine
        .story()
        .get("settings")
        .and_then(|s| s.get("storyTitle"))
        .cloned();
    assert_eq!(title, Some(value!("My story")));
}

#[tokio::test(start_paused = true)]
async fn test_load_failures_map_status_to_message() {
    let cases = [
        (404, false, "geostory.errors.loading.geostoryDoesNotExist", 0),
        (403, false, "geostory.errors.loading.pleaseLogin", 1),
        (403, true, "geostory.errors.loading.geostoryNotAccessible", 0),
        (500, false, "geostory.errors.loading.unknownError", 0),
    ];

    for (status, logged_in, message_id, prompts) in cases {
        let mut harness = Harness::new();
        harness.stories.insert("wrongStoryName", Err(status));
        if logged_in {
            harness.dispatch(Action::LoginSuccess { user: "nina".into() });
            harness.settle().await;
        }

        harness.dispatch(Action::load("wrongStoryName"));
        let actions = harness.settle().await;

        assert_eq!(actions, loading_failure("wrongStoryName", message_id), "status {}", status);
        assert_eq!(harness.notifier.messages(), vec![message_id.to_string()]);
        assert_eq!(harness.notifier.prompts(), prompts, "status {}", status);
        assert_eq!(
            harness.engine.load_phase(),
            LoadPhase::Failed {
                id: "wrongStoryName".into(),
                message_id: Some(message_id.into())
            }
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_login_prompt_on_new_story_route() {
    let mut harness = Harness::new();
    harness.persistence.insert("7", Err(403));
    harness.dispatch(Action::LocationChange {
        pathname: "/geostory/newgeostory".into(),
    });
    harness.settle().await;

    harness.dispatch(Action::load("7"));
    harness.settle().await;

    assert_eq!(
        harness.notifier.messages(),
        vec!["geostory.errors.loading.pleaseLogin".to_string()]
    );
    assert_eq!(harness.notifier.prompts(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_malformed_story_text_is_unknown_error() {
    let mut harness = Harness::new();
    harness
        .stories
        .insert("StoryWithError", Ok(Value::from(r#"{"sections":[{"type":'text'}]}"#)));

    harness.dispatch(Action::load("StoryWithError"));
    let actions = harness.settle().await;

    assert_eq!(
        actions,
        loading_failure("StoryWithError", "geostory.errors.loading.unknownError")
    );
}

#[tokio::test(start_paused = true)]
async fn test_payload_that_is_not_a_story_only_resets() {
    let mut harness = Harness::new();
    harness.stories.insert("bad", Ok(Value::from("false")));

    harness.dispatch(Action::load("bad"));
    let actions = harness.settle().await;

    assert_eq!(
        actions,
        vec![
            Action::load("bad"),
            Action::loading(true, "loading"),
            Action::set_current_story(Value::object()),
            Action::loading(false, "loading"),
        ]
    );
    assert!(harness.notifier.messages().is_empty());
    assert_eq!(
        harness.engine.load_phase(),
        LoadPhase::Failed {
            id: "bad".into(),
            message_id: None
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_load_resets_story_before_fetching() {
    let mut harness = Harness::with_story(value!({"sections": [{"id": "old"}]}));
    harness.stories.insert("slow", Ok(Value::from(SAMPLE)));
    harness.stories.delay("slow", Duration::from_secs(2));

    harness.dispatch(Action::load("slow"));
    harness.settle().await;
    assert_eq!(harness.engine.story(), Value::object());
    assert!(harness.engine.load_phase().is_loading());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(harness.engine.story().get("title"), Some(&value!("Sample")));
}

#[tokio::test(start_paused = true)]
async fn test_newer_load_supersedes_in_flight_one() {
    let mut harness = Harness::new();
    harness.stories.insert("slow", Ok(value!({"title": "Slow"})));
    harness.stories.delay("slow", Duration::from_secs(1));
    harness.stories.insert("fast", Ok(value!({"title": "Fast"})));

    harness.dispatch(Action::load("slow"));
    harness.settle().await;
    harness.dispatch(Action::load("fast"));
    tokio::time::sleep(Duration::from_secs(3)).await;

    assert_eq!(harness.engine.story(), value!({"title": "Fast"}));
    let actions = harness.settle().await;
    assert!(!actions.contains(&Action::set_current_story(value!({"title": "Slow"}))));
    assert_eq!(harness.engine.load_phase(), LoadPhase::Loaded { id: "fast".into() });
}

#[tokio::test(start_paused = true)]
async fn test_engine_load_waits_for_outcome() {
    let harness = Harness::new();
    harness.stories.insert("sampleStory", Ok(Value::from(SAMPLE)));

    let phase = harness.engine.load("sampleStory").await.unwrap();
    assert_eq!(phase, LoadPhase::Loaded { id: "sampleStory".into() });

    let phase = harness.engine.load("missing").await.unwrap();
    assert!(matches!(phase, LoadPhase::Failed { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_stop_closes_the_action_bus() {
    let Harness { engine, mut actions, .. } = Harness::new();

    engine.stop();

    assert!(matches!(
        actions.recv().await,
        Err(tokio::sync::broadcast::error::RecvError::Closed)
    ));
}
