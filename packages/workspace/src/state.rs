use crate::media::MediaEditorState;
use geostory_editor::{Action, EditorError, StoryStore};
use serde::Serialize;

/// Where the story load is at.
///
/// `Idle → Loading → Loaded | Failed`; any load intent goes back to
/// `Loading`, whatever the current phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading {
        id: String,
    },
    Loaded {
        id: String,
    },
    Failed {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message_id: Option<String>,
    },
}

impl LoadPhase {
    /// Id of the story last asked for
    pub fn story_id(&self) -> Option<&str> {
        match self {
            LoadPhase::Idle => None,
            LoadPhase::Loading { id } | LoadPhase::Loaded { id } | LoadPhase::Failed { id, .. } => Some(id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadPhase::Loading { .. })
    }

    fn reduce(&mut self, action: &Action) {
        let next = match (&*self, action) {
            (_, Action::LoadGeostory { id }) => LoadPhase::Loading { id: id.clone() },
            (_, Action::GeostoryLoaded { id }) => LoadPhase::Loaded { id: id.clone() },
            (LoadPhase::Loading { id }, Action::LoadGeostoryError { message_id }) => LoadPhase::Failed {
                id: id.clone(),
                message_id: Some(message_id.clone()),
            },
            // finished without a story nor an error: unusable payload
            (LoadPhase::Loading { id }, Action::LoadingGeostory { value: false, name }) if name == "loading" => {
                LoadPhase::Failed {
                    id: id.clone(),
                    message_id: None,
                }
            }
            _ => return,
        };
        tracing::debug!(from = ?self, to = ?next, "load phase");
        *self = next;
    }
}

/// Who is logged in and where the user is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: Option<String>,
    pub pathname: String,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Creating a story rather than opening one
    pub fn is_new_story_route(&self) -> bool {
        self.pathname.contains("newgeostory")
    }

    fn reduce(&mut self, action: &Action) {
        match action {
            Action::LoginSuccess { user } => self.user = Some(user.clone()),
            Action::Logout => self.user = None,
            Action::LocationChange { pathname } => self.pathname = pathname.clone(),
            _ => {}
        }
    }
}

/// Everything the engine reduces actions into
#[derive(Debug, Default)]
pub struct EngineState {
    pub story: StoryStore,
    pub session: Session,
    pub media: MediaEditorState,
    pub phase: LoadPhase,
}

impl EngineState {
    pub fn new(story: StoryStore) -> Self {
        Self {
            story,
            ..Self::default()
        }
    }

    /// Reduce into every part; a malformed story path leaves all of them untouched
    pub fn reduce(&mut self, action: &Action) -> Result<(), EditorError> {
        self.story.dispatch(action)?;
        self.session.reduce(action);
        self.media.reduce(action);
        self.phase.reduce(action);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geostory_common::value;

    #[test]
    fn test_load_phase_transitions() {
        let mut state = EngineState::default();
        assert_eq!(state.phase.story_id(), None);

        state.reduce(&Action::load("a")).unwrap();
        assert!(state.phase.is_loading());
        state.reduce(&Action::GeostoryLoaded { id: "a".into() }).unwrap();
        state.reduce(&Action::loading(false, "loading")).unwrap();
        assert_eq!(state.phase, LoadPhase::Loaded { id: "a".into() });

        state.reduce(&Action::load("b")).unwrap();
        state
            .reduce(&Action::LoadGeostoryError {
                message_id: "geostory.errors.loading.geostoryDoesNotExist".into(),
            })
            .unwrap();
        assert_eq!(
            state.phase,
            LoadPhase::Failed {
                id: "b".into(),
                message_id: Some("geostory.errors.loading.geostoryDoesNotExist".into())
            }
        );
    }

    #[test]
    fn test_load_without_story_fails_silently() {
        let mut state = EngineState::default();
        state.reduce(&Action::load("a")).unwrap();
        state.reduce(&Action::loading(false, "saving")).unwrap();
        assert!(state.phase.is_loading());
        state.reduce(&Action::loading(false, "loading")).unwrap();
        assert_eq!(
            state.phase,
            LoadPhase::Failed {
                id: "a".into(),
                message_id: None
            }
        );
    }

    #[test]
    fn test_session() {
        let mut state = EngineState::default();
        state.reduce(&Action::LoginSuccess { user: "nina".into() }).unwrap();
        assert!(state.session.is_logged_in());
        state
            .reduce(&Action::LocationChange {
                pathname: "/geostory/newgeostory".into(),
            })
            .unwrap();
        assert!(state.session.is_new_story_route());
        state.reduce(&Action::Logout).unwrap();
        assert!(!state.session.is_logged_in());
    }

    #[test]
    fn test_bad_path_leaves_state_untouched() {
        let mut state = EngineState::new(StoryStore::from_story(value!({"sections": []})));
        assert!(state.reduce(&Action::remove("sections[")).is_err());
        assert_eq!(state.story.current_story(), &value!({"sections": []}));
    }
}
