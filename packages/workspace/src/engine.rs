//! The engine: one owned story state, an action bus and the workflows
//! listening on it.
//!
//! `dispatch` reduces an action into the state and publishes it while still
//! holding the state lock, so every listener sees actions in the order they
//! were applied, and reads a state that already includes them.
//!
//! Post-effects of a story mutation run inside the same `dispatch`: their
//! follow-ups are computed against the documents before and after it,
//! reduced at once, and published right after the action that caused them.

use crate::config::EngineConfig;
use crate::epics;
use crate::media::{MediaEditorState, StoryHandle};
use crate::services::Services;
use crate::state::{EngineState, LoadPhase, Session};
use geostory_common::Value;
use geostory_editor::{Action, EditorError, Mutation, PostEffectEngine, StoryState, StoryStore};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("Engine stopped")]
    Stopped,
}

/// Shared handle the workflows run against
#[derive(Clone)]
pub(crate) struct Context {
    state: Arc<Mutex<EngineState>>,
    bus: broadcast::Sender<Action>,
    effects: Arc<PostEffectEngine>,
    pub(crate) services: Services,
    pub(crate) config: Arc<EngineConfig>,
}

impl Context {
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.bus.subscribe()
    }

    pub(crate) fn dispatch(&self, action: Action) -> Result<(), EngineError> {
        let action = action.with_element_id();
        let mut state = self.lock();
        let mut follow_ups = VecDeque::from(self.reduce(&mut state, &action)?);
        // no receiver only means no workflow is running
        let _ = self.bus.send(action);

        while let Some(follow_up) = follow_ups.pop_front() {
            tracing::info!(?follow_up, "removing emptied container");
            let action = Action::from(follow_up);
            match self.reduce(&mut state, &action) {
                Ok(more) => {
                    follow_ups.extend(more);
                    let _ = self.bus.send(action);
                }
                Err(err) => tracing::error!(error = %err, "follow-up mutation failed"),
            }
        }
        Ok(())
    }

    /// Reduce `action`, returning the follow-ups its mutation calls for
    fn reduce(&self, state: &mut EngineState, action: &Action) -> Result<Vec<Mutation>, EngineError> {
        let before = state.story.current_story().clone();
        state.reduce(action)?;

        let after = state.story.current_story();
        Ok(match action.mutation() {
            Some(mutation) if !after.same(&before) => self.effects.analyze(&mutation, &before, after),
            _ => vec![],
        })
    }

    /// Dispatch from a workflow, where there is nobody to return an error to
    pub(crate) fn emit(&self, action: Action) {
        if let Err(err) = self.dispatch(action) {
            tracing::error!(error = %err, "workflow dispatched an invalid action");
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&EngineState) -> R) -> R {
        f(&self.lock())
    }
}

impl StoryHandle for Context {
    fn story(&self) -> Value {
        self.read(|state| state.story.current_story().clone())
    }

    fn dispatch(&self, action: Action) {
        self.emit(action);
    }
}

/// Next action on the bus; `None` once the bus is gone
pub(crate) async fn next_action(actions: &mut broadcast::Receiver<Action>) -> Option<Action> {
    loop {
        match actions.recv().await {
            Ok(action) => return Some(action),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "workflow fell behind the action bus");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// Running engine.
///
/// Dropping it stops every workflow, like [`Engine::stop`].
pub struct Engine {
    ctx: Context,
    workflows: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Start the workflows on the current tokio runtime with an empty story
    pub fn start(config: EngineConfig, services: Services) -> Self {
        Self::with_store(config, services, StoryStore::new())
    }

    pub fn with_store(config: EngineConfig, services: Services, store: StoryStore) -> Self {
        let (bus, _) = broadcast::channel(config.bus_capacity.max(1));
        let ctx = Context {
            state: Arc::new(Mutex::new(EngineState::new(store))),
            bus,
            effects: Arc::new(PostEffectEngine::new()),
            services,
            config: Arc::new(config),
        };
        let workflows = epics::spawn_all(&ctx);
        tracing::info!(workflows = workflows.len(), "engine started");
        Self { ctx, workflows }
    }

    pub fn dispatch(&self, action: Action) -> Result<(), EngineError> {
        self.ctx.dispatch(action)
    }

    /// Every action dispatched from now on, in application order
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.ctx.subscribe()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.ctx.config
    }

    pub fn story(&self) -> Value {
        self.ctx.read(|state| state.story.current_story().clone())
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&StoryState) -> R) -> R {
        self.ctx.read(|state| f(state.story.state()))
    }

    pub fn load_phase(&self) -> LoadPhase {
        self.ctx.read(|state| state.phase.clone())
    }

    pub fn session(&self) -> Session {
        self.ctx.read(|state| state.session.clone())
    }

    pub fn media_editor(&self) -> MediaEditorState {
        self.ctx.read(|state| state.media.clone())
    }

    /// Load a story and wait until the load has finished, either way
    pub async fn load(&self, id: impl Into<String>) -> Result<LoadPhase, EngineError> {
        let mut actions = self.subscribe();
        self.dispatch(Action::load(id))?;
        loop {
            match next_action(&mut actions).await {
                Some(Action::LoadingGeostory { value: false, name }) if name == "loading" => {
                    return Ok(self.load_phase());
                }
                Some(_) => {}
                None => return Err(EngineError::Stopped),
            }
        }
    }

    /// Abort every workflow along with whatever it started
    pub fn stop(mut self) {
        self.abort_workflows();
    }

    fn abort_workflows(&mut self) {
        if self.workflows.is_empty() {
            return;
        }
        for workflow in self.workflows.drain(..) {
            workflow.abort();
        }
        tracing::debug!("engine stopped");
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.abort_workflows();
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("workflows", &self.workflows.len())
            .field("phase", &self.load_phase())
            .finish()
    }
}
