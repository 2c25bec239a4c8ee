//! In-memory collaborators and an engine harness for workflow tests.
#![allow(dead_code)]

use async_trait::async_trait;
use geostory_common::Value;
use geostory_editor::{Action, StoryStore};
use geostory_workspace::{
    Dom, Engine, EngineConfig, MediaRegistry, Notification, Notifier, Persistence, PersistedResource, Router,
    ScrollOptions, ServiceError, Services, StaticStories,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::Instant;

#[derive(Default)]
pub struct FakePersistence {
    stored: Mutex<HashMap<String, Result<PersistedResource, u16>>>,
    pub saved: Mutex<Vec<PersistedResource>>,
    pub fail_saves: Mutex<Option<u16>>,
    next_id: AtomicU64,
}

impl FakePersistence {
    pub fn insert(&self, id: &str, resource: Result<PersistedResource, u16>) {
        self.stored.lock().unwrap().insert(id.to_string(), resource);
    }

    fn store(&self, resource: PersistedResource) -> Result<String, ServiceError> {
        if let Some(status) = *self.fail_saves.lock().unwrap() {
            return Err(ServiceError::Status(status));
        }
        let id = resource
            .id
            .clone()
            .unwrap_or_else(|| (100 + self.next_id.fetch_add(1, Ordering::SeqCst)).to_string());
        self.saved.lock().unwrap().push(resource);
        Ok(id)
    }
}

#[async_trait]
impl Persistence for FakePersistence {
    async fn create_resource(&self, resource: PersistedResource) -> Result<String, ServiceError> {
        self.store(resource)
    }

    async fn update_resource(&self, resource: PersistedResource) -> Result<String, ServiceError> {
        self.store(resource)
    }

    async fn get_resource(&self, id: &str) -> Result<PersistedResource, ServiceError> {
        match self.stored.lock().unwrap().get(id) {
            Some(Ok(resource)) => Ok(resource.clone()),
            Some(Err(status)) => Err(ServiceError::Status(*status)),
            None => Err(ServiceError::Status(404)),
        }
    }
}

#[derive(Default)]
pub struct FakeStories {
    stories: Mutex<HashMap<String, Result<Value, u16>>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl FakeStories {
    pub fn insert(&self, id: &str, story: Result<Value, u16>) {
        self.stories.lock().unwrap().insert(id.to_string(), story);
    }

    pub fn delay(&self, id: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(id.to_string(), delay);
    }
}

#[async_trait]
impl StaticStories for FakeStories {
    async fn fetch(&self, id: &str) -> Result<Value, ServiceError> {
        let delay = self.delays.lock().unwrap().get(id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.stories.lock().unwrap().get(id) {
            Some(Ok(story)) => Ok(story.clone()),
            Some(Err(status)) => Err(ServiceError::Status(*status)),
            None => Err(ServiceError::Status(404)),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: Mutex<Vec<Notification>>,
    pub login_prompts: AtomicUsize,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.message.clone())
            .collect()
    }

    pub fn prompts(&self) -> usize {
        self.login_prompts.load(Ordering::SeqCst)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }

    fn prompt_login(&self) {
        self.login_prompts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingRouter {
    pub navigations: Mutex<Vec<String>>,
    pub replacements: Mutex<Vec<String>>,
}

impl RecordingRouter {
    pub fn replaced(&self) -> Vec<String> {
        self.replacements.lock().unwrap().clone()
    }

    pub fn navigated(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl Router for RecordingRouter {
    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
    }

    fn replace(&self, path: &str) {
        self.replacements.lock().unwrap().push(path.to_string());
    }

    fn go_home(&self) {
        self.navigate("/");
    }
}

#[derive(Default)]
pub struct FakeDom {
    mounted: Mutex<HashSet<String>>,
    pub checks: Mutex<Vec<(String, Instant)>>,
    pub scrolled: Mutex<Vec<String>>,
}

impl FakeDom {
    pub fn mount(&self, id: &str) {
        self.mounted.lock().unwrap().insert(id.to_string());
    }

    pub fn check_times(&self, id: &str) -> Vec<Instant> {
        self.checks
            .lock()
            .unwrap()
            .iter()
            .filter(|(checked, _)| checked == id)
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn scrolled(&self) -> Vec<String> {
        self.scrolled.lock().unwrap().clone()
    }
}

impl Dom for FakeDom {
    fn element_exists(&self, id: &str) -> bool {
        self.checks.lock().unwrap().push((id.to_string(), Instant::now()));
        self.mounted.lock().unwrap().contains(id)
    }

    fn scroll_to_element(&self, id: &str, _options: ScrollOptions) {
        self.scrolled.lock().unwrap().push(id.to_string());
    }
}

/// Engine wired to fakes, with a subscription opened before anything runs
pub struct Harness {
    pub engine: Engine,
    pub actions: broadcast::Receiver<Action>,
    pub persistence: Arc<FakePersistence>,
    pub stories: Arc<FakeStories>,
    pub notifier: Arc<RecordingNotifier>,
    pub router: Arc<RecordingRouter>,
    pub dom: Arc<FakeDom>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_store(StoryStore::new())
    }

    pub fn with_story(story: Value) -> Self {
        Self::with_store(StoryStore::from_story(story))
    }

    pub fn with_store(store: StoryStore) -> Self {
        let persistence = Arc::new(FakePersistence::default());
        let stories = Arc::new(FakeStories::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let router = Arc::new(RecordingRouter::default());
        let dom = Arc::new(FakeDom::default());

        let services = Services {
            persistence: persistence.clone(),
            stories: stories.clone(),
            media: MediaRegistry::default(),
            notifier: notifier.clone(),
            router: router.clone(),
            dom: dom.clone(),
        };
        let engine = Engine::with_store(EngineConfig::default(), services, store);
        let actions = engine.subscribe();

        Self {
            engine,
            actions,
            persistence,
            stories,
            notifier,
            router,
            dom,
        }
    }

    pub fn dispatch(&self, action: Action) {
        self.engine.dispatch(action).unwrap();
    }

    /// Let every workflow run to its next timer, then return what was
    /// dispatched since the last call
    pub async fn settle(&mut self) -> Vec<Action> {
        tokio::time::sleep(Duration::from_millis(1)).await;
        let mut seen = Vec::new();
        while let Ok(action) = self.actions.try_recv() {
            seen.push(action);
        }
        seen
    }
}
