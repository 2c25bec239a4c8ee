//! Cancellable background work.
//!
//! Both helpers own at most one spawned task and abort it when replaced,
//! cancelled or dropped. A workflow holding one can therefore be stopped by
//! dropping it, without anything it scheduled firing afterwards.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Runs the latest started task only; starting a new one aborts the previous
#[derive(Debug, Default)]
pub struct SwitchTask {
    handle: Option<JoinHandle<()>>,
}

impl SwitchTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(task));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for SwitchTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Fires a callback once calls have stopped for `delay`.
///
/// Every `call` restarts the quiet period with the new callback, `cancel`
/// drops the pending one without running it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    task: SwitchTask,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            task: SwitchTask::new(),
        }
    }

    pub fn call<F>(&mut self, callback: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        self.task.start(async move {
            tokio::time::sleep(delay).await;
            callback.await;
        });
    }

    pub fn cancel(&mut self) {
        self.task.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_running()
    }
}
