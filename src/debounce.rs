use std::{
    future::Future,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use futures::future::BoxFuture;
use tokio::task::JoinHandle;

/// A single-shot timer that runs a task after a delay unless cancelled first.
///
/// Once the delay has elapsed the task is spawned on its own, so cancelling
/// afterwards does not interrupt work that has already started.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `task` once `delay` has elapsed.
    pub fn schedule<F, Fut>(delay: Duration, task: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task());
        });
        Self { handle }
    }

    /// Cancel the task if its delay has not elapsed yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

type Action<T> = dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync;

/// Delays calls to an action until no new call arrived for `delay`.
///
/// Each call cancels the pending one, so only the latest argument is ever
/// delivered.
pub struct Debouncer<T> {
    action: Arc<Action<T>>,
    delay: Duration,
    pending: Mutex<Option<ScheduledTask>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Wrap `action` so it only runs once calls stop arriving for `delay`.
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let action: Arc<Action<T>> =
            Arc::new(move |arg: T| -> BoxFuture<'static, ()> { Box::pin(action(arg)) });
        Self { action, delay, pending: Mutex::new(None) }
    }

    /// Schedule the action with `arg`, replacing any pending call.
    pub fn call(&self, arg: T) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.cancel();
        }

        let action = self.action.clone();
        *pending = Some(ScheduledTask::schedule(self.delay, move || action(arg)));
    }

    /// Drop the pending call, if any.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(task) = pending.take() {
            task.cancel();
        }
    }
}
