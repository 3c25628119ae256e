//! Response lifecycle: deferred callbacks and phase states.

use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::sync::Mutex;

use futures_util::future::{BoxFuture, FutureExt};

use crate::error::BoxError;
use crate::sync;

/// Progress of the starting phase.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartState {
    NotStarted = 0,
    Starting = 1,
    Started = 2,
}

impl From<u8> for StartState {
    fn from(val: u8) -> Self {
        match val {
            1 => StartState::Starting,
            2 => StartState::Started,
            _ => StartState::NotStarted,
        }
    }
}

/// Progress of the completed phase.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    NotCompleted = 0,
    Completed = 1,
}

impl From<u8> for CompletionState {
    fn from(val: u8) -> Self {
        match val {
            1 => CompletionState::Completed,
            _ => CompletionState::NotCompleted,
        }
    }
}

/// A deferred callback together with the state it receives.
pub struct Callback {
    invoke: Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>,
}

impl Callback {
    /// Bind `callback` to `state`; `state` is handed back unchanged when the
    /// callback runs.
    pub fn new<S, F, Fut>(callback: F, state: S) -> Self
    where
        S: Send + 'static,
        F: FnOnce(S) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Self {
            invoke: Box::new(move || callback(state).boxed()),
        }
    }

    /// Run the callback. Consumes it, so it can only run once.
    pub async fn invoke(self) -> Result<(), BoxError> {
        (self.invoke)().await
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback")
    }
}

/// FIFO of callbacks for one phase.
#[derive(Debug, Default)]
pub(crate) struct CallbackQueue {
    queue: Mutex<VecDeque<Callback>>,
}

impl CallbackQueue {
    pub(crate) fn push(&self, callback: Callback) {
        sync::lock(&self.queue).push_back(callback);
    }

    /// Next callback in registration order. The lock is released on return,
    /// so a running callback may register more.
    pub(crate) fn pop(&self) -> Option<Callback> {
        sync::lock(&self.queue).pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        sync::lock(&self.queue).len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        sync::lock(&self.queue).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_callback_receives_state() {
        let seen = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let callback = Callback::new(
            move |state: u32| async move {
                *sink.lock().unwrap() = Some(state);
                Ok::<(), BoxError>(())
            },
            1111,
        );

        callback.invoke().await.unwrap();
        assert_eq!(*seen.lock().unwrap(), Some(1111));
    }

    #[test]
    fn test_queue_is_fifo() {
        let queue = CallbackQueue::default();
        queue.push(Callback::new(|_: ()| async { Ok::<(), BoxError>(()) }, ()));
        queue.push(Callback::new(
            |_: ()| async { Err::<(), BoxError>("second".into()) },
            (),
        ));
        assert_eq!(queue.len(), 2);

        assert!(queue.pop().is_some());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_state_from_u8() {
        assert_eq!(StartState::from(0), StartState::NotStarted);
        assert_eq!(StartState::from(2), StartState::Started);
        assert_eq!(CompletionState::from(1), CompletionState::Completed);
    }
}
