//! Response view over the legacy response.
//!
//! # Responsibilities
//! - Delegate status code and reason phrase to the legacy response
//! - Expose the live header adaptor and the legacy output stream
//! - Queue starting/completed callbacks and run them on demand
//!
//! # Lifecycle
//! ```text
//! NotStarted ──start()──▶ Starting ──all starting callbacks ok──▶ Started
//! NotCompleted ──complete()──▶ Completed
//! ```
//!
//! # Design Decisions
//! - `has_started` turns true before the first starting callback runs
//! - Once `Started`, the state never moves back; a later `start()` only
//!   drains callbacks queued since
//! - Callbacks of a phase run one at a time, in registration order
//! - A failing starting callback stops the phase and propagates
//! - Every completed callback runs even if an earlier one failed; the first
//!   failure is returned once the queue is drained
//! - Headers and body are bound to the legacy response: replacing them is an
//!   unsupported operation

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt};

use super::lifecycle::CallbackQueue;
use super::{Callback, CompletionState, HttpResponseFeature, StartState};
use crate::error::{BridgeError, BridgeResult};
use crate::headers::{HeaderDictionary, ResponseHeaders};
use crate::legacy::{BodyStream, LegacyResponse};
use crate::observability::metrics;

/// The adapted response.
pub struct ResponseView {
    legacy: Arc<dyn LegacyResponse>,
    headers: Arc<ResponseHeaders>,
    start_state: AtomicU8,
    completion_state: AtomicU8,
    starting: CallbackQueue,
    completed: CallbackQueue,
}

impl ResponseView {
    pub fn new(legacy: Arc<dyn LegacyResponse>) -> Self {
        Self {
            headers: Arc::new(ResponseHeaders::new(legacy.clone())),
            legacy,
            start_state: AtomicU8::new(StartState::NotStarted as u8),
            completion_state: AtomicU8::new(CompletionState::NotCompleted as u8),
            starting: CallbackQueue::default(),
            completed: CallbackQueue::default(),
        }
    }

    pub fn start_state(&self) -> StartState {
        StartState::from(self.start_state.load(Ordering::Acquire))
    }

    pub fn completion_state(&self) -> CompletionState {
        CompletionState::from(self.completion_state.load(Ordering::Acquire))
    }

    /// Callbacks still waiting for the starting phase.
    pub fn pending_starting(&self) -> usize {
        self.starting.len()
    }

    /// Callbacks still waiting for the completed phase.
    pub fn pending_completed(&self) -> usize {
        self.completed.len()
    }

    async fn run_starting(&self) -> BridgeResult<()> {
        let previous = self
            .start_state
            .compare_exchange(
                StartState::NotStarted as u8,
                StartState::Starting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .unwrap_or_else(|current| current);
        if StartState::from(previous) == StartState::Started && self.starting.is_empty() {
            return Ok(());
        }
        tracing::debug!(pending = self.starting.len(), "Response starting");

        while let Some(callback) = self.starting.pop() {
            metrics::record_callback("starting");
            if let Err(e) = callback.invoke().await {
                tracing::warn!(error = %e, "Starting callback failed");
                return Err(BridgeError::Callback(e));
            }
        }

        self.start_state
            .store(StartState::Started as u8, Ordering::Release);
        Ok(())
    }

    async fn run_completed(&self) -> BridgeResult<()> {
        tracing::debug!(pending = self.completed.len(), "Response completing");

        let mut first_error = None;
        while let Some(callback) = self.completed.pop() {
            metrics::record_callback("completed");
            if let Err(e) = callback.invoke().await {
                tracing::warn!(error = %e, "Completed callback failed");
                first_error.get_or_insert(e);
            }
        }

        self.completion_state
            .store(CompletionState::Completed as u8, Ordering::Release);
        match first_error {
            Some(e) => Err(BridgeError::Callback(e)),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ResponseView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseView")
            .field("status_code", &self.legacy.status_code())
            .field("start_state", &self.start_state())
            .field("completion_state", &self.completion_state())
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl HttpResponseFeature for ResponseView {
    fn status_code(&self) -> u16 {
        self.legacy.status_code()
    }

    fn set_status_code(&self, code: u16) {
        self.legacy.set_status_code(code);
    }

    fn reason_phrase(&self) -> String {
        self.legacy.status_description()
    }

    fn set_reason_phrase(&self, phrase: String) {
        self.legacy.set_status_description(phrase);
    }

    fn headers(&self) -> Arc<dyn HeaderDictionary> {
        self.headers.clone()
    }

    fn set_headers(&self, _headers: Arc<dyn HeaderDictionary>) -> BridgeResult<()> {
        Err(BridgeError::HeadersNotSupported)
    }

    fn body(&self) -> BodyStream {
        self.legacy.output_stream()
    }

    fn set_body(&self, _body: BodyStream) -> BridgeResult<()> {
        Err(BridgeError::BodyNotSupported)
    }

    fn has_started(&self) -> bool {
        self.start_state() != StartState::NotStarted
    }

    fn on_starting(&self, callback: Callback) {
        self.starting.push(callback);
    }

    fn on_completed(&self, callback: Callback) {
        self.completed.push(callback);
    }

    fn start(&self) -> BoxFuture<'_, BridgeResult<()>> {
        self.run_starting().boxed()
    }

    fn complete(&self) -> BoxFuture<'_, BridgeResult<()>> {
        self.run_completed().boxed()
    }
}
