//! Completion guard for aborted dispatches.

use std::sync::Arc;

use crate::features::{CompletionState, HttpResponseFeature, ResponseView};

/// Runs the response's completion phase if dropped while still armed.
///
/// The dispatcher disarms it after awaiting `complete` itself. If the
/// dispatch future is dropped first (the host aborted the request), the
/// completion phase is spawned on the current tokio runtime.
#[derive(Debug)]
pub struct CompletionGuard {
    response: Option<Arc<ResponseView>>,
}

impl CompletionGuard {
    pub fn new(response: Arc<ResponseView>) -> Self {
        Self {
            response: Some(response),
        }
    }

    pub fn disarm(&mut self) {
        self.response = None;
    }

    pub fn is_armed(&self) -> bool {
        self.response.is_some()
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let Some(response) = self.response.take() else {
            return;
        };
        if response.completion_state() == CompletionState::Completed {
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::debug!("Dispatch dropped before completion, spawning completion phase");
                handle.spawn(async move {
                    if let Err(e) = response.complete().await {
                        tracing::warn!(error = %e, "Deferred completion failed");
                    }
                });
            }
            Err(_) => {
                tracing::warn!("Dispatch dropped outside a runtime, completion callbacks skipped");
            }
        }
    }
}
