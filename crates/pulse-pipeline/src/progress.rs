//! Progress events emitted while a run advances, and the observers that
//! receive them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// Stages of a run in the order they are reported.
///
/// `Complete` and `Error` are terminal. `Error` may follow any non-terminal
/// step (including none at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStep {
    Fetching,
    Fetched,
    Grouping,
    Grouped,
    Generating,
    Complete,
    Error,
}

impl ProgressStep {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ProgressStep::Complete | ProgressStep::Error)
    }

    /// The step that must come right after `self` on the happy path.
    fn successor(self) -> Option<ProgressStep> {
        match self {
            ProgressStep::Fetching => Some(ProgressStep::Fetched),
            ProgressStep::Fetched => Some(ProgressStep::Grouping),
            ProgressStep::Grouping => Some(ProgressStep::Grouped),
            ProgressStep::Grouped => Some(ProgressStep::Generating),
            ProgressStep::Generating => Some(ProgressStep::Complete),
            ProgressStep::Complete | ProgressStep::Error => None,
        }
    }
}

/// One progress notification, serialized as `{"step", "message", "data"?}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub step: ProgressStep,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ProgressEvent {
    #[must_use]
    pub fn new(step: ProgressStep, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// `data: <json>\n\n`, the framing used on `text/event-stream`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if the payload cannot be encoded.
    pub fn to_sse_frame(&self) -> Result<String, serde_json::Error> {
        Ok(format!("data: {}\n\n", serde_json::to_string(self)?))
    }
}

/// Enforces the step order of a single run.
///
/// `fetching → fetched → grouping → grouped → generating → complete`, or
/// `error` from any non-terminal point. Anything else is rejected.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: Option<ProgressStep>,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `step` if it is a legal next step; returns whether it was accepted.
    pub fn accept(&mut self, step: ProgressStep) -> bool {
        let allowed = match self.last {
            Some(last) if last.is_terminal() => false,
            _ if step == ProgressStep::Error => true,
            None => step == ProgressStep::Fetching,
            Some(last) => last.successor() == Some(step),
        };
        if allowed {
            self.last = Some(step);
        }
        allowed
    }

    #[must_use]
    pub fn last(&self) -> Option<ProgressStep> {
        self.last
    }
}

/// Receives progress events from a run.
pub trait ProgressObserver: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

/// Discards every event; used by blocking callers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events into an unbounded channel.
///
/// A dropped receiver only stops delivery; the run itself carries on.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelObserver {
    #[must_use]
    pub fn new(tx: UnboundedSender<ProgressEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for ChannelObserver {
    fn emit(&self, event: ProgressEvent) {
        if self.tx.send(event).is_err() {
            tracing::debug!("progress receiver dropped; event discarded");
        }
    }
}

/// Gate between a run and its observer that drops illegal transitions.
pub(crate) struct Reporter<'a> {
    observer: &'a dyn ProgressObserver,
    tracker: ProgressTracker,
}

impl<'a> Reporter<'a> {
    pub(crate) fn new(observer: &'a dyn ProgressObserver) -> Self {
        Self {
            observer,
            tracker: ProgressTracker::new(),
        }
    }

    pub(crate) fn emit(&mut self, event: ProgressEvent) {
        if self.tracker.accept(event.step) {
            self.observer.emit(event);
        } else {
            tracing::warn!(
                step = ?event.step,
                last = ?self.tracker.last(),
                "dropping out-of-order progress event"
            );
        }
    }
}
