//! Per-run context handed to every search entry point.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How a search run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The search ran to completion.
    Complete,
    /// The caller cancelled the run; the result is partial.
    Cancelled,
    /// The deadline passed; the result is partial.
    TimedOut,
}

/// Result of a search run. Partial results are flagged through `status`
/// rather than reported as errors.
#[derive(Debug, Clone)]
pub struct SearchOutcome<T> {
    pub data: T,
    pub status: SearchStatus,
}

impl<T> SearchOutcome<T> {
    pub fn complete(data: T) -> Self {
        Self {
            data,
            status: SearchStatus::Complete,
        }
    }

    pub fn partial(data: T, status: SearchStatus) -> Self {
        Self { data, status }
    }

    pub fn is_complete(&self) -> bool {
        self.status == SearchStatus::Complete
    }

    /// Transform the payload, keeping the status.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SearchOutcome<U> {
        SearchOutcome {
            data: f(self.data),
            status: self.status,
        }
    }
}

/// Shared stop signal for a run: a cancel flag every clone observes, plus
/// an optional deadline. A caller keeps one clone and hands another to the
/// search.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same flag, but the run also stops once `timeout` has elapsed from now.
    pub fn with_deadline_in(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Why the run should stop now, if it should. Cancellation wins over an
    /// elapsed deadline.
    pub fn stop_reason(&self) -> Option<SearchStatus> {
        if self.is_cancelled() {
            return Some(SearchStatus::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(SearchStatus::TimedOut),
            _ => None,
        }
    }
}

/// Carries the stop signal for one run. Searches call
/// [`RunContext::interrupted`] at round boundaries.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    token: CancellationToken,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing token so the caller can cancel from elsewhere.
    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Stop the run once `timeout` has elapsed from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.token = self.token.with_deadline_in(timeout);
        self
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// `Some(status)` when the run should stop now.
    pub fn interrupted(&self) -> Option<SearchStatus> {
        self.token.stop_reason()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_is_not_interrupted() {
        assert_eq!(RunContext::new().interrupted(), None);
    }

    #[test]
    fn cancelling_a_shared_token_interrupts() {
        let token = CancellationToken::new();
        let ctx = RunContext::new().with_token(token.clone());
        token.cancel();
        assert_eq!(ctx.interrupted(), Some(SearchStatus::Cancelled));
    }

    #[test]
    fn elapsed_deadline_times_out() {
        let ctx = RunContext::new().with_timeout(Duration::ZERO);
        assert_eq!(ctx.interrupted(), Some(SearchStatus::TimedOut));
    }

    #[test]
    fn token_deadline_travels_with_clones() {
        let token = CancellationToken::new().with_deadline_in(Duration::ZERO);
        let ctx = RunContext::new().with_token(token.clone());
        assert_eq!(ctx.interrupted(), Some(SearchStatus::TimedOut));
        token.cancel();
        assert_eq!(ctx.interrupted(), Some(SearchStatus::Cancelled));
    }
}
