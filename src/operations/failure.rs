// Failure Channel
// The single place where failed requests are reported

use std::collections::VecDeque;
use std::time::{Duration, SystemTime};

use super::api::ApiRequest;
use super::error::SyncError;

/// A request that failed, with the reason
#[derive(Debug)]
pub struct Failure {
    pub request: ApiRequest,
    pub error: SyncError,
}

impl Failure {
    /// One-line description for logs and the status bar
    pub fn summary(&self) -> String {
        format!("Could not {}: {}", self.request, self.error)
    }
}

/// Receives every failed fetch, add, remove or toggle
pub trait FailureChannel {
    fn report(&mut self, failure: Failure);
}

impl<F> FailureChannel for F
where
    F: FnMut(Failure),
{
    fn report(&mut self, failure: Failure) {
        self(failure)
    }
}

/// Failure channel that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFailures;

impl FailureChannel for LogFailures {
    fn report(&mut self, failure: Failure) {
        tracing::warn!(
            request = %failure.request,
            status = failure.error.status(),
            error = %failure.error,
            "Appliance request failed"
        );
    }
}

/// A failure kept for display
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub shown_at: SystemTime,
}

impl Notice {
    /// Whether the notice was raised within `max_age`
    pub fn is_fresh(&self, max_age: Duration) -> bool {
        match self.shown_at.elapsed() {
            Ok(age) => age <= max_age,
            // Clock went backwards; keep showing it
            Err(_) => true,
        }
    }
}

/// Logs failures and keeps the most recent ones for the console
#[derive(Debug)]
pub struct NoticeBoard {
    notices: VecDeque<Notice>,
    capacity: usize,
}

impl NoticeBoard {
    pub fn new(capacity: usize) -> Self {
        Self {
            notices: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Most recent notice, if any
    pub fn latest(&self) -> Option<&Notice> {
        self.notices.back()
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }

    /// Drop the most recent notice
    pub fn dismiss(&mut self) {
        self.notices.pop_back();
    }

    /// Most recent notice if it is still fresh enough to display
    pub fn current(&self, max_age: Duration) -> Option<&Notice> {
        self.latest().filter(|notice| notice.is_fresh(max_age))
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(20)
    }
}

impl FailureChannel for NoticeBoard {
    fn report(&mut self, failure: Failure) {
        let message = failure.summary();
        LogFailures.report(failure);

        if self.notices.len() == self.capacity {
            self.notices.pop_front();
        }
        self.notices.push_back(Notice {
            message,
            shown_at: SystemTime::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CollectionKind;

    fn failure(name: &str) -> Failure {
        Failure {
            request: ApiRequest::Remove {
                kind: CollectionKind::Sites,
                name: name.to_string(),
            },
            error: SyncError::Status {
                method: "DELETE",
                url: format!("http://filter.lan/sites/{name}"),
                status: 404,
            },
        }
    }

    #[test]
    fn closures_are_failure_channels() {
        let mut seen = Vec::new();
        {
            let mut channel = |f: Failure| seen.push(f.summary());
            channel.report(failure("a.com"));
        }
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("Could not remove 'a.com' from sites"));
    }

    #[test]
    fn notice_board_is_bounded_and_keeps_latest() {
        let mut board = NoticeBoard::new(2);
        board.report(failure("a.com"));
        board.report(failure("b.com"));
        board.report(failure("c.com"));

        assert_eq!(board.len(), 2);
        assert!(board.latest().unwrap().message.contains("c.com"));

        board.dismiss();
        assert!(board.latest().unwrap().message.contains("b.com"));
    }

    #[test]
    fn old_notices_age_out_of_the_footer() {
        let mut board = NoticeBoard::new(4);
        board.report(failure("a.com"));
        assert!(board.current(Duration::from_secs(10)).is_some());

        if let Some(notice) = board.notices.back_mut() {
            notice.shown_at = SystemTime::now() - Duration::from_secs(60);
        }
        assert!(board.current(Duration::from_secs(10)).is_none());
        assert!(board.latest().is_some());
    }
}
