//! Progress and row-failure reporting
//!
//! Passes report through a `Notifier` instead of printing. Implementations
//! must not panic and have nothing to return.

use std::cell::RefCell;

use tracing::{info, warn};

/// One thing worth telling the user about
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Progress(String),
    RowFailed { row: usize, message: String },
}

/// Side channel for progress lines and row-level failures
pub trait Notifier {
    fn notify(&self, notice: Notice);

    fn progress(&self, message: &str) {
        self.notify(Notice::Progress(message.to_string()));
    }

    fn row_failed(&self, row: usize, message: &str) {
        self.notify(Notice::RowFailed {
            row,
            message: message.to_string(),
        });
    }
}

/// Forwards notices to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Progress(message) => info!("{}", message),
            Notice::RowFailed { row, message } => warn!(row, "{}", message),
        }
    }
}

/// Keeps every notice, for tests and for summaries printed after a run
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    /// Row indices of reported failures, in report order
    pub fn failed_rows(&self) -> Vec<usize> {
        self.notices
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notice::RowFailed { row, .. } => Some(*row),
                Notice::Progress(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.progress("starting");
        notifier.row_failed(12, "bad price");
        notifier.row_failed(40, "bad quantity");

        assert_eq!(notifier.notices().len(), 3);
        assert_eq!(notifier.failed_rows(), vec![12, 40]);
        assert_eq!(notifier.notices()[0], Notice::Progress("starting".into()));
    }

    #[test]
    fn test_tracing_notifier_does_not_panic_without_subscriber() {
        let notifier = TracingNotifier;
        notifier.progress("hello");
        notifier.row_failed(1, "oops");
    }
}
