//! Notification seam.
//!
//! A [`Notifier`] delivers one alert (title + body). Delivery is
//! capability-gated: when the environment cannot show notifications the
//! notifier returns [`NotifyError::Unavailable`] and the caller moves on.

use std::cell::RefCell;

use crate::error::ErrorCode;
use crate::timeago::Locale;

/// Errors raised by a [`Notifier`].
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The environment lacks the capability or the permission.
    #[error("notifications unavailable: {reason}")]
    Unavailable { reason: String },

    /// The delivery mechanism was present but failed.
    #[error("notification delivery failed: {reason}")]
    Failed { reason: String },
}

impl NotifyError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        ErrorCode::NotificationUnavailable
    }
}

/// Delivers alerts to the user.
pub trait Notifier {
    /// Show one notification.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the notification could not be shown.
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        (**self).notify(title, body)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        (**self).notify(title, body)
    }
}

/// A rendered alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Alert announcing newly arrived tasks.
    ///
    /// One new task is announced by title; more are announced by count.
    #[must_use]
    pub fn new_tasks(titles: &[&str], locale: Locale) -> Self {
        let body = match (titles, locale) {
            ([only], Locale::Persian) => format!("تکلیف جدید: {only}"),
            ([only], Locale::English) => format!("New task: {only}"),
            (many, Locale::Persian) => format!("{} تکلیف جدید اضافه شد!", many.len()),
            (many, Locale::English) => format!("{} new tasks added!", many.len()),
        };
        Self {
            title: app_title(locale).to_string(),
            body,
        }
    }
}

/// Notification title for the board.
#[must_use]
pub const fn app_title(locale: Locale) -> &'static str {
    match locale {
        Locale::Persian => "سیستم کلاسی 904",
        Locale::English => "Class System 904",
    }
}

/// A notifier that never delivers. Used when notifications are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledNotifier;

impl Notifier for DisabledNotifier {
    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable {
            reason: "notifications are disabled".to_string(),
        })
    }
}

/// Records every notification it is asked to show.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RefCell<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.sent.borrow().len()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.sent.borrow_mut().push(Notification {
            title: title.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_new_task_names_the_title() {
        let n = Notification::new_tasks(&["Math"], Locale::English);
        assert_eq!(n.title, "Class System 904");
        assert_eq!(n.body, "New task: Math");

        let fa = Notification::new_tasks(&["ریاضی"], Locale::Persian);
        assert_eq!(fa.title, "سیستم کلاسی 904");
        assert_eq!(fa.body, "تکلیف جدید: ریاضی");
    }

    #[test]
    fn several_new_tasks_are_counted() {
        let n = Notification::new_tasks(&["A", "B", "C"], Locale::English);
        assert_eq!(n.body, "3 new tasks added!");

        let fa = Notification::new_tasks(&["A", "B"], Locale::Persian);
        assert_eq!(fa.body, "2 تکلیف جدید اضافه شد!");
    }

    #[test]
    fn disabled_notifier_reports_unavailable() {
        let err = DisabledNotifier.notify("t", "b").expect_err("disabled");
        assert!(matches!(err, NotifyError::Unavailable { .. }));
        assert_eq!(err.code(), ErrorCode::NotificationUnavailable);
    }

    #[test]
    fn recording_notifier_keeps_payloads() {
        let recorder = RecordingNotifier::new();
        recorder.notify("t", "b").expect("records");
        assert_eq!(recorder.count(), 1);
        assert_eq!(
            recorder.sent(),
            vec![Notification {
                title: "t".into(),
                body: "b".into()
            }]
        );
    }
}
