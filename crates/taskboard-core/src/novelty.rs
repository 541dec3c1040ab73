//! New-task detection.
//!
//! Each fetch is diffed against the fingerprint snapshot persisted by the
//! previous fetch. Tasks whose fingerprint is absent from that snapshot are
//! new. When the previous snapshot is empty (first run, or a board that was
//! emptied) nothing is announced; the snapshot is still replaced so the
//! next fetch has a baseline. The snapshot write happens on every fetch,
//! notified or not.
//!
//! Store and notifier failures are logged and skipped; detection never
//! blocks rendering.

use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::fingerprint::{Fingerprint, fingerprint};
use crate::model::Task;
use crate::notify::{Notification, Notifier};
use crate::store::{self, KNOWN_TASKS_KEY, KeyValueStore};
use crate::timeago::Locale;

/// Outcome of one detection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoveltyReport {
    /// Size of the snapshot loaded from the store.
    pub previous_count: usize,
    /// Fingerprints of the current fetch, deduplicated, in input order.
    pub current: Vec<Fingerprint>,
    /// Titles of tasks absent from the previous snapshot, in input order.
    pub new_titles: Vec<String>,
    /// Whether a notification was delivered.
    pub notified: bool,
    /// Whether the new snapshot reached the store.
    pub persisted: bool,
}

impl NoveltyReport {
    #[must_use]
    pub fn new_count(&self) -> usize {
        self.new_titles.len()
    }
}

/// Diffs fetches against the persisted snapshot and announces new tasks.
pub struct NoveltyDetector<'a, S: KeyValueStore + ?Sized, N: Notifier + ?Sized> {
    store: &'a S,
    notifier: &'a N,
    locale: Locale,
}

impl<'a, S: KeyValueStore + ?Sized, N: Notifier + ?Sized> NoveltyDetector<'a, S, N> {
    pub const fn new(store: &'a S, notifier: &'a N, locale: Locale) -> Self {
        Self {
            store,
            notifier,
            locale,
        }
    }

    /// Run one detection pass over the freshly fetched tasks.
    pub fn detect(&self, tasks: &[Task]) -> NoveltyReport {
        let previous = self.load_previous();
        let fingerprints: Vec<Fingerprint> = tasks.iter().map(fingerprint).collect();

        let new_titles: Vec<String> = tasks
            .iter()
            .zip(&fingerprints)
            .filter(|(_, fp)| !previous.contains(fp.as_str()))
            .map(|(task, _)| task.title.clone())
            .collect();

        let mut report = NoveltyReport {
            previous_count: previous.len(),
            current: dedup_in_order(fingerprints),
            new_titles,
            notified: false,
            persisted: false,
        };

        if !previous.is_empty() && !report.new_titles.is_empty() {
            report.notified = self.announce(&report.new_titles);
        } else if previous.is_empty() {
            debug!(count = report.current.len(), "no previous snapshot; capturing baseline silently");
        }

        report.persisted = match store::save(self.store, KNOWN_TASKS_KEY, &report.current) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "could not persist known-task snapshot");
                false
            }
        };

        report
    }

    fn load_previous(&self) -> HashSet<String> {
        match store::load::<Vec<String>>(self.store, KNOWN_TASKS_KEY) {
            Ok(previous) => previous.unwrap_or_default().into_iter().collect(),
            Err(err) => {
                warn!(error = %err, "known-task snapshot unavailable; treating as first run");
                HashSet::new()
            }
        }
    }

    fn announce(&self, new_titles: &[String]) -> bool {
        let titles: Vec<&str> = new_titles.iter().map(String::as_str).collect();
        let notification = Notification::new_tasks(&titles, self.locale);
        match self.notifier.notify(&notification.title, &notification.body) {
            Ok(()) => {
                info!(count = titles.len(), "announced new tasks");
                true
            }
            Err(err) => {
                warn!(error = %err, "new-task notification skipped");
                false
            }
        }
    }
}

fn dedup_in_order(fingerprints: Vec<Fingerprint>) -> Vec<Fingerprint> {
    let mut seen = HashSet::new();
    fingerprints
        .into_iter()
        .filter(|fp| seen.insert(fp.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{DisabledNotifier, RecordingNotifier};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn tasks(titles: &[&str]) -> Vec<Task> {
        titles.iter().map(|t| Task::new(*t).with_day("شنبه")).collect()
    }

    #[test]
    fn first_run_is_silent_but_persists() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        let report = detector.detect(&tasks(&["A", "B", "C"]));

        assert_eq!(notifier.count(), 0);
        assert!(!report.notified);
        assert!(report.persisted);
        assert_eq!(report.new_count(), 3);
        assert_eq!(store.writes(), 1);
        assert_eq!(
            store.snapshot(KNOWN_TASKS_KEY),
            Some(json!(["Aشنبه", "Bشنبه", "Cشنبه"]))
        );
    }

    #[test]
    fn one_new_task_is_announced_by_title() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        detector.detect(&tasks(&["A"]));
        let report = detector.detect(&tasks(&["A", "Physics"]));

        assert!(report.notified);
        assert_eq!(report.new_titles, vec!["Physics"]);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "New task: Physics");
    }

    #[test]
    fn several_new_tasks_are_announced_once_by_count() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        detector.detect(&tasks(&["A"]));
        detector.detect(&tasks(&["A", "B", "C"]));

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].body, "2 new tasks added!");
    }

    #[test]
    fn unchanged_or_shrinking_board_is_silent() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        detector.detect(&tasks(&["A", "B"]));
        detector.detect(&tasks(&["A", "B"]));
        let report = detector.detect(&tasks(&["A"]));

        assert_eq!(notifier.count(), 0);
        assert_eq!(report.previous_count, 2);
        assert_eq!(store.snapshot(KNOWN_TASKS_KEY), Some(json!(["Aشنبه"])));
    }

    #[test]
    fn snapshot_is_replaced_not_merged() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        detector.detect(&tasks(&["A"]));
        detector.detect(&tasks(&["B"]));
        assert_eq!(store.snapshot(KNOWN_TASKS_KEY), Some(json!(["Bشنبه"])));
    }

    #[test]
    fn emptied_board_resumes_silently() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        detector.detect(&tasks(&["A"]));
        detector.detect(&[]);
        detector.detect(&tasks(&["B"]));
        assert_eq!(notifier.count(), 0);
    }

    #[test]
    fn duplicate_fingerprints_persist_once() {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        let report = detector.detect(&tasks(&["A", "A"]));
        assert_eq!(report.current.len(), 1);
        assert_eq!(report.new_count(), 2);
    }

    #[test]
    fn notifier_failure_still_persists() {
        let store = MemoryStore::new();
        let detector = NoveltyDetector::new(&store, &DisabledNotifier, Locale::English);

        detector.detect(&tasks(&["A"]));
        let report = detector.detect(&tasks(&["A", "B"]));

        assert!(!report.notified);
        assert!(report.persisted);
        assert_eq!(store.writes(), 2);
    }

    #[test]
    fn unavailable_store_degrades_to_silence() {
        let store = MemoryStore::unavailable();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        let report = detector.detect(&tasks(&["A", "B"]));
        assert_eq!(notifier.count(), 0);
        assert!(!report.persisted);
    }

    #[test]
    fn corrupt_snapshot_is_treated_as_first_run() {
        let store = MemoryStore::new();
        store.set(KNOWN_TASKS_KEY, json!({"not": "a list"})).expect("seed");
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);

        let report = detector.detect(&tasks(&["A"]));
        assert_eq!(notifier.count(), 0);
        assert!(report.persisted);
        assert_eq!(store.snapshot(KNOWN_TASKS_KEY), Some(json!(["Aشنبه"])));
    }
}
