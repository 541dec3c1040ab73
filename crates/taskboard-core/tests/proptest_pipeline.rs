use proptest::prelude::*;
use taskboard_core::completion::CompletionMap;
use taskboard_core::filter::{FilterCriteria, StatusFilter, SubjectFilter, TimeWindow, apply_filters};
use taskboard_core::fingerprint::fingerprint;
use taskboard_core::group::group_by_day;
use taskboard_core::model::Task;
use taskboard_core::notify::RecordingNotifier;
use taskboard_core::novelty::NoveltyDetector;
use taskboard_core::store::MemoryStore;
use taskboard_core::timeago::{Locale, RelativeAge};

#[path = "generators.rs"]
mod generators;
use generators::*;

fn arb_criteria() -> impl Strategy<Value = FilterCriteria> {
    (
        prop_oneof![
            Just(SubjectFilter::All),
            prop::sample::select(vec!["Math", "Art", "ریاضی"]).prop_map(SubjectFilter::title),
        ],
        prop::sample::select(TimeWindow::VALUES.to_vec()),
        prop::sample::select(vec![StatusFilter::All, StatusFilter::Completed, StatusFilter::Pending]),
    )
        .prop_map(|(subject, window, status)| FilterCriteria {
            subject,
            window,
            status,
        })
}

/// Mark roughly every other task completed.
fn half_completed(tasks: &[Task]) -> CompletionMap {
    tasks
        .iter()
        .step_by(2)
        .map(|task| (fingerprint(task).into_string(), true))
        .collect()
}

fn owned(tasks: Vec<&Task>) -> Vec<Task> {
    tasks.into_iter().cloned().collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    #[test]
    fn fingerprint_ignores_fields_outside_its_inputs(
        task in arb_task(),
        prefix in "[a-zA-Z0-9]{10}",
        tail_a in "[a-z ]{0,12}",
        tail_b in "[a-z ]{0,12}",
        categories in prop::collection::vec("[a-z]{1,5}", 0..4),
    ) {
        let a = Task {
            description: Some(format!("{prefix}{tail_a}")),
            ..task.clone()
        };
        let b = Task {
            description: Some(format!("{prefix}{tail_b}")),
            created_at: None,
            date: Some("2020-01-01".to_string()),
            categories,
            ..task
        };
        prop_assert_eq!(fingerprint(&a), fingerprint(&b));
    }

    #[test]
    fn fingerprint_keeps_only_allowed_characters(task in arb_task()) {
        let fp = fingerprint(&task);
        prop_assert!(fp
            .as_str()
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ('\u{0600}'..='\u{06FF}').contains(&c)),
            "fingerprint contains disallowed characters: {:?}", fp);
    }

    #[test]
    fn age_magnitude_is_monotonic(a in 0i64..100_000_000, b in 0i64..100_000_000) {
        let (older, newer) = if a >= b { (a, b) } else { (b, a) };
        prop_assert!(
            RelativeAge::from_elapsed_secs(older).magnitude()
                >= RelativeAge::from_elapsed_secs(newer).magnitude()
        );
    }

    #[test]
    fn first_run_never_notifies(titles in prop::collection::btree_set("[A-Za-z]{1,8}", 0..30)) {
        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let tasks: Vec<Task> = titles.iter().map(Task::new).collect();

        let report = NoveltyDetector::new(&store, &notifier, Locale::Persian).detect(&tasks);

        prop_assert_eq!(notifier.count(), 0);
        prop_assert_eq!(report.current.len(), tasks.len());
    }

    #[test]
    fn strict_superset_notifies_exactly_once(
        titles in prop::collection::btree_set("[A-Za-z]{1,8}", 2..30),
        split in any::<prop::sample::Index>(),
    ) {
        let titles: Vec<String> = titles.into_iter().collect();
        let keep = 1 + split.index(titles.len() - 1);
        let before: Vec<Task> = titles[..keep].iter().map(Task::new).collect();
        let after: Vec<Task> = titles.iter().map(Task::new).collect();

        let store = MemoryStore::new();
        let notifier = RecordingNotifier::new();
        let detector = NoveltyDetector::new(&store, &notifier, Locale::English);
        detector.detect(&before);
        let report = detector.detect(&after);

        prop_assert_eq!(notifier.count(), 1);
        prop_assert_eq!(report.new_count(), titles.len() - keep);
    }

    #[test]
    fn filtering_is_order_independent(
        tasks in arb_tasks(),
        first in arb_criteria(),
        second in arb_criteria(),
    ) {
        let now = fixed_now();
        let completed = half_completed(&tasks);

        let ab = owned(apply_filters(&owned(apply_filters(&tasks, &first, &completed, now)), &second, &completed, now));
        let ba = owned(apply_filters(&owned(apply_filters(&tasks, &second, &completed, now)), &first, &completed, now));
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn filtering_is_idempotent(tasks in arb_tasks(), criteria in arb_criteria()) {
        let now = fixed_now();
        let completed = half_completed(&tasks);

        let once = owned(apply_filters(&tasks, &criteria, &completed, now));
        let twice = owned(apply_filters(&once, &criteria, &completed, now));
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn grouping_is_a_stable_partition(tasks in arb_tasks()) {
        let groups = group_by_day(&tasks);
        prop_assert_eq!(groups.iter().count(), 8);
        prop_assert_eq!(groups.len(), tasks.len());

        for (day, bucket) in groups.iter() {
            let expected: Vec<&Task> = tasks.iter().filter(|t| t.bucket() == day).collect();
            prop_assert_eq!(bucket.to_vec(), expected);
        }
    }
}
