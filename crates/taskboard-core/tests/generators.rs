use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use taskboard_core::model::{Day, Task};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0)
        .single()
        .expect("valid date")
}

pub fn arb_day() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => prop::sample::select(Day::ALL.to_vec()).prop_map(|d| Some(d.label().to_string())),
        1 => "[a-z]{0,8}".prop_map(Some),
        1 => Just(None),
    ]
}

/// Up to ~two years back, or absent.
pub fn arb_created_at() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        4 => (0i64..63_072_000).prop_map(|secs| Some((fixed_now() - Duration::seconds(secs)).to_rfc3339())),
        1 => Just(None),
    ]
}

pub fn arb_task() -> impl Strategy<Value = Task> {
    (
        prop::sample::select(vec!["Math", "Physics", "Chemistry", "ریاضی", "ادبیات", " Art "]),
        arb_day(),
        prop::option::of("[a-zA-Z0-9 ]{0,20}"),
        arb_created_at(),
    )
        .prop_map(|(title, day, description, created_at)| Task {
            title: title.to_string(),
            day,
            description,
            created_at,
            ..Task::default()
        })
}

pub fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
    prop::collection::vec(arb_task(), 0..40)
}
