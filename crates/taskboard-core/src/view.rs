//! Render-ready board structure.
//!
//! The view model is an immutable tree: one section per day bucket (all
//! eight, in display order), each holding its tasks annotated with
//! fingerprint, completion flag, and age label. It does no filtering of its
//! own; pass it the already-filtered task list.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::completion::{CompletionMap, is_completed_in};
use crate::filter::FilterCriteria;
use crate::fingerprint::{Fingerprint, fingerprint};
use crate::group::group_by_day;
use crate::model::{Day, Task};
use crate::timeago::{Locale, format_relative};

/// One task as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEntry {
    pub task: Task,
    pub fingerprint: Fingerprint,
    pub completed: bool,
    /// Empty when the task has no usable timestamp.
    pub age_label: String,
}

/// One day bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySection {
    pub day: Day,
    pub label: String,
    pub entries: Vec<TaskEntry>,
}

impl DaySection {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The whole board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub sections: Vec<DaySection>,
    /// Options for the subject selector, from the unfiltered task list.
    pub subjects: Vec<String>,
    pub criteria: FilterCriteria,
    pub locale: Locale,
}

impl BoardView {
    /// Number of tasks shown across all sections.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TaskEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }
}

/// Inputs shared by every view build in one render pass.
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    pub completed: &'a CompletionMap,
    pub subjects: &'a [String],
    pub criteria: &'a FilterCriteria,
    pub now: DateTime<Utc>,
    pub locale: Locale,
}

/// Group and annotate an (already filtered) task list.
#[must_use]
pub fn build_view<'t, I>(tasks: I, ctx: ViewContext<'_>) -> BoardView
where
    I: IntoIterator<Item = &'t Task>,
{
    let groups = group_by_day(tasks);
    let sections = groups
        .iter()
        .map(|(day, tasks)| DaySection {
            day,
            label: day_label(day, ctx.locale).to_string(),
            entries: tasks.iter().map(|task| annotate(task, &ctx)).collect(),
        })
        .collect();

    BoardView {
        sections,
        subjects: ctx.subjects.to_vec(),
        criteria: ctx.criteria.clone(),
        locale: ctx.locale,
    }
}

fn annotate(task: &Task, ctx: &ViewContext<'_>) -> TaskEntry {
    let fp = fingerprint(task);
    TaskEntry {
        completed: is_completed_in(ctx.completed, &fp),
        age_label: format_relative(task.created_at_raw(), ctx.now, ctx.locale),
        fingerprint: fp,
        task: task.clone(),
    }
}

const fn day_label(day: Day, locale: Locale) -> &'static str {
    match locale {
        Locale::Persian => day.label(),
        Locale::English => day.english_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).single().expect("valid date")
    }

    fn build(tasks: &[Task], completed: &CompletionMap, locale: Locale) -> BoardView {
        let criteria = FilterCriteria::default();
        let subjects = vec!["Math".to_string()];
        build_view(
            tasks,
            ViewContext {
                completed,
                subjects: &subjects,
                criteria: &criteria,
                now: now(),
                locale,
            },
        )
    }

    #[test]
    fn always_eight_sections_in_order() {
        let view = build(&[], &CompletionMap::new(), Locale::Persian);
        assert_eq!(view.sections.len(), 8);
        assert!(view.sections.iter().all(DaySection::is_empty));
        assert_eq!(view.sections[0].label, "شنبه");
        assert_eq!(view.sections[7].label, "متفرقه");
        assert_eq!(view.subjects, vec!["Math"]);
    }

    #[test]
    fn entries_carry_completion_and_age() {
        let task = Task::new("Math")
            .with_day("شنبه")
            .with_created_at((now() - Duration::hours(2)).to_rfc3339());
        let mut completed = CompletionMap::new();
        completed.insert(fingerprint(&task).into_string(), true);

        let view = build(&[task, Task::new("Art")], &completed, Locale::English);

        let saturday = &view.sections[Day::Saturday.index()];
        assert_eq!(saturday.label, "Saturday");
        assert_eq!(saturday.entries.len(), 1);
        assert!(saturday.entries[0].completed);
        assert_eq!(saturday.entries[0].age_label, "2 hours ago");

        let misc = &view.sections[Day::Misc.index()];
        assert!(!misc.entries[0].completed);
        assert_eq!(misc.entries[0].age_label, "");
        assert_eq!(view.task_count(), 2);
        assert_eq!(view.entries().count(), 2);
    }

    #[test]
    fn serializes_for_json_renderers() {
        let view = build(&[Task::new("Art")], &CompletionMap::new(), Locale::English);
        let json = serde_json::to_value(&view).expect("serialize");
        assert_eq!(json["sections"][7]["day"], "misc");
        assert_eq!(json["sections"][7]["entries"][0]["fingerprint"], "Art");
        assert_eq!(json["criteria"]["window"], "all");
        assert_eq!(json["locale"], "en");
    }
}
