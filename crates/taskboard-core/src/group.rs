//! Day-bucket grouping.

use crate::model::{Day, Task};

/// Tasks grouped into the eight fixed day buckets.
///
/// Every bucket is always present, in display order, even when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayGroups<'a> {
    buckets: [Vec<&'a Task>; 8],
}

impl<'a> DayGroups<'a> {
    /// Tasks in `day`'s bucket, in input order.
    #[must_use]
    pub fn get(&self, day: Day) -> &[&'a Task] {
        &self.buckets[day.index()]
    }

    /// All buckets in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Day, &[&'a Task])> + '_ {
        Day::ALL
            .into_iter()
            .zip(self.buckets.iter().map(Vec::as_slice))
    }

    /// Total number of grouped tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}

/// Group tasks by day, preserving input order inside each bucket.
pub fn group_by_day<'a, I>(tasks: I) -> DayGroups<'a>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut buckets: [Vec<&'a Task>; 8] = Default::default();
    for task in tasks {
        buckets[task.bucket().index()].push(task);
    }
    DayGroups { buckets }
}
