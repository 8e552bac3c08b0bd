//! Daily Focus: the top three tasks, Core first, then Growth.

use std::collections::HashSet;

use crate::{Bucket, Buckets, DailyFocusItem};

pub const DAILY_FOCUS_LIMIT: usize = 3;

/// Derive the shortlist from current bucket contents. Optional tasks are
/// never eligible.
pub fn derive(buckets: &Buckets) -> Vec<DailyFocusItem> {
    buckets
        .core
        .iter()
        .chain(buckets.growth.iter())
        .take(DAILY_FOCUS_LIMIT)
        .zip(1..)
        .map(|(task, priority)| DailyFocusItem {
            priority,
            task: task.clone(),
        })
        .collect()
}

/// Clean up a shortlist supplied by the remote classifier.
///
/// Entries that are not in Core or Growth, or repeat an earlier task, are
/// dropped; the rest are ordered by their claimed priority, cut to the limit
/// and renumbered from 1. An empty result means the caller should
/// [`derive`] instead.
pub fn normalize(supplied: &[DailyFocusItem], buckets: &Buckets) -> Vec<DailyFocusItem> {
    let mut eligible: Vec<&DailyFocusItem> = supplied
        .iter()
        .filter(|item| {
            matches!(
                buckets.bucket_of(&item.task),
                Some(Bucket::Core | Bucket::Growth)
            )
        })
        .collect();
    eligible.sort_by_key(|item| item.priority);

    let mut seen = HashSet::new();
    eligible
        .into_iter()
        .filter(|item| seen.insert(item.task.as_str()))
        .take(DAILY_FOCUS_LIMIT)
        .zip(1..)
        .map(|(item, priority)| DailyFocusItem {
            priority,
            task: item.task.clone(),
        })
        .collect()
}

/// Whether `focus` satisfies the shortlist invariants against `buckets`.
pub fn is_consistent(focus: &[DailyFocusItem], buckets: &Buckets) -> bool {
    focus.len() <= DAILY_FOCUS_LIMIT
        && focus.iter().zip(1..).all(|(item, expected)| {
            item.priority == expected
                && matches!(
                    buckets.bucket_of(&item.task),
                    Some(Bucket::Core | Bucket::Growth)
                )
        })
}
