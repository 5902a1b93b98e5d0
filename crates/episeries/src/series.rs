//! Continuous daily series and the metrics derived from them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::continuous_range;
use crate::error::Result;
use crate::record::Counts;

/// Days summed on each side of the reproduction ratio.
const RT_WINDOW: usize = 4;

/// One day of a node's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    /// Cumulative counts.
    pub totals: Counts,
    /// Change against the previous day; the first day compares to zero.
    pub change: Counts,
    /// Effective reproduction estimate. `None` when undefined.
    pub rt: Option<f64>,
    /// Days needed to resolve the day's new cases. `None` when undefined.
    pub time_to_resolve: Option<i64>,
}

/// Expand sparse daily totals into a gap-free series.
///
/// A day with no value carries the previous day's totals, so its change is
/// zero. Fails with `EmptyInput` when `daily` is empty.
pub fn build_series(daily: &BTreeMap<NaiveDate, Counts>) -> Result<Vec<DailyEntry>> {
    let range = continuous_range(daily.keys().copied())?;

    let mut totals = Vec::with_capacity(range.len());
    let mut last = Counts::default();
    for day in range {
        if let Some(counts) = daily.get(&day) {
            last = *counts;
        }
        totals.push((day, last));
    }

    let changes: Vec<Counts> = totals
        .iter()
        .scan(Counts::default(), |previous, (_, today)| {
            let change = *today - *previous;
            *previous = *today;
            Some(change)
        })
        .collect();

    let new_cases: Vec<i64> = changes.iter().map(|c| c.confirmed).collect();
    let rates = reproduction_rates(&new_cases);
    let resolve = times_to_resolve(&changes);

    Ok(totals
        .into_iter()
        .zip(changes)
        .zip(rates.into_iter().zip(resolve))
        .map(|(((date, totals), change), (rt, time_to_resolve))| DailyEntry {
            date,
            totals,
            change,
            rt,
            time_to_resolve,
        })
        .collect())
}

/// Reproduction estimate for every day.
///
/// `Rt(i)` is the sum of new cases over days `i-3..=i` divided by the sum
/// over days `i-7..=i-4`. The value is `None` until both windows fit in the
/// series, and when the earlier window is not positive.
pub fn reproduction_rates(new_cases: &[i64]) -> Vec<Option<f64>> {
    // Sum of the RT_WINDOW days ending at `end` (inclusive)
    let window_sum = |end: usize| -> i64 {
        new_cases[end + 1 - RT_WINDOW..=end]
            .iter()
            .fold(0i64, |sum, n| sum.saturating_add(*n))
    };

    (0..new_cases.len())
        .map(|i| {
            if i + 1 < 2 * RT_WINDOW {
                return None;
            }
            let recent = window_sum(i);
            let earlier = window_sum(i - RT_WINDOW);

            (earlier > 0).then(|| recent as f64 / earlier as f64)
        })
        .collect()
}

/// Days needed to resolve each day's new cases.
///
/// New cases are matched first-in first-out against the new resolutions
/// (recoveries plus deaths) of the series. The value for day `i` is the
/// distance to the day its last case was matched, never negative. It is
/// `None` when the day has no new cases, or when its cases, or those of
/// any earlier day, are never fully resolved.
pub fn times_to_resolve(changes: &[Counts]) -> Vec<Option<i64>> {
    let mut result = Vec::with_capacity(changes.len());
    let mut next_resolved = 0usize;
    let mut pool = 0i64;
    let mut exhausted = false;

    for (day, change) in changes.iter().enumerate() {
        let mut pending = change.confirmed;
        if exhausted || pending <= 0 {
            result.push(None);
            continue;
        }

        let mut days = 0i64;
        loop {
            if pool > 0 {
                (pending, pool) = settle(pending, pool);
                if pending == 0 {
                    days = next_resolved as i64 - day as i64 - 1;
                    break;
                }
            }

            if next_resolved >= changes.len() {
                exhausted = true;
                break;
            }

            (pending, pool) = settle(pending, changes[next_resolved].resolved());
            days = next_resolved as i64 - day as i64;
            next_resolved += 1;

            if pending == 0 {
                break;
            }
        }

        result.push((!exhausted).then_some(days.max(0)));
    }

    result
}

/// Match `resolved` against `pending`; returns what is left of each.
fn settle(pending: i64, resolved: i64) -> (i64, i64) {
    if resolved <= pending {
        (pending - resolved, 0)
    } else {
        (0, resolved - pending)
    }
}
