//! Deload week classification.
//!
//! The third week of every program is a recovery week; programs of ten weeks
//! or longer get a second one in week seven.

use crate::WeekIndex;
use std::collections::BTreeSet;

const FIRST_DELOAD: WeekIndex = WeekIndex(2);
const SECOND_DELOAD: WeekIndex = WeekIndex(6);
const SECOND_DELOAD_MIN_WEEKS: u32 = 10;

/// 0-based indices of the automatically scheduled deload weeks
pub fn deload_weeks(total_weeks: u32) -> BTreeSet<WeekIndex> {
    let mut weeks = BTreeSet::new();
    if total_weeks > FIRST_DELOAD.0 {
        weeks.insert(FIRST_DELOAD);
    }
    if total_weeks >= SECOND_DELOAD_MIN_WEEKS {
        weeks.insert(SECOND_DELOAD);
    }
    weeks
}

pub fn is_deload_week(week: WeekIndex, total_weeks: u32) -> bool {
    deload_weeks(total_weeks).contains(&week)
}
