//! Resolving a run mode into the calendar dates to process

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Today,
    ThisWeek,
    LastWeek,
}

/// The dates a run covers: today itself, or Monday through Friday of the
/// current or previous week. Week ranges are always ordered Mon to Fri.
pub fn resolve_dates(mode: RunMode, today: NaiveDate) -> Vec<NaiveDate> {
    match mode {
        RunMode::Today => vec![today],
        RunMode::ThisWeek => workweek_of(today),
        RunMode::LastWeek => workweek_of(today - Duration::days(7)),
    }
}

fn workweek_of(date: NaiveDate) -> Vec<NaiveDate> {
    let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (0..5).map(|offset| monday + Duration::days(offset)).collect()
}

/// Index into a ticket's Mon..Fri schedule for the given date. Weekend dates
/// have no schedule column, which can only happen on a weekend "today" run.
pub fn schedule_index(date: NaiveDate) -> Result<usize> {
    let index = date.weekday().num_days_from_monday() as usize;
    if index > 4 {
        bail!(
            "{} is a {}, and the schedule only covers Monday to Friday",
            date,
            date.weekday()
        );
    }
    Ok(index)
}
