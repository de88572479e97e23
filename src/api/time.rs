//! Duration classification and timestamp formatting for the worklog API

use anyhow::{bail, Result};
use chrono::NaiveDate;

/// A schedule duration after classification: either "nothing to log today"
/// or a JIRA duration string passed through verbatim (the API parses its own
/// syntax, so no numeric conversion happens on our side).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSpent {
    Zero,
    Spent(String),
}

impl TimeSpent {
    /// Classify a schedule entry. Accepts the literal zero forms "0" and
    /// "0h", or a positive duration shaped like "3h", "45m" or "3h 30m".
    /// Anything else is rejected so a typo never reaches the API.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        if trimmed == "0" || trimmed == "0h" {
            return Ok(TimeSpent::Zero);
        }

        let parts: Vec<&str> = trimmed.split_whitespace().collect();
        let well_formed = match parts.as_slice() {
            [single] => has_unit(single, 'h') || has_unit(single, 'm'),
            [hours, minutes] => has_unit(hours, 'h') && has_unit(minutes, 'm'),
            _ => false,
        };

        if !well_formed {
            bail!(
                "invalid duration {:?}: expected \"0\", \"<N>h\", \"<N>m\" or \"<N>h <N>m\"",
                input
            );
        }

        Ok(TimeSpent::Spent(parts.join(" ")))
    }
}

fn has_unit(part: &str, unit: char) -> bool {
    part.strip_suffix(unit)
        .map_or(false, |digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Build the fixed "started" timestamp for a worklog: 09:00 UTC on the given
/// date, in the offset format JIRA expects (no colon in the zone).
pub fn started_timestamp(date: NaiveDate) -> String {
    format!("{}T09:00:00.000+0000", date.format("%Y-%m-%d"))
}
