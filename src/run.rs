//! The run orchestrator: date range x ticket schedule, lookup then submit

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, info};

use crate::api::{started_timestamp, CreateWorklogRequest, JiraClient, TimeSpent};
use crate::config::{Config, TicketSchedule};
use crate::dates::{resolve_dates, schedule_index, RunMode};

const DEFAULT_COMMENT: &str = "Logging some time for today";

/// Walk the resolved date range in order and submit every ticket's scheduled
/// time for each day. Any hard failure (resolution, network, non-2xx) aborts
/// the remaining work; duplicates and dry-run skips are informational only.
pub fn execute(
    client: &JiraClient,
    config: &Config,
    mode: RunMode,
    confirm: bool,
    today: NaiveDate,
) -> Result<()> {
    if !confirm {
        info!("Dry run: no worklogs will be created (pass --confirm to submit)");
    }

    // Resolved once and reused as the author filter for every lookup.
    let account_id = client.resolve_account_id(&config.email)?;
    debug!("Resolved account id {}", account_id);

    for date in resolve_dates(mode, today) {
        info!("Logging work for: {}", date);
        let weekday = schedule_index(date)?;

        for ticket in &config.tickets {
            log_ticket(client, ticket, date, weekday, &account_id, confirm)?;
        }
    }

    Ok(())
}

fn log_ticket(
    client: &JiraClient,
    ticket: &TicketSchedule,
    date: NaiveDate,
    weekday: usize,
    account_id: &str,
    confirm: bool,
) -> Result<()> {
    let duration = &ticket.daily_time_spent[weekday];
    let time_spent = match TimeSpent::parse(duration)
        .with_context(|| format!("bad schedule entry for ticket {:?}", ticket.id))?
    {
        TimeSpent::Zero => {
            debug!("Nothing scheduled in {} for {}", ticket.id, date);
            return Ok(());
        }
        TimeSpent::Spent(value) => value,
    };

    let ticket_id = resolve_ticket_id(client, &ticket.id)?;

    if client.has_worklog_on(&ticket_id, date, account_id)? {
        info!("Work is already logged in {} for {}", ticket_id, date);
        return Ok(());
    }

    if !confirm {
        info!("Would log {} in {} for {} (dry run)", time_spent, ticket_id, date);
        return Ok(());
    }

    let comment = ticket.comment.as_deref().unwrap_or(DEFAULT_COMMENT);
    let request = CreateWorklogRequest::new(started_timestamp(date), &time_spent, comment);
    client.create_worklog(&ticket_id, &request)?;
    info!("Logged {} in {} for {}", time_spent, ticket_id, date);

    Ok(())
}

/// Identifiers containing whitespace are treated as free-text summaries and
/// resolved through the issue picker (first issue of the first section);
/// anything else is assumed to already be a ticket key.
fn resolve_ticket_id(client: &JiraClient, identifier: &str) -> Result<String> {
    if !identifier.contains(char::is_whitespace) {
        return Ok(identifier.to_string());
    }

    let response = client.search_issues_by_summary(identifier)?;
    response
        .sections
        .into_iter()
        .next()
        .and_then(|section| section.issues.into_iter().next())
        .map(|issue| issue.key)
        .with_context(|| format!("no ticket matched the summary {:?}", identifier))
}
