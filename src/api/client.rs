use std::time::Duration;

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::NaiveDate;
use log::debug;
use reqwest::blocking::Client;
use reqwest::header;
use thiserror::Error;

use super::types::*;
use crate::config::Config;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A failed call against the JIRA REST API. Every variant is fatal: the tool
/// performs no retries, so whatever bubbles up here ends the run.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response whose body carried JIRA's structured error payload.
    #[error("{context}: {codes}\n{messages}")]
    Remote {
        context: String,
        codes: String,
        messages: String,
    },
    /// Non-2xx response with a body we could not interpret.
    #[error("{context}: HTTP {status}\n{body}")]
    Http {
        context: String,
        status: reqwest::StatusCode,
        body: String,
    },
    /// Connection failure, timeout, or an unreadable response.
    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: reqwest::Error,
    },
}

pub struct JiraClient {
    client: Client,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config.base_url(), &config.email, &config.api_token)
    }

    pub fn with_base_url(base_url: String, email: &str, token: &str) -> Result<Self> {
        let auth_string = format!("{}:{}", email, token);
        let auth_header = format!("Basic {}", STANDARD.encode(auth_string));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            auth_header,
        })
    }

    fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str, context: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::ACCEPT, "application/json")
            .send()
            .map_err(|source| ApiError::Network {
                context: context.to_string(),
                source,
            })?;

        Self::read_response(response, context)
    }

    fn post<T: serde::de::DeserializeOwned, B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        context: &str,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, &self.auth_header)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .map_err(|source| ApiError::Network {
                context: context.to_string(),
                source,
            })?;

        Self::read_response(response, context)
    }

    /// Deserialize a 2xx body, or turn a failure into the most informative
    /// error available: JIRA's `errorMessages`/`errors` fields when the body
    /// parses as JSON, the raw status and body otherwise.
    fn read_response<T: serde::de::DeserializeOwned>(
        response: reqwest::blocking::Response,
        context: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().map_err(|source| ApiError::Network {
                context: context.to_string(),
                source,
            });
        }

        let body = response.text().unwrap_or_default();
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&body) {
            let messages = value
                .get("errorMessages")
                .and_then(|m| m.as_array())
                .map(|list| {
                    list.iter()
                        .filter_map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                });
            let codes = value.get("errors").map(|e| e.to_string());
            if messages.is_some() || codes.is_some() {
                return Err(ApiError::Remote {
                    context: context.to_string(),
                    codes: codes.unwrap_or_else(|| "{}".to_string()),
                    messages: messages.unwrap_or_default(),
                });
            }
        }

        Err(ApiError::Http {
            context: context.to_string(),
            status,
            body,
        })
    }

    /// Resolve the account id for an email through the user picker. The
    /// first match wins; an empty result is a hard error, never an empty id.
    pub fn resolve_account_id(&self, email: &str) -> Result<String> {
        let endpoint = format!("/groupuserpicker?query={}", urlencoding::encode(email));
        let response: UserPickerResponse =
            self.get(&endpoint, "Failed to get account ID for your user")?;

        let user = response
            .users
            .users
            .into_iter()
            .next()
            .with_context(|| format!("no JIRA user matched {:?}", email))?;
        Ok(user.account_id)
    }

    /// Get every worklog on a ticket.
    pub fn list_worklogs(&self, ticket_id: &str) -> Result<Vec<Worklog>> {
        let endpoint = format!("/issue/{}/worklog", ticket_id);
        let context = format!("Failed to get worklogs from {}", ticket_id);
        let response: WorklogResponse = self.get(&endpoint, &context)?;
        Ok(response.worklogs)
    }

    /// Check whether the account already logged work on the ticket for the
    /// date. The endpoint's startAfter/startBefore filters are unreliable,
    /// so all entries are fetched and filtered here on the client.
    pub fn has_worklog_on(&self, ticket_id: &str, date: NaiveDate, account_id: &str) -> Result<bool> {
        let iso_date = date.format("%Y-%m-%d").to_string();
        let worklogs = self.list_worklogs(ticket_id)?;

        Ok(worklogs
            .iter()
            .any(|w| w.started.starts_with(&iso_date) && w.author.account_id == account_id))
    }

    /// Create a worklog on a ticket.
    pub fn create_worklog(&self, ticket_id: &str, request: &CreateWorklogRequest) -> Result<Worklog> {
        let endpoint = format!("/issue/{}/worklog", ticket_id);
        let context = format!("Failed to log work in {}", ticket_id);
        Ok(self.post(&endpoint, request, &context)?)
    }

    /// Search tickets whose summary matches the given text.
    pub fn search_issues_by_summary(&self, text: &str) -> Result<IssuePickerResponse> {
        let jql = format!("summary ~ '{}'", text);
        let endpoint = format!("/issue/picker?currentJQL={}", urlencoding::encode(&jql));
        let context = format!("Failed to search for ticket {:?}", text);
        Ok(self.get(&endpoint, &context)?)
    }
}
