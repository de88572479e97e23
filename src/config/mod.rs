use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable carrying the JIRA API token. The token never lives
/// in the config file.
pub const API_TOKEN_VAR: &str = "JIRA_API_TOKEN";

/// One ticket's weekly schedule: how much time to log per weekday, Monday
/// through Friday. The id may also be a free-text summary, resolved against
/// JIRA at run time.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSchedule {
    pub id: String,
    pub daily_time_spent: Vec<String>,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jira_domain: String,
    pub email: String,
    pub tickets: Vec<TicketSchedule>,
    #[serde(skip)]
    pub api_token: String,
}

impl Config {
    /// Read the config file (explicit path or the platform default), pull
    /// the API token from the environment, and validate the result. Any
    /// problem here stops the run before a single request is made.
    pub fn load(path_override: Option<&Path>) -> Result<Self> {
        let path = match path_override {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_json(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        config.api_token = std::env::var(API_TOKEN_VAR)
            .with_context(|| format!("{} is not set in the environment", API_TOKEN_VAR))?;

        Ok(config)
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(contents).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.jira_domain.trim().is_empty() {
            bail!("jira_domain must not be empty");
        }
        if self.email.trim().is_empty() {
            bail!("email must not be empty");
        }
        for ticket in &self.tickets {
            if ticket.id.trim().is_empty() {
                bail!("every ticket needs an id");
            }
            if ticket.daily_time_spent.len() != 5 {
                bail!(
                    "ticket {:?} has {} daily_time_spent entries, expected 5 (Mon..Fri)",
                    ticket.id,
                    ticket.daily_time_spent.len()
                );
            }
        }
        Ok(())
    }

    fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "jiralog", "jiralog")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn base_url(&self) -> String {
        // Clean up the domain - remove protocol, trailing slashes, paths
        let domain = self
            .jira_domain
            .trim()
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .split('/')
            .next()
            .unwrap_or(&self.jira_domain);

        format!("https://{}/rest/api/3", domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VALID: &str = r#"{
        "jira_domain": "example.atlassian.net",
        "email": "me@example.com",
        "tickets": [
            {"id": "IACC-38", "daily_time_spent": ["4h", "4h", "4h", "4h", "4h"]},
            {"id": "fix login bug", "daily_time_spent": ["0", "0", "1h", "0", "0"], "comment": "Bugfix work"}
        ]
    }"#;

    #[test]
    fn parses_a_valid_config() {
        let config = Config::from_json(VALID).unwrap();
        assert_eq!(config.email, "me@example.com");
        assert_eq!(config.tickets.len(), 2);
        assert_eq!(config.tickets[1].comment.as_deref(), Some("Bugfix work"));
        assert_eq!(config.base_url(), "https://example.atlassian.net/rest/api/3");
    }

    #[test]
    fn base_url_strips_protocol_and_trailing_slash() {
        let mut config = Config::from_json(VALID).unwrap();
        config.jira_domain = "https://example.atlassian.net/".to_string();
        assert_eq!(config.base_url(), "https://example.atlassian.net/rest/api/3");
    }

    #[test]
    fn rejects_wrong_schedule_length() {
        let contents = r#"{
            "jira_domain": "example.atlassian.net",
            "email": "me@example.com",
            "tickets": [{"id": "IACC-38", "daily_time_spent": ["4h", "4h"]}]
        }"#;
        let err = Config::from_json(contents).unwrap_err();
        assert!(err.to_string().contains("expected 5"));
    }

    #[test]
    fn rejects_empty_email() {
        let contents = r#"{"jira_domain": "example.atlassian.net", "email": "", "tickets": []}"#;
        assert!(Config::from_json(contents).is_err());
    }

    #[test]
    fn load_reports_the_offending_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(format!("{:#}", err).contains(&file.path().display().to_string()));
    }
}
