use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
}

/// Response from `/groupuserpicker` - users are nested one level down.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPickerResponse {
    pub users: UserPickerUsers,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPickerUsers {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worklog {
    pub id: String,
    pub author: User,
    #[serde(rename = "timeSpent")]
    pub time_spent: String,
    pub started: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorklogResponse {
    pub worklogs: Vec<Worklog>,
}

/// Response from the issue picker endpoint, used for free-text ticket lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuePickerResponse {
    pub sections: Vec<IssuePickerSection>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePickerSection {
    pub issues: Vec<PickedIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickedIssue {
    pub key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateWorklogRequest {
    pub comment: serde_json::Value,
    pub started: String,
    #[serde(rename = "timeSpent")]
    pub time_spent: String,
}

impl CreateWorklogRequest {
    /// Build the creation payload. The comment is wrapped in a minimal ADF
    /// document (one paragraph, one text node), which is the only shape the
    /// worklog endpoint accepts for rich-text comments.
    pub fn new(started: String, time_spent: &str, comment: &str) -> Self {
        let comment = serde_json::json!({
            "type": "doc",
            "version": 1,
            "content": [{
                "type": "paragraph",
                "content": [{
                    "type": "text",
                    "text": comment
                }]
            }]
        });

        Self {
            comment,
            started,
            time_spent: time_spent.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_wraps_comment_in_adf_document() {
        let req = CreateWorklogRequest::new(
            "2025-03-11T09:00:00.000+0000".to_string(),
            "4h",
            "Sprint work",
        );

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["timeSpent"], "4h");
        assert_eq!(json["started"], "2025-03-11T09:00:00.000+0000");
        assert_eq!(json["comment"]["type"], "doc");
        assert_eq!(json["comment"]["version"], 1);
        assert_eq!(
            json["comment"]["content"][0]["content"][0]["text"],
            "Sprint work"
        );
    }

    #[test]
    fn worklog_response_deserializes_author_account_id() {
        let body = r#"{
            "worklogs": [{
                "id": "10042",
                "author": {"accountId": "5b10a2844c20165700ede21g", "displayName": "Mia"},
                "timeSpent": "3h 20m",
                "started": "2025-03-11T09:00:00.000+0000"
            }]
        }"#;

        let parsed: WorklogResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.worklogs.len(), 1);
        assert_eq!(parsed.worklogs[0].author.account_id, "5b10a2844c20165700ede21g");
        assert_eq!(parsed.worklogs[0].time_spent, "3h 20m");
    }
}
