//! Issue model, classification enums and listing payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// How badly an issue hurts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "issue_severity", rename_all = "lowercase")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

/// How soon an issue should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "issue_priority", rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Workflow state of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(type_name = "issue_status", rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Testing,
    Resolved,
    Closed,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
        }
    }
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in-progress",
            Status::Testing => "testing",
            Status::Resolved => "resolved",
            Status::Closed => "closed",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            other => Err(format!("Invalid severity: {}", other)),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "normal" => Ok(Priority::Normal),
            "high" => Ok(Priority::High),
            other => Err(format!("Invalid priority: {}", other)),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Status::Open),
            "in-progress" => Ok(Status::InProgress),
            "testing" => Ok(Status::Testing),
            "resolved" => Ok(Status::Resolved),
            "closed" => Ok(Status::Closed),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue entity
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: Uuid,
    /// Sequential number shown to users
    pub issue_id: i64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub priority: Priority,
    pub status: Status,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Issue {
    /// Whether `user_id` owns this issue
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

/// New issue creation payload
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub priority: Priority,
    pub status: Status,
    pub created_by: Uuid,
}

/// Request for issue creation
#[derive(Debug, Deserialize)]
pub struct CreateIssueRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

/// Request for a partial issue update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIssueRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

/// Raw query string of the issue listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueQuery {
    /// Page number (1-based); absent means no pagination
    pub page: Option<String>,
    /// Free text matched against title and description
    pub field: Option<String>,
    pub severity: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
}

impl IssueQuery {
    /// Parse the requested page, `None` when pagination was not asked for
    pub fn page_number(&self) -> Result<Option<u64>, String> {
        match non_empty(&self.page) {
            None => Ok(None),
            Some(raw) => match raw.parse::<u64>() {
                Ok(page) if page >= 1 => Ok(Some(page)),
                _ => Err("Invalid page number".to_string()),
            },
        }
    }
}

/// Validated listing filter, always scoped to one owner
#[derive(Debug, Clone, PartialEq)]
pub struct IssueFilter {
    pub owner: Uuid,
    pub text: Option<String>,
    pub severity: Option<Severity>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
}

impl IssueFilter {
    /// Filter matching every issue of `owner`
    pub fn for_owner(owner: Uuid) -> Self {
        Self {
            owner,
            text: None,
            severity: None,
            priority: None,
            status: None,
        }
    }

    /// Build a filter from query parameters; empty values count as absent
    pub fn from_query(owner: Uuid, query: &IssueQuery) -> Result<Self, String> {
        Ok(Self {
            owner,
            text: non_empty(&query.field).map(str::to_string),
            severity: non_empty(&query.severity)
                .map(str::parse::<Severity>)
                .transpose()?,
            priority: non_empty(&query.priority)
                .map(str::parse::<Priority>)
                .transpose()?,
            status: non_empty(&query.status)
                .map(str::parse::<Status>)
                .transpose()?,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Number of pages needed for `total_count` items
pub fn page_count(total_count: i64, page_size: u32) -> i64 {
    if page_size == 0 {
        return 0;
    }
    let page_size = i64::from(page_size);
    (total_count + page_size - 1) / page_size
}

/// Rows skipped before `page`, clamped to the largest offset Postgres accepts
pub fn page_offset(page: u64, page_size: u32) -> i64 {
    let offset = page.saturating_sub(1).saturating_mul(u64::from(page_size));
    i64::try_from(offset).unwrap_or(i64::MAX)
}

/// One page of issues
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePage {
    pub total_count: i64,
    pub page_count: i64,
    pub page_size: u32,
    pub page: u64,
    pub issues: Vec<Issue>,
}

impl IssuePage {
    pub fn new(issues: Vec<Issue>, total_count: i64, page: u64, page_size: u32) -> Self {
        Self {
            total_count,
            page_count: page_count(total_count, page_size),
            page_size,
            page,
            issues,
        }
    }
}

/// Issue listing, paged or complete
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum IssueListing {
    Paged(IssuePage),
    All(Vec<Issue>),
}

/// Issue counts of one user, by status
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatistics {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub test: i64,
    pub resolved: i64,
    pub closed: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_value(Status::InProgress).unwrap(), json!("in-progress"));
        assert_eq!(serde_json::to_value(Severity::High).unwrap(), json!("high"));
        assert_eq!(serde_json::to_value(Priority::Normal).unwrap(), json!("normal"));
        assert_eq!("in-progress".parse::<Status>().unwrap(), Status::InProgress);
        assert!("urgent".parse::<Priority>().is_err());
        assert!("High".parse::<Severity>().is_err());
    }

    #[test]
    fn test_create_request_defaults() {
        let request: CreateIssueRequest =
            serde_json::from_value(json!({"title": "Crash", "description": "On save"})).unwrap();
        assert_eq!(request.severity, Severity::Medium);
        assert_eq!(request.priority, Priority::Normal);
        assert_eq!(request.status, Status::Open);
    }

    #[test]
    fn test_create_request_rejects_unknown_status() {
        let result: Result<CreateIssueRequest, _> = serde_json::from_value(
            json!({"title": "Crash", "description": "On save", "status": "done"}),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_filter_from_query() {
        let owner = Uuid::new_v4();
        let query = IssueQuery {
            page: Some("2".to_string()),
            field: Some("  login ".to_string()),
            severity: Some("high".to_string()),
            priority: Some(String::new()),
            status: Some("open".to_string()),
        };

        let filter = IssueFilter::from_query(owner, &query).unwrap();
        assert_eq!(filter.owner, owner);
        assert_eq!(filter.text.as_deref(), Some("login"));
        assert_eq!(filter.severity, Some(Severity::High));
        assert_eq!(filter.priority, None);
        assert_eq!(filter.status, Some(Status::Open));
    }

    #[test]
    fn test_filter_rejects_unknown_values() {
        let query = IssueQuery {
            status: Some("done".to_string()),
            ..Default::default()
        };
        let err = IssueFilter::from_query(Uuid::new_v4(), &query).unwrap_err();
        assert_eq!(err, "Invalid status: done");
    }

    #[test]
    fn test_page_number_parsing() {
        let query = |page: &str| IssueQuery {
            page: Some(page.to_string()),
            ..Default::default()
        };

        assert_eq!(IssueQuery::default().page_number(), Ok(None));
        assert_eq!(query("").page_number(), Ok(None));
        assert_eq!(query("3").page_number(), Ok(Some(3)));
        assert!(query("0").page_number().is_err());
        assert!(query("-1").page_number().is_err());
        assert!(query("abc").page_number().is_err());
        assert_eq!(query("5000000000").page_number(), Ok(Some(5_000_000_000)));
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
    }

    #[test]
    fn test_huge_page_offset_does_not_overflow() {
        assert_eq!(page_offset(5_000_000_000, 10), 49_999_999_990);
        assert_eq!(page_offset(u64::MAX, 10), i64::MAX);

        let page = IssuePage::new(vec![], 3, 5_000_000_000, 10);
        assert_eq!(page.page_count, 1);
        assert!(page.issues.is_empty());
    }

    #[test]
    fn test_page_beyond_range_serializes_empty_list() {
        let page = IssuePage::new(vec![], 12, 7, 10);
        let json = serde_json::to_value(IssueListing::Paged(page)).unwrap();
        assert_eq!(
            json,
            json!({"totalCount": 12, "pageCount": 2, "pageSize": 10, "page": 7, "issues": []})
        );
    }

    #[test]
    fn test_statistics_keys() {
        let stats = IssueStatistics {
            total: 3,
            in_progress: 1,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["inProgress"], 1);
        assert_eq!(json["test"], 0);
        assert_eq!(json["total"], 3);
    }
}
