//! Issue repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::models::{Issue, IssueFilter, IssueStatistics, NewIssue, UpdateIssueRequest};

const ISSUE_COLUMNS: &str = "id, issue_id, title, description, severity, priority, status, \
                             created_by, created_at, updated_at";

/// Escape LIKE wildcards so user text is matched literally
pub fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Append the WHERE clause for `filter`
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &IssueFilter) {
    builder.push(" WHERE created_by = ").push_bind(filter.owner);

    if let Some(text) = &filter.text {
        let pattern = format!("%{}%", escape_like(text));
        builder
            .push(" AND (title ILIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR description ILIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }

    if let Some(severity) = filter.severity {
        builder.push(" AND severity = ").push_bind(severity);
    }

    if let Some(priority) = filter.priority {
        builder.push(" AND priority = ").push_bind(priority);
    }

    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status);
    }
}

/// Issue repository for database operations
#[derive(Clone)]
pub struct IssueRepository {
    pool: PgPool,
}

impl IssueRepository {
    /// Create a new issue repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new issue
    pub async fn create(&self, new_issue: &NewIssue) -> DatabaseResult<Issue> {
        info!("Creating issue for user: {}", new_issue.created_by);

        sqlx::query_as::<_, Issue>(&format!(
            r#"
            INSERT INTO issues (title, description, severity, priority, status, created_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ISSUE_COLUMNS}
            "#
        ))
        .bind(&new_issue.title)
        .bind(&new_issue.description)
        .bind(new_issue.severity)
        .bind(new_issue.priority)
        .bind(new_issue.status)
        .bind(new_issue.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    /// Get an issue by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Issue>> {
        sqlx::query_as::<_, Issue>(&format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// List issues matching `filter`, newest first
    ///
    /// `window` is `(limit, offset)`; `None` returns every match.
    pub async fn list(
        &self,
        filter: &IssueFilter,
        window: Option<(i64, i64)>,
    ) -> DatabaseResult<Vec<Issue>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {ISSUE_COLUMNS} FROM issues"));
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY created_at DESC, issue_id DESC");

        if let Some((limit, offset)) = window {
            builder
                .push(" LIMIT ")
                .push_bind(limit)
                .push(" OFFSET ")
                .push_bind(offset);
        }

        builder
            .build_query_as::<Issue>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Count issues matching `filter`
    pub async fn count(&self, filter: &IssueFilter) -> DatabaseResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM issues");
        push_filter(&mut builder, filter);

        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    /// Apply a partial update to an issue owned by `owner`
    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &UpdateIssueRequest,
    ) -> DatabaseResult<Option<Issue>> {
        info!("Updating issue: {}", id);

        sqlx::query_as::<_, Issue>(&format!(
            r#"
            UPDATE issues
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                severity = COALESCE($5, severity),
                priority = COALESCE($6, priority),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1 AND created_by = $2
            RETURNING {ISSUE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.severity)
        .bind(update.priority)
        .bind(update.status)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    /// Delete an issue owned by `owner`
    pub async fn delete(&self, id: Uuid, owner: Uuid) -> DatabaseResult<bool> {
        info!("Deleting issue: {}", id);

        let result = sqlx::query("DELETE FROM issues WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Count the issues of `owner` by status
    pub async fn statistics(&self, owner: Uuid) -> DatabaseResult<IssueStatistics> {
        sqlx::query_as::<_, IssueStatistics>(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = 'open') AS open,
                   COUNT(*) FILTER (WHERE status = 'in-progress') AS in_progress,
                   COUNT(*) FILTER (WHERE status = 'testing') AS test,
                   COUNT(*) FILTER (WHERE status = 'resolved') AS resolved,
                   COUNT(*) FILTER (WHERE status = 'closed') AS closed
            FROM issues
            WHERE created_by = $1
            "#,
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}
