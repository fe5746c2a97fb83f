//! SQLite storage implementation.
//!
//! File-based backend used by the worker. The schema is applied on connect
//! from `migrations/001_init.sql`.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::{FromRow, QueryBuilder, Sqlite};
use tracing::debug;

use crate::error::{DiscoveryError, Result};
use crate::traits::store::{BusinessStore, TaskStore};
use crate::types::{
    business::{Business, BusinessId, NewBusiness, NewBusinessTag, NewBusinessTip},
    task::{Task, TaskId, TaskStatus, TaskUpdate},
};

const INIT_SCHEMA: &str = include_str!("../../migrations/001_init.sql");

const TASK_COLUMNS: &str =
    "id, url, platform, status, input_json, gpt_response, business_id, error";

/// SQLite-backed task queue and business store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the given database URL and apply the schema.
    ///
    /// # Example URLs
    /// - `sqlite://discovery.db?mode=rwc` - File-based, created if missing
    /// - `sqlite::memory:` - In-memory (prefer [`SqliteStore::in_memory`])
    pub async fn new(database_url: &str) -> Result<Self> {
        Self::connect(database_url, 5).await
    }

    /// Create an in-memory store (for testing).
    ///
    /// Every pooled connection to `:memory:` opens its own database, so the
    /// pool is capped at one connection.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        debug!(database_url = %database_url, "SQLite store ready");
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<()> {
        sqlx::raw_sql(INIT_SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Enqueue a `todo` task.
    pub async fn create_task(&self, url: &str, platform: &str) -> Result<TaskId> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO business_gpt_analysis_tasks (url, platform, status) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(url)
        .bind(platform)
        .bind(TaskStatus::Todo.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    pub async fn find_task(&self, id: TaskId) -> Result<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM business_gpt_analysis_tasks WHERE id = ?",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(TaskRow::into_task)
            .transpose()
    }

    pub async fn find_business(&self, id: BusinessId) -> Result<Option<Business>> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, scraped_url, name, description, url, revenue, revenue_tactics, technical_details
            FROM businesses
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(business)
    }

    pub async fn tips_for(&self, business_id: BusinessId) -> Result<Vec<String>> {
        let tips = sqlx::query_scalar::<_, String>(
            "SELECT tip FROM business_tips WHERE business_id = ? ORDER BY id",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tips)
    }

    pub async fn tags_for(&self, business_id: BusinessId) -> Result<Vec<String>> {
        let tags = sqlx::query_scalar::<_, String>(
            "SELECT tag FROM business_tags WHERE business_id = ? ORDER BY id",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tags)
    }
}

// Row types for sqlx queries
#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    url: String,
    platform: String,
    status: String,
    input_json: Option<String>,
    gpt_response: Option<String>,
    business_id: Option<i64>,
    error: Option<String>,
}

impl TaskRow {
    fn into_task(self) -> Result<Task> {
        let status: TaskStatus = self
            .status
            .parse()
            .map_err(|e: String| DiscoveryError::Persistence(e.into()))?;

        Ok(Task {
            id: self.id,
            url: self.url,
            platform: self.platform,
            status,
            input_json: self.input_json,
            gpt_response: self.gpt_response,
            business_id: self.business_id,
            error: self.error,
        })
    }
}

#[async_trait]
impl TaskStore for SqliteStore {
    async fn find_one_by_status(&self, status: TaskStatus) -> Result<Option<Task>> {
        let sql = format!(
            "SELECT {} FROM business_gpt_analysis_tasks WHERE status = ? LIMIT 1",
            TASK_COLUMNS
        );
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(status.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(TaskRow::into_task)
            .transpose()
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE business_gpt_analysis_tasks SET ");
        let mut columns = builder.separated(", ");
        if let Some(status) = update.status {
            columns.push("status = ").push_bind_unseparated(status.as_str());
        }
        if let Some(input_json) = &update.input_json {
            columns.push("input_json = ").push_bind_unseparated(input_json.clone());
        }
        if let Some(gpt_response) = &update.gpt_response {
            columns
                .push("gpt_response = ")
                .push_bind_unseparated(gpt_response.clone());
        }
        if let Some(business_id) = update.business_id {
            columns.push("business_id = ").push_bind_unseparated(business_id);
        }
        if let Some(error) = &update.error {
            columns.push("error = ").push_bind_unseparated(error.clone());
        }
        builder.push(" WHERE id = ").push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DiscoveryError::Persistence(
                format!("task {} does not exist", id).into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BusinessStore for SqliteStore {
    async fn insert_business(&self, business: &NewBusiness) -> Result<BusinessId> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO businesses (scraped_url, name, description, url, revenue, revenue_tactics, technical_details)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&business.scraped_url)
        .bind(&business.name)
        .bind(&business.description)
        .bind(&business.url)
        .bind(business.revenue)
        .bind(&business.revenue_tactics)
        .bind(&business.technical_details)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_tips(&self, tips: &[NewBusinessTip]) -> Result<()> {
        if tips.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO business_tips (business_id, tip) ");
        builder.push_values(tips, |mut row, tip| {
            row.push_bind(tip.business_id).push_bind(tip.tip.clone());
        });
        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_tags(&self, tags: &[NewBusinessTag]) -> Result<()> {
        if tags.is_empty() {
            return Ok(());
        }

        let mut builder = QueryBuilder::<Sqlite>::new("INSERT INTO business_tags (business_id, tag) ");
        builder.push_values(tags, |mut row, tag| {
            row.push_bind(tag.business_id).push_bind(tag.tag.clone());
        });
        builder.build().execute(&self.pool).await?;
        Ok(())
    }
}
