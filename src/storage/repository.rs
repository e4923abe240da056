use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{
    Cents, Entry, EntryDraft, EntryFilter, EntryId, EntryKind, EntryStatus, NewUser, User, UserId,
};

use super::MIGRATION_001_INITIAL;

/// Repository for persisting and querying users and ledger entries.
/// Cheap to clone: the connection pool is shared.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // User operations
    // ========================

    /// Save a new user and return it with the store-assigned id.
    pub async fn save_user(&self, user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password)
            .execute(&self.pool)
            .await
            .context("Failed to save user")?;

        Ok(User {
            id: result.last_insert_rowid(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
        })
    }

    /// Get a user by id.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        Ok(row.map(|row| Self::row_to_user(&row)))
    }

    /// Get a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, name, email, password FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        Ok(row.map(|row| Self::row_to_user(&row)))
    }

    /// Check whether any user is registered with the given email.
    pub async fn user_exists_by_email(&self, email: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE email = ?) AS present")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check user email")?;

        Ok(row.get::<i32, _>("present") != 0)
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> User {
        User {
            id: row.get("id"),
            name: row.get("name"),
            email: row.get("email"),
            password: row.get("password"),
        }
    }

    // ========================
    // Entry operations
    // ========================

    /// Insert a validated draft. The store assigns the id, sets the status
    /// to pending and stamps the registration date.
    pub async fn insert_entry(&self, draft: &EntryDraft) -> Result<Entry> {
        let user_id = draft.user_id.context("Entry draft has no user")?;
        let kind = draft.kind.context("Entry draft has no kind")?;
        let status = EntryStatus::Pending;
        let recorded_at = Utc::now().date_naive();

        let result = sqlx::query(
            r#"
            INSERT INTO entries (description, month, year, value_cents, user_id, kind, status, recorded_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&draft.description)
        .bind(i64::from(draft.month))
        .bind(draft.year)
        .bind(draft.value)
        .bind(user_id)
        .bind(kind.as_str())
        .bind(status.as_str())
        .bind(recorded_at.to_string())
        .execute(&self.pool)
        .await
        .context("Failed to insert entry")?;

        Ok(Entry {
            id: result.last_insert_rowid(),
            description: draft.description.clone(),
            month: draft.month,
            year: draft.year,
            value: draft.value,
            user_id,
            kind,
            status,
            recorded_at,
        })
    }

    /// Update a persisted entry. The registration date is never touched.
    pub async fn update_entry(&self, entry: &Entry) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE entries
            SET description = ?, month = ?, year = ?, value_cents = ?, kind = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(&entry.description)
        .bind(i64::from(entry.month))
        .bind(entry.year)
        .bind(entry.value)
        .bind(entry.kind.as_str())
        .bind(entry.status.as_str())
        .bind(entry.id)
        .execute(&self.pool)
        .await
        .context("Failed to update entry")?;

        Ok(())
    }

    /// Delete an entry by id.
    pub async fn delete_entry(&self, id: EntryId) -> Result<()> {
        sqlx::query("DELETE FROM entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete entry")?;
        Ok(())
    }

    /// Get an entry by id.
    pub async fn get_entry(&self, id: EntryId) -> Result<Option<Entry>> {
        let row = sqlx::query(
            r#"
            SELECT id, description, month, year, value_cents, user_id, kind, status, recorded_at
            FROM entries
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch entry")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_entry(&row)?)),
            None => Ok(None),
        }
    }

    /// Query entries by example. Unset filter fields act as wildcards; the
    /// description matches as a case-insensitive substring.
    pub async fn find_entries(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        // Build query dynamically from the populated criteria
        let mut query = String::from(
            "SELECT id, description, month, year, value_cents, user_id, kind, status, recorded_at FROM entries WHERE 1=1",
        );

        let description_like = filter
            .description
            .as_ref()
            .map(|d| format!("%{}%", d.to_lowercase()));

        if description_like.is_some() {
            query.push_str(" AND LOWER(description) LIKE ?");
        }
        if filter.month.is_some() {
            query.push_str(" AND month = ?");
        }
        if filter.year.is_some() {
            query.push_str(" AND year = ?");
        }
        if filter.user_id.is_some() {
            query.push_str(" AND user_id = ?");
        }
        if filter.kind.is_some() {
            query.push_str(" AND kind = ?");
        }
        if filter.status.is_some() {
            query.push_str(" AND status = ?");
        }

        query.push_str(" ORDER BY id");

        let mut sql_query = sqlx::query(&query);

        if let Some(ref like) = description_like {
            sql_query = sql_query.bind(like);
        }
        if let Some(month) = filter.month {
            sql_query = sql_query.bind(i64::from(month));
        }
        if let Some(year) = filter.year {
            sql_query = sql_query.bind(year);
        }
        if let Some(user_id) = filter.user_id {
            sql_query = sql_query.bind(user_id);
        }
        if let Some(kind) = filter.kind {
            sql_query = sql_query.bind(kind.as_str());
        }
        if let Some(status) = filter.status {
            sql_query = sql_query.bind(status.as_str());
        }

        let rows = sql_query
            .fetch_all(&self.pool)
            .await
            .context("Failed to query entries")?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    /// Compute a user's balance with SQL aggregation: settled income minus
    /// settled expenses. Pending and canceled entries don't count.
    pub async fn compute_balance(&self, user_id: UserId) -> Result<Cents> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(CASE WHEN kind = 'income' THEN value_cents ELSE -value_cents END), 0) AS balance
            FROM entries
            WHERE user_id = ? AND status = 'settled'
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to compute balance")?;

        Ok(row.get("balance"))
    }

    fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<Entry> {
        let kind_str: String = row.get("kind");
        let status_str: String = row.get("status");
        let recorded_at_str: String = row.get("recorded_at");

        Ok(Entry {
            id: row.get("id"),
            description: row.get("description"),
            month: row.get::<i64, _>("month") as u32,
            year: row.get("year"),
            value: row.get("value_cents"),
            user_id: row.get("user_id"),
            kind: EntryKind::from_str(&kind_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry kind: {}", kind_str))?,
            status: EntryStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid entry status: {}", status_str))?,
            recorded_at: recorded_at_str
                .parse::<NaiveDate>()
                .context("Invalid recorded_at date")?,
        })
    }
}
