//! Draft storage repository.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use tracing::debug;

use super::model::{Draft, DraftKey};
use crate::Result;
use crate::template::{EmailTemplate, TemplateId};

/// Repository for template drafts.
#[derive(Debug, Clone)]
pub struct DraftRepository {
    pool: SqlitePool,
}

impl DraftRepository {
    /// Create a new repository with the given database path.
    ///
    /// Creates the database and tables if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn new(database_path: &str) -> Result<Self> {
        let url = format!("sqlite:{database_path}?mode=rwc");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Opens the repository at the default data location, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the database
    /// cannot be opened.
    pub async fn open_default() -> Result<Self> {
        let dir = crate::config::data_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let path = crate::config::database_path();
        Self::new(&path.to_string_lossy()).await
    }

    /// Create an in-memory repository for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails or schema creation fails.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        let repo = Self { pool };
        repo.initialize().await?;
        Ok(repo)
    }

    /// Initialize database schema.
    async fn initialize(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS template_drafts (
                draft_key TEXT PRIMARY KEY,
                name TEXT NOT NULL DEFAULT '',
                subject TEXT NOT NULL DEFAULT '',
                body_html TEXT NOT NULL DEFAULT '',
                saved_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert or replace the draft for its template.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn save(&self, draft: &Draft) -> Result<()> {
        let key = draft.key().as_storage();
        sqlx::query(
            r"
            INSERT INTO template_drafts (draft_key, name, subject, body_html, saved_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(draft_key) DO UPDATE SET
                name = excluded.name,
                subject = excluded.subject,
                body_html = excluded.body_html,
                saved_at = excluded.saved_at
            ",
        )
        .bind(&key)
        .bind(&draft.template.name)
        .bind(&draft.template.subject)
        .bind(&draft.template.body_html)
        .bind(draft.saved_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&self.pool)
        .await?;

        debug!("Saved draft {key}");
        Ok(())
    }

    /// Get the draft for a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get(&self, key: DraftKey) -> Result<Option<Draft>> {
        let row = sqlx::query(
            r"
            SELECT draft_key, name, subject, body_html, saved_at
            FROM template_drafts
            WHERE draft_key = ?
            ",
        )
        .bind(key.as_storage())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().and_then(row_to_draft))
    }

    /// List all drafts, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<Draft>> {
        let rows = sqlx::query(
            r"
            SELECT draft_key, name, subject, body_html, saved_at
            FROM template_drafts
            ORDER BY saved_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(row_to_draft).collect())
    }

    /// Delete the draft for a template. Returns true if one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete(&self, key: DraftKey) -> Result<bool> {
        let result = sqlx::query("DELETE FROM template_drafts WHERE draft_key = ?")
            .bind(key.as_storage())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_draft(row: &SqliteRow) -> Option<Draft> {
    let key: String = row.get("draft_key");
    let saved_at: String = row.get("saved_at");
    let saved_at = DateTime::parse_from_rfc3339(&saved_at)
        .ok()?
        .with_timezone(&Utc);
    let id = match DraftKey::from_storage(&key)? {
        DraftKey::Template(id) => Some(id),
        DraftKey::New => None,
    };

    Some(Draft {
        template: EmailTemplate {
            id,
            name: row.get("name"),
            subject: row.get("subject"),
            body_html: row.get("body_html"),
            updated_at: None,
        },
        saved_at,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn template(id: Option<u64>, subject: &str) -> EmailTemplate {
        EmailTemplate {
            id: id.map(TemplateId),
            body_html: "<p>Body</p>".into(),
            ..EmailTemplate::new("Welcome", subject)
        }
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let repo = DraftRepository::in_memory().await.unwrap();
        let draft = Draft::new(template(Some(4), "Hello"));
        repo.save(&draft).await.unwrap();

        let loaded = repo
            .get(DraftKey::Template(TemplateId(4)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.template.subject, "Hello");
        assert_eq!(loaded.template.id, Some(TemplateId(4)));
        assert!(repo.get(DraftKey::New).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_replaces_existing() {
        let repo = DraftRepository::in_memory().await.unwrap();
        repo.save(&Draft::new(template(None, "First"))).await.unwrap();
        repo.save(&Draft::new(template(None, "Second"))).await.unwrap();

        let drafts = repo.list().await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].template.subject, "Second");
        assert_eq!(drafts[0].key(), DraftKey::New);
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let repo = DraftRepository::in_memory().await.unwrap();
        let mut older = Draft::new(template(Some(1), "Old"));
        older.saved_at = Utc::now() - Duration::hours(2);
        repo.save(&older).await.unwrap();
        repo.save(&Draft::new(template(Some(2), "New"))).await.unwrap();

        let drafts = repo.list().await.unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].template.subject, "New");
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = DraftRepository::in_memory().await.unwrap();
        repo.save(&Draft::new(template(Some(9), "Bye"))).await.unwrap();
        assert!(repo.delete(DraftKey::Template(TemplateId(9))).await.unwrap());
        assert!(!repo.delete(DraftKey::Template(TemplateId(9))).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
