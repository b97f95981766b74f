//! SQL record store backed by [sqlx](https://docs.rs/sqlx).
//!
//! Reads the bookmark schema:
//!
//! - `bookmarks(id, userId)`
//! - `bookmarkLinks(id, url, title, description)`, keyed by bookmark id
//! - `bookmarkTexts(id, text)`, keyed by bookmark id
//! - `tagsOnBookmarks(bookmarkId, tagId)` joined to `bookmarkTags(id, name)`

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info, instrument};

use crate::error::StoreError;
use crate::record_store::RecordStore;
use search_worker_shared::{LinkDetails, RecordProjection};

const RECORD_QUERY: &str = "SELECT b.id AS id, b.userId AS user_id, \
        l.id AS link_id, l.url AS url, l.title AS title, l.description AS description, \
        t.text AS text \
     FROM bookmarks b \
     LEFT JOIN bookmarkLinks l ON l.id = b.id \
     LEFT JOIN bookmarkTexts t ON t.id = b.id \
     WHERE b.id = ?1";

const TAGS_QUERY: &str = "SELECT bt.name AS name \
     FROM tagsOnBookmarks tob \
     JOIN bookmarkTags bt ON bt.id = tob.tagId \
     WHERE tob.bookmarkId = ?1 \
     ORDER BY bt.name";

/// A [`RecordStore`] reading from the bookmark database.
pub struct SqlRecordStore {
    pool: SqlitePool,
}

impl SqlRecordStore {
    /// Connect to the database at `database_url` with a bounded pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(max_connections, "Connected to record store");
        Ok(Self { pool })
    }

    /// Create a store from an existing connection pool.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn decode_err(e: sqlx::Error) -> StoreError {
        StoreError::decode(e.to_string())
    }

    fn projection_from_row(
        row: &SqliteRow,
        tags: Vec<String>,
    ) -> Result<RecordProjection, StoreError> {
        let id: String = row.try_get("id").map_err(Self::decode_err)?;
        let owner_id: String = row.try_get("user_id").map_err(Self::decode_err)?;
        let link_id: Option<String> = row.try_get("link_id").map_err(Self::decode_err)?;
        let text: Option<String> = row.try_get("text").map_err(Self::decode_err)?;

        let mut record = RecordProjection::new(id, owner_id).with_tags(tags);

        if link_id.is_some() {
            record = record.with_link(LinkDetails {
                url: row.try_get("url").map_err(Self::decode_err)?,
                title: row.try_get("title").map_err(Self::decode_err)?,
                description: row.try_get("description").map_err(Self::decode_err)?,
            });
        }
        // A text row with NULL text carries nothing to index.
        if let Some(text) = text {
            record = record.with_text(text);
        }

        Ok(record)
    }
}

#[async_trait]
impl RecordStore for SqlRecordStore {
    #[instrument(skip(self))]
    async fn find_record_by_id(&self, id: &str) -> Result<Option<RecordProjection>, StoreError> {
        let row = sqlx::query(RECORD_QUERY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::query(e.to_string()))?;

        let Some(row) = row else {
            debug!("Record not found");
            return Ok(None);
        };

        let tags = sqlx::query(TAGS_QUERY)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::query(e.to_string()))?
            .iter()
            .map(|row| row.try_get("name"))
            .collect::<Result<Vec<String>, _>>()
            .map_err(Self::decode_err)?;

        Self::projection_from_row(&row, tags).map(Some)
    }
}
