//! Durable metadata store for gem records.
//!
//! A single SQLite table (`gems`) keyed by id, with a unique constraint on
//! `name` and an index on `vector_position`. All statements are
//! parameterized; record fields are never interpolated into query text.
//!
//! Keywords are serialized as a compact JSON array inside a single TEXT
//! column. They are never queried by content, only reconstructed on read.

use crate::types::GemRecord;
use gemdex_core::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Fields of a gem row being inserted or replaced.
///
/// Borrowed view so callers don't clone; `vector_position` is assigned by
/// the coordinator at insertion time.
#[derive(Debug)]
pub struct NewGem<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub readme_excerpt: &'a str,
    pub keywords: &'a [String],
    pub version: &'a str,
    pub homepage: &'a str,
    pub source_uri: &'a str,
    pub download_count: i64,
    pub stars: i64,
    pub last_updated: &'a str,
    pub vector_position: i64,
}

/// Raw row shape as read from SQLite.
#[derive(Debug, sqlx::FromRow)]
struct GemRow {
    id: i64,
    name: String,
    description: String,
    readme_excerpt: String,
    keywords: String,
    version: String,
    homepage: String,
    source_uri: String,
    download_count: i64,
    stars: i64,
    last_updated: Option<String>,
    created_at: String,
    vector_position: i64,
}

impl GemRow {
    fn into_record(self) -> GemRecord {
        let keywords = serde_json::from_str(&self.keywords).unwrap_or_else(|e| {
            warn!(name = %self.name, error = %e, "unparseable keywords column; treating as empty");
            Vec::new()
        });

        GemRecord {
            id: self.id,
            name: self.name,
            description: self.description,
            readme_excerpt: self.readme_excerpt,
            keywords,
            version: self.version,
            homepage: self.homepage,
            source_uri: self.source_uri,
            download_count: self.download_count,
            stars: self.stars,
            last_updated: self.last_updated,
            created_at: self.created_at,
            vector_position: self.vector_position,
        }
    }
}

const SELECT_FIELDS: &str = "id, name, description, readme_excerpt, keywords, version, homepage, \
     source_uri, download_count, stars, last_updated, created_at, vector_position";

/// Durable store of gem records backed by SQLite.
///
/// The pool is held open for the instance's lifetime and released on drop.
#[derive(Debug, Clone)]
pub struct MetadataStore {
    pool: SqlitePool,
}

impl MetadataStore {
    /// Open (or create) the metadata database at the given path.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let db_url = format!("sqlite://{}", db_path.to_string_lossy());

        let options = SqliteConnectOptions::from_str(&db_url)
            .map_err(gemdex_core::Error::from)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        debug!(path = %db_path.display(), "metadata store opened");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS gems (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                readme_excerpt TEXT NOT NULL DEFAULT '',
                keywords TEXT NOT NULL DEFAULT '[]',
                version TEXT NOT NULL DEFAULT '',
                homepage TEXT NOT NULL DEFAULT '',
                source_uri TEXT NOT NULL DEFAULT '',
                download_count INTEGER NOT NULL DEFAULT 0,
                stars INTEGER NOT NULL DEFAULT 0,
                last_updated TEXT,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                vector_position INTEGER NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_gems_name ON gems(name)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_gems_vector_position ON gems(vector_position)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a gem, or overwrite every field of the existing row when the
    /// name is already present, including `vector_position`. This is where
    /// the replace-by-name operation orphans the old vector slot.
    ///
    /// Returns the store-assigned row id (the existing id on replace).
    pub async fn upsert(&self, gem: &NewGem<'_>) -> Result<i64> {
        let keywords_json = serde_json::to_string(gem.keywords)?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO gems (
                name, description, readme_excerpt, keywords, version, homepage,
                source_uri, download_count, stars, last_updated, vector_position
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET
                description = excluded.description,
                readme_excerpt = excluded.readme_excerpt,
                keywords = excluded.keywords,
                version = excluded.version,
                homepage = excluded.homepage,
                source_uri = excluded.source_uri,
                download_count = excluded.download_count,
                stars = excluded.stars,
                last_updated = excluded.last_updated,
                vector_position = excluded.vector_position
            RETURNING id",
        )
        .bind(gem.name)
        .bind(gem.description)
        .bind(gem.readme_excerpt)
        .bind(&keywords_json)
        .bind(gem.version)
        .bind(gem.homepage)
        .bind(gem.source_uri)
        .bind(gem.download_count)
        .bind(gem.stars)
        .bind(gem.last_updated)
        .bind(gem.vector_position)
        .fetch_one(&self.pool)
        .await?;

        debug!(name = %gem.name, id, position = gem.vector_position, "gem upserted");
        Ok(id)
    }

    /// Look up the record whose `vector_position` matches.
    pub async fn get_by_position(&self, position: i64) -> Result<Option<GemRecord>> {
        let sql = format!("SELECT {SELECT_FIELDS} FROM gems WHERE vector_position = ?");
        let row = sqlx::query_as::<_, GemRow>(&sql)
            .bind(position)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(GemRow::into_record))
    }

    /// Look up a record by its unique name.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<GemRecord>> {
        let sql = format!("SELECT {SELECT_FIELDS} FROM gems WHERE name = ?");
        let row = sqlx::query_as::<_, GemRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(GemRow::into_record))
    }

    /// Number of rows (distinct gem names).
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gems")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// ============================================================================
// Tests
// ============================================================================
