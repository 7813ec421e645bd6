use crate::model::ImageRecord;
use crate::storage::schema::NOW_RFC3339;
use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, image_url, prompt, user_input, is_seed, created_at FROM images";

/// Append-only log of generated images.
///
/// The store only remembers where the database lives. Every operation opens
/// its own connection and drops it before returning, on success and on error.
/// There are no update or delete operations; the whole file is cleared
/// out-of-band with [`reset`].
#[derive(Clone, Debug)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Opens (creating if missing) the database file at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create db directory {}", parent.display()))?;
        }
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Attaches to a database that must already exist. Journal mode and
    /// schema are left untouched.
    pub fn open_existing(path: &Path) -> anyhow::Result<Self> {
        let store = Self {
            path: path.to_path_buf(),
        };
        store.connect()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    // The file must already exist: a connection never recreates a database
    // that was removed underneath a running process.
    fn connect(&self) -> anyhow::Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to connect to {}", self.path.display()))?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Runs `op` on the blocking thread pool. Async callers go through here
    /// so a busy database never stalls the runtime.
    pub async fn blocking<T, F>(&self, op: F) -> anyhow::Result<T>
    where
        F: FnOnce(&Store) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .context("store task did not complete")?
    }

    /// Inserts a new record and returns its id.
    ///
    /// A seed is only accepted into an empty store, which keeps it the single
    /// seed and the record with the smallest id.
    pub fn append(
        &self,
        image_url: &str,
        prompt: &str,
        user_input: Option<&str>,
        is_seed: bool,
    ) -> anyhow::Result<i64> {
        let conn = self.connect()?;
        if is_seed {
            let inserted = conn.execute(
                &format!(
                    "INSERT INTO images(image_url, prompt, user_input, is_seed, created_at)
                     SELECT ?1, ?2, ?3, 1, {NOW_RFC3339}
                     WHERE NOT EXISTS (SELECT 1 FROM images)"
                ),
                params![image_url, prompt, user_input],
            )?;
            if inserted == 0 {
                anyhow::bail!("seed rejected: the evolution chain already has records");
            }
        } else {
            conn.execute(
                &format!(
                    "INSERT INTO images(image_url, prompt, user_input, is_seed, created_at)
                     VALUES (?1, ?2, ?3, 0, {NOW_RFC3339})"
                ),
                params![image_url, prompt, user_input],
            )?;
        }
        Ok(conn.last_insert_rowid())
    }

    pub fn latest(&self) -> anyhow::Result<Option<ImageRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("{SELECT_COLUMNS} ORDER BY id DESC LIMIT 1"),
                [],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Every record, oldest first. Read fresh on each call.
    pub fn all(&self) -> anyhow::Result<Vec<ImageRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt.query_map([], row_to_record)?;

        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    }

    pub fn count(&self) -> anyhow::Result<u64> {
        let conn = self.connect()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM images", [], |r| r.get(0))?;
        Ok(n as u64)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);

    Ok(ImageRecord {
        id: row.get(0)?,
        image_url: row.get(1)?,
        prompt: row.get(2)?,
        user_input: row.get(3)?,
        is_seed: row.get(4)?,
        created_at,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Removed,
    AlreadyClean,
}

/// Deletes the database file and its WAL companions. The next server start
/// recreates the schema and plants a fresh seed.
pub fn reset(path: &Path) -> anyhow::Result<ResetOutcome> {
    let mut outcome = ResetOutcome::AlreadyClean;
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("failed to delete {}", path.display()))?;
        outcome = ResetOutcome::Removed;
    }

    for suffix in ["-wal", "-shm"] {
        let mut companion = path.as_os_str().to_owned();
        companion.push(suffix);
        let companion = PathBuf::from(companion);
        if companion.exists() {
            std::fs::remove_file(&companion)
                .with_context(|| format!("failed to delete {}", companion.display()))?;
        }
    }

    tracing::info!(event = "store_reset", path = %path.display(), outcome = ?outcome);
    Ok(outcome)
}
