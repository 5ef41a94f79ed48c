//! Local SQLite verse store.
//!
//! The database file and both tables are created on first use. One
//! connection is held for the life of the store.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use tracing::{debug, info};

use versevault_core::model::parse_timestamp;
use versevault_core::{Backend, FutureVerse, NewVerse, StoreError, Verse, VerseId, VerseStore};

use crate::error::StorageContext;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reference TEXT NOT NULL,
    text TEXT NOT NULL,
    explanation TEXT,
    translation TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);
CREATE TABLE IF NOT EXISTS future_verses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    reference TEXT NOT NULL,
    created_at TEXT DEFAULT (datetime('now'))
);
";

/// Verse store backed by a local SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path).storage("open database")?;
        Self::init(conn, path)
    }

    /// A private in-memory database, for tests.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().storage("open database")?;
        Self::init(conn, PathBuf::from(":memory:"))
    }

    fn init(conn: Connection, path: PathBuf) -> anyhow::Result<Self> {
        conn.execute_batch(SCHEMA).storage("create schema")?;
        info!(path = %path.display(), "sqlite verse store ready");
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self) -> anyhow::Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Storage("connection lock poisoned".into()).into())
    }
}

fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, e.into()))
}

fn verse_from_row(row: &Row<'_>) -> rusqlite::Result<Verse> {
    Ok(Verse {
        id: row.get("id")?,
        reference: row.get("reference")?,
        text: row.get("text")?,
        explanation: row.get("explanation")?,
        translation: row.get("translation")?,
        created_at: timestamp(row, "created_at")?,
    })
}

fn future_from_row(row: &Row<'_>) -> rusqlite::Result<FutureVerse> {
    Ok(FutureVerse {
        id: row.get("id")?,
        reference: row.get("reference")?,
        created_at: timestamp(row, "created_at")?,
    })
}

#[async_trait]
impl VerseStore for SqliteStore {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    async fn list_verses(&self) -> anyhow::Result<Vec<Verse>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, reference, text, explanation, translation, created_at FROM verses \
                 ORDER BY datetime(created_at) DESC, id DESC",
            )
            .storage("list verses")?;
        let rows = stmt
            .query_map([], verse_from_row)
            .storage("list verses")?;

        let verses = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .storage("read verse row")?;
        debug!(count = verses.len(), "listed verses");
        Ok(verses)
    }

    async fn add_verse(&self, verse: &NewVerse) -> anyhow::Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO verses (reference, text, explanation, translation) VALUES (?1, ?2, ?3, ?4)",
            params![verse.reference, verse.text, verse.explanation, verse.translation],
        )
        .storage("add verse")?;
        debug!(reference = %verse.reference, id = conn.last_insert_rowid(), "added verse");
        Ok(())
    }

    async fn update_verse(&self, id: VerseId, verse: &NewVerse) -> anyhow::Result<()> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE verses SET reference = ?1, text = ?2, explanation = ?3, translation = ?4 \
                 WHERE id = ?5",
                params![
                    verse.reference,
                    verse.text,
                    verse.explanation,
                    verse.translation,
                    id
                ],
            )
            .storage("update verse")?;
        if changed == 0 {
            return Err(StoreError::NotFound(id).into());
        }
        debug!(id, "updated verse");
        Ok(())
    }

    async fn list_future_verses(&self) -> anyhow::Result<Vec<FutureVerse>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, reference, created_at FROM future_verses \
                 ORDER BY datetime(created_at) DESC, id DESC",
            )
            .storage("list future verses")?;
        let rows = stmt
            .query_map([], future_from_row)
            .storage("list future verses")?;

        let futures = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .storage("read future verse row")?;
        Ok(futures)
    }

    async fn add_future_verse(&self, reference: &str) -> anyhow::Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO future_verses (reference) VALUES (?1)",
            params![reference],
        )
        .storage("add future verse")?;
        debug!(reference, "added future verse");
        Ok(())
    }

    async fn remove_future_verse(&self, id: VerseId) -> anyhow::Result<()> {
        let conn = self.conn()?;
        let removed = conn
            .execute("DELETE FROM future_verses WHERE id = ?1", params![id])
            .storage("remove future verse")?;
        debug!(id, removed, "removed future verse");
        Ok(())
    }
}
