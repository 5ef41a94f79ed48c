//! In-memory verse store for tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use versevault_core::{Backend, FutureVerse, NewVerse, StoreError, Verse, VerseId, VerseStore};

#[derive(Default)]
struct Tables {
    verses: Vec<Verse>,
    future: Vec<FutureVerse>,
    next_verse_id: VerseId,
    next_future_id: VerseId,
}

/// A verse store that keeps everything in process memory.
///
/// Ids start at 1 and increase like SQLite's autoincrement.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    /// Number of store calls made.
    call_count: AtomicU32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `verses`, added oldest first so the
    /// last one listed here is the newest.
    pub fn with_verses(verses: &[NewVerse]) -> Self {
        let store = Self::new();
        {
            let mut tables = store.lock();
            for verse in verses {
                insert_verse(&mut tables, verse, Utc::now());
            }
        }
        store
    }

    /// Get the number of calls made to this store.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record_call(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }
}

fn insert_verse(tables: &mut Tables, verse: &NewVerse, created_at: DateTime<Utc>) {
    tables.next_verse_id += 1;
    tables.verses.push(Verse {
        id: tables.next_verse_id,
        reference: verse.reference.clone(),
        text: verse.text.clone(),
        explanation: verse.explanation.clone(),
        translation: verse.translation.clone(),
        created_at,
    });
}

#[async_trait]
impl VerseStore for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Memory
    }

    async fn list_verses(&self) -> anyhow::Result<Vec<Verse>> {
        self.record_call();
        let mut verses = self.lock().verses.clone();
        verses.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(verses)
    }

    async fn add_verse(&self, verse: &NewVerse) -> anyhow::Result<()> {
        self.record_call();
        insert_verse(&mut self.lock(), verse, Utc::now());
        Ok(())
    }

    async fn update_verse(&self, id: VerseId, verse: &NewVerse) -> anyhow::Result<()> {
        self.record_call();
        let mut tables = self.lock();
        let existing = tables
            .verses
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or(StoreError::NotFound(id))?;
        existing.reference = verse.reference.clone();
        existing.text = verse.text.clone();
        existing.explanation = verse.explanation.clone();
        existing.translation = verse.translation.clone();
        Ok(())
    }

    async fn list_future_verses(&self) -> anyhow::Result<Vec<FutureVerse>> {
        self.record_call();
        let mut future = self.lock().future.clone();
        future.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(future)
    }

    async fn add_future_verse(&self, reference: &str) -> anyhow::Result<()> {
        self.record_call();
        let mut tables = self.lock();
        tables.next_future_id += 1;
        let id = tables.next_future_id;
        tables.future.push(FutureVerse {
            id,
            reference: reference.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn remove_future_verse(&self, id: VerseId) -> anyhow::Result<()> {
        self.record_call();
        self.lock().future.retain(|f| f.id != id);
        Ok(())
    }
}
