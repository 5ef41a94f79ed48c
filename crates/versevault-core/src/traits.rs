//! Core trait definition for verse storage backends.
//!
//! Implemented by the `versevault-store` crate for Supabase, SQLite, and an
//! in-memory store.

use async_trait::async_trait;

use crate::model::{Backend, FutureVerse, NewVerse, Verse, VerseId};

/// Storage for verses and the future-verse wish list.
///
/// Failures are returned as `anyhow::Error` wrapping a
/// [`StoreError`](crate::error::StoreError), so callers can downcast to tell
/// a missing record apart from a storage failure.
#[async_trait]
pub trait VerseStore: Send + Sync {
    /// Which technology backs this store.
    fn backend(&self) -> Backend;

    /// All verses, newest first (`created_at` desc, then `id` desc).
    async fn list_verses(&self) -> anyhow::Result<Vec<Verse>>;

    /// Insert a verse.
    async fn add_verse(&self, verse: &NewVerse) -> anyhow::Result<()>;

    /// Overwrite every field of an existing verse.
    async fn update_verse(&self, id: VerseId, verse: &NewVerse) -> anyhow::Result<()>;

    /// All future verses, newest first.
    async fn list_future_verses(&self) -> anyhow::Result<Vec<FutureVerse>>;

    /// Add a reference to the wish list.
    async fn add_future_verse(&self, reference: &str) -> anyhow::Result<()>;

    /// Remove a wish-list entry. Removing an absent id succeeds.
    async fn remove_future_verse(&self, id: VerseId) -> anyhow::Result<()>;
}
