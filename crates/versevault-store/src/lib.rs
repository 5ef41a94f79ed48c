//! versevault-store: verse store backends.
//!
//! Implements the `VerseStore` trait for Supabase (PostgREST over HTTPS),
//! a local SQLite file, and an in-memory store, and picks one at startup
//! from configuration.

pub mod config;
pub mod error;
pub mod memory;
pub mod sqlite;
pub mod supabase;

pub use config::{load_config, open_store, SupabaseConfig, VaultConfig};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use supabase::SupabaseStore;
