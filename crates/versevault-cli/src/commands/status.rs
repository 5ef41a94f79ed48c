//! The `versevault status` command.

use anyhow::Result;

use versevault_core::{Backend, VerseStore};
use versevault_store::VaultConfig;

pub async fn execute(store: &dyn VerseStore, config: &VaultConfig) -> Result<()> {
    let backend = store.backend();
    println!("Storage: {}", backend.to_string().to_uppercase());
    if backend == Backend::Sqlite {
        println!("Database: {}", config.database_path.display());
    }

    let verses = store.list_verses().await?;
    let future = store.list_future_verses().await?;
    println!("Verses: {}", verses.len());
    println!("Future verses: {}", future.len());

    let remote_configured = config
        .supabase
        .as_ref()
        .is_some_and(|s| s.has_credentials());
    if backend == Backend::Sqlite && remote_configured {
        println!("\nSupabase is configured but could not be reached; using the local database.");
    }
    Ok(())
}
