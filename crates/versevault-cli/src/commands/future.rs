//! The `versevault future` commands.

use anyhow::Result;

use versevault_core::{VerseId, VerseStore};

pub async fn list(store: &dyn VerseStore) -> Result<()> {
    let future = store.list_future_verses().await?;
    if future.is_empty() {
        println!("No future verses yet. Add one with `versevault future add <REFERENCE>`.");
        return Ok(());
    }

    println!("Future Verses");
    for verse in &future {
        println!("  [{}] {}", verse.id, verse.reference);
    }
    Ok(())
}

pub async fn add(store: &dyn VerseStore, reference: &str) -> Result<()> {
    let reference = reference.trim();
    anyhow::ensure!(!reference.is_empty(), "verse reference must not be empty");

    store.add_future_verse(reference).await?;
    println!("Added {reference}");
    Ok(())
}

pub async fn remove(store: &dyn VerseStore, id: VerseId) -> Result<()> {
    store.remove_future_verse(id).await?;
    println!("Removed future verse {id}");
    Ok(())
}
