//! The `versevault vault` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use versevault_core::VerseStore;

pub async fn execute(store: &dyn VerseStore, expand: bool) -> Result<()> {
    let verses = store.list_verses().await?;

    println!("Your Verse Vault");
    if verses.is_empty() {
        println!("No verses yet. Add one with `versevault add`.");
        return Ok(());
    }

    if expand {
        for verse in &verses {
            match &verse.translation {
                Some(translation) => println!("\n== {} ({translation}) ==", verse.reference),
                None => println!("\n== {} ==", verse.reference),
            }
            println!("{}", verse.text);
            if let Some(explanation) = &verse.explanation {
                println!("\n{explanation}");
            }
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Reference", "Translation", "Words", "Added"]);
    for verse in &verses {
        table.add_row(vec![
            Cell::new(verse.id),
            Cell::new(&verse.reference),
            Cell::new(verse.translation.as_deref().unwrap_or("-")),
            Cell::new(verse.words().len()),
            Cell::new(verse.created_at.format("%Y-%m-%d")),
        ]);
    }
    println!("{table}");

    Ok(())
}
