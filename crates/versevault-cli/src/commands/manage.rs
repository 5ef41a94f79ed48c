//! The `versevault add` and `versevault edit` commands.

use anyhow::Result;

use versevault_core::{NewVerse, StoreError, Verse, VerseId, VerseStore};

/// How `edit` picks the verse to change.
#[derive(Debug, Clone)]
pub enum Selector {
    Id(VerseId),
    /// First match in newest-first order.
    Reference(String),
}

/// Fields to overwrite; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct VerseChanges {
    pub reference: Option<String>,
    pub text: Option<String>,
    pub explanation: Option<String>,
    pub translation: Option<String>,
}

impl VerseChanges {
    fn apply(self, verse: &Verse) -> NewVerse {
        let current = NewVerse::from(verse);
        NewVerse::new(
            self.reference.unwrap_or(current.reference),
            self.text.unwrap_or(current.text),
        )
        .with_explanation(self.explanation.or(current.explanation))
        .with_translation(self.translation.or(current.translation))
    }
}

pub async fn add(
    store: &dyn VerseStore,
    reference: String,
    text: String,
    explanation: Option<String>,
    translation: Option<String>,
) -> Result<()> {
    anyhow::ensure!(
        !reference.trim().is_empty(),
        "verse reference must not be empty"
    );
    anyhow::ensure!(!text.trim().is_empty(), "verse text must not be empty");

    let verse = NewVerse::new(reference.trim(), text.trim())
        .with_explanation(explanation)
        .with_translation(translation);
    store.add_verse(&verse).await?;
    println!("Added {} to your vault!", verse.reference);
    Ok(())
}

pub async fn edit(store: &dyn VerseStore, selector: Selector, changes: VerseChanges) -> Result<()> {
    let verses = store.list_verses().await?;
    let current = match &selector {
        Selector::Id(id) => verses
            .iter()
            .find(|v| v.id == *id)
            .ok_or(StoreError::NotFound(*id))?,
        Selector::Reference(reference) => verses
            .iter()
            .find(|v| v.reference == *reference)
            .ok_or_else(|| anyhow::anyhow!("no verse with reference '{reference}'"))?,
    };

    let updated = changes.apply(current);
    anyhow::ensure!(
        !updated.reference.trim().is_empty(),
        "verse reference must not be empty"
    );
    anyhow::ensure!(
        !updated.text.trim().is_empty(),
        "verse text must not be empty"
    );

    store.update_verse(current.id, &updated).await?;
    println!("Updated {} successfully!", updated.reference);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use versevault_store::MemoryStore;

    fn store() -> MemoryStore {
        MemoryStore::with_verses(&[NewVerse::new("Rom 8:28", "And we know")
            .with_explanation(Some("All things".into()))
            .with_translation(Some("KJV".into()))])
    }

    #[tokio::test]
    async fn edit_by_reference_keeps_omitted_fields() {
        let store = store();
        let changes = VerseChanges {
            text: Some("And we know that all things work together".into()),
            ..Default::default()
        };
        edit(&store, Selector::Reference("Rom 8:28".into()), changes)
            .await
            .unwrap();

        let verse = &store.list_verses().await.unwrap()[0];
        assert_eq!(verse.reference, "Rom 8:28");
        assert_eq!(verse.text, "And we know that all things work together");
        assert_eq!(verse.explanation.as_deref(), Some("All things"));
        assert_eq!(verse.translation.as_deref(), Some("KJV"));
    }

    #[tokio::test]
    async fn empty_value_clears_optional_field() {
        let store = store();
        let changes = VerseChanges {
            explanation: Some(String::new()),
            ..Default::default()
        };
        edit(&store, Selector::Id(1), changes).await.unwrap();
        assert_eq!(store.list_verses().await.unwrap()[0].explanation, None);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found() {
        let store = store();
        let err = edit(&store, Selector::Id(9), VerseChanges::default())
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<StoreError>().unwrap().is_not_found());
    }

    #[tokio::test]
    async fn add_rejects_blank_text() {
        let store = MemoryStore::new();
        let err = add(&store, "Ps 1:1".into(), "  ".into(), None, None)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("text must not be empty"));
        assert!(store.list_verses().await.unwrap().is_empty());
    }
}
