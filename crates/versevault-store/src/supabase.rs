//! Supabase verse store, talking PostgREST over HTTPS.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use versevault_core::model::parse_timestamp;
use versevault_core::{Backend, FutureVerse, NewVerse, StoreError, Verse, VerseId, VerseStore};

use crate::error::StorageContext;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_VERSES_TABLE: &str = "verses";
pub const DEFAULT_FUTURE_TABLE: &str = "future_verses";
/// Newest first, ties broken by id.
const LIST_QUERY: &str = "select=*&order=created_at.desc,id.desc";

/// Verse store backed by a Supabase project's REST endpoint.
pub struct SupabaseStore {
    api_key: String,
    base_url: String,
    verses_table: String,
    future_table: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    /// Build a client for the project at `url` (e.g.
    /// `https://abc.supabase.co`).
    pub fn new(url: &str, api_key: &str) -> anyhow::Result<Self> {
        let base_url = url.trim().trim_end_matches('/').to_string();
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "supabase url must start with http:// or https://, got '{base_url}'"
        );
        anyhow::ensure!(!api_key.trim().is_empty(), "supabase key is empty");

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .storage("build HTTP client")?;

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url,
            verses_table: DEFAULT_VERSES_TABLE.to_string(),
            future_table: DEFAULT_FUTURE_TABLE.to_string(),
            client,
        })
    }

    /// Use different table names than `verses` / `future_verses`.
    pub fn with_tables(mut self, verses_table: &str, future_table: &str) -> Self {
        self.verses_table = verses_table.to_string();
        self.future_table = future_table.to_string();
        self
    }

    /// Check that the project answers and the key is accepted.
    pub async fn ping(&self) -> anyhow::Result<()> {
        let request = self.client.get(format!(
            "{}?select=id&limit=1",
            self.table_url(&self.verses_table)
        ));
        self.send(request, "connect to supabase").await?;
        Ok(())
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn row_url(&self, table: &str, id: VerseId) -> String {
        format!("{}?id=eq.{id}", self.table_url(table))
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", format!("Bearer {}", self.api_key))
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> anyhow::Result<Response> {
        let response = self.authed(request).send().await.storage(action)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Storage(format!("{action}: HTTP {status}: {body}")).into());
        }
        Ok(response)
    }
}

#[derive(Serialize)]
struct VerseBody<'a> {
    reference: &'a str,
    text: &'a str,
    explanation: Option<&'a str>,
    translation: Option<&'a str>,
}

impl<'a> From<&'a NewVerse> for VerseBody<'a> {
    fn from(verse: &'a NewVerse) -> Self {
        Self {
            reference: &verse.reference,
            text: &verse.text,
            explanation: verse.explanation.as_deref(),
            translation: verse.translation.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct FutureBody<'a> {
    reference: &'a str,
}

#[derive(Deserialize)]
struct VerseRow {
    id: VerseId,
    reference: String,
    text: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    translation: Option<String>,
    created_at: String,
}

impl VerseRow {
    fn into_verse(self) -> anyhow::Result<Verse> {
        Ok(Verse {
            id: self.id,
            reference: self.reference,
            text: self.text,
            explanation: self.explanation,
            translation: self.translation,
            created_at: parse_timestamp(&self.created_at).storage("read verse row")?,
        })
    }
}

#[derive(Deserialize)]
struct FutureRow {
    id: VerseId,
    reference: String,
    created_at: String,
}

impl FutureRow {
    fn into_future(self) -> anyhow::Result<FutureVerse> {
        Ok(FutureVerse {
            id: self.id,
            reference: self.reference,
            created_at: parse_timestamp(&self.created_at).storage("read future verse row")?,
        })
    }
}

#[async_trait]
impl VerseStore for SupabaseStore {
    fn backend(&self) -> Backend {
        Backend::Supabase
    }

    #[instrument(skip(self), fields(table = %self.verses_table))]
    async fn list_verses(&self) -> anyhow::Result<Vec<Verse>> {
        let request = self
            .client
            .get(format!("{}?{LIST_QUERY}", self.table_url(&self.verses_table)));
        let rows: Vec<VerseRow> = self
            .send(request, "list verses")
            .await?
            .json()
            .await
            .storage("decode verses")?;
        debug!(count = rows.len(), "listed verses");
        rows.into_iter().map(VerseRow::into_verse).collect()
    }

    #[instrument(skip(self, verse), fields(table = %self.verses_table, reference = %verse.reference))]
    async fn add_verse(&self, verse: &NewVerse) -> anyhow::Result<()> {
        let request = self
            .client
            .post(self.table_url(&self.verses_table))
            .header("Prefer", "return=minimal")
            .json(&VerseBody::from(verse));
        self.send(request, "add verse").await?;
        Ok(())
    }

    #[instrument(skip(self, verse), fields(table = %self.verses_table))]
    async fn update_verse(&self, id: VerseId, verse: &NewVerse) -> anyhow::Result<()> {
        let request = self
            .client
            .patch(self.row_url(&self.verses_table, id))
            .header("Prefer", "return=representation")
            .json(&VerseBody::from(verse));
        let updated: Vec<serde_json::Value> = self
            .send(request, "update verse")
            .await?
            .json()
            .await
            .storage("decode updated verse")?;
        if updated.is_empty() {
            return Err(StoreError::NotFound(id).into());
        }
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.future_table))]
    async fn list_future_verses(&self) -> anyhow::Result<Vec<FutureVerse>> {
        let request = self
            .client
            .get(format!("{}?{LIST_QUERY}", self.table_url(&self.future_table)));
        let rows: Vec<FutureRow> = self
            .send(request, "list future verses")
            .await?
            .json()
            .await
            .storage("decode future verses")?;
        rows.into_iter().map(FutureRow::into_future).collect()
    }

    #[instrument(skip(self), fields(table = %self.future_table))]
    async fn add_future_verse(&self, reference: &str) -> anyhow::Result<()> {
        let request = self
            .client
            .post(self.table_url(&self.future_table))
            .header("Prefer", "return=minimal")
            .json(&FutureBody { reference });
        self.send(request, "add future verse").await?;
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.future_table))]
    async fn remove_future_verse(&self, id: VerseId) -> anyhow::Result<()> {
        let request = self
            .client
            .delete(self.row_url(&self.future_table, id));
        self.send(request, "remove future verse").await?;
        Ok(())
    }
}
