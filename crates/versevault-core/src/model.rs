//! Core data model types for versevault.
//!
//! Verses and future verses are flat rows owned by the store. Everything
//! else (traversal order, blanks, results) lives in the quiz session.

use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned verse identifier.
pub type VerseId = i64;

/// A stored Scripture verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verse {
    /// Unique, stable identifier.
    pub id: VerseId,
    /// Reference label (e.g. "John 3:16").
    pub reference: String,
    /// The verse text, tokenized on whitespace for quizzes.
    pub text: String,
    /// Optional personal notes on the verse.
    #[serde(default)]
    pub explanation: Option<String>,
    /// Optional translation label (e.g. "ESV").
    #[serde(default)]
    pub translation: Option<String>,
    /// Creation time, used only for default ordering.
    pub created_at: DateTime<Utc>,
}

impl Verse {
    /// The verse text split on whitespace.
    pub fn words(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Field set shared by the add and edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVerse {
    pub reference: String,
    pub text: String,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
}

impl NewVerse {
    pub fn new(reference: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            text: text.into(),
            explanation: None,
            translation: None,
        }
    }

    /// Set the explanation. Blank strings are stored as `None`.
    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = non_blank(explanation);
        self
    }

    /// Set the translation. Blank strings are stored as `None`.
    pub fn with_translation(mut self, translation: Option<String>) -> Self {
        self.translation = non_blank(translation);
        self
    }
}

impl From<&Verse> for NewVerse {
    fn from(verse: &Verse) -> Self {
        Self {
            reference: verse.reference.clone(),
            text: verse.text.clone(),
            explanation: verse.explanation.clone(),
            translation: verse.translation.clone(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A wish-list reference not yet promoted to a full verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureVerse {
    pub id: VerseId,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

/// The technology backing a verse store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Supabase,
    Sqlite,
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Supabase => write!(f, "supabase"),
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" => Ok(Backend::Supabase),
            "sqlite" => Ok(Backend::Sqlite),
            "memory" => Ok(Backend::Memory),
            other => Err(format!("unknown backend: {other}")),
        }
    }
}

/// Parse a store timestamp.
///
/// Accepts RFC 3339 (PostgREST `timestamptz`) and SQLite's
/// `YYYY-MM-DD HH:MM:SS` form, which is taken to be UTC.
pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .with_context(|| format!("invalid timestamp: {s}"))?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn words_split_on_any_whitespace() {
        let verse = Verse {
            id: 1,
            reference: "Gen 1:1".into(),
            text: "In the\tbeginning,\n God  created".into(),
            explanation: None,
            translation: None,
            created_at: Utc::now(),
        };
        assert_eq!(verse.words(), vec!["In", "the", "beginning,", "God", "created"]);
    }

    #[test]
    fn new_verse_drops_blank_optionals() {
        let v = NewVerse::new("Ps 23:1", "The Lord is my shepherd")
            .with_explanation(Some("   ".into()))
            .with_translation(Some("KJV".into()));
        assert_eq!(v.explanation, None);
        assert_eq!(v.translation.as_deref(), Some("KJV"));
    }

    #[test]
    fn parse_sqlite_and_rfc3339_timestamps() {
        let a = parse_timestamp("2024-03-01 12:30:45").unwrap();
        assert_eq!((a.year(), a.month(), a.day()), (2024, 3, 1));
        assert_eq!((a.hour(), a.minute(), a.second()), (12, 30, 45));

        let b = parse_timestamp("2024-03-01T12:30:45.123456+00:00").unwrap();
        assert_eq!(b.timestamp(), a.timestamp());

        let c = parse_timestamp("2024-03-01T12:30:45.5").unwrap();
        assert_eq!(c.timestamp(), a.timestamp());

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn backend_display_and_parse() {
        assert_eq!(Backend::Sqlite.to_string(), "sqlite");
        assert_eq!("Supabase".parse::<Backend>().unwrap(), Backend::Supabase);
        assert!("postgres".parse::<Backend>().is_err());
    }

    #[test]
    fn verse_serde_defaults_optionals() {
        let json = r#"{"id":4,"reference":"Rom 8:28","text":"And we know","created_at":"2024-01-01T00:00:00Z"}"#;
        let verse: Verse = serde_json::from_str(json).unwrap();
        assert_eq!(verse.id, 4);
        assert!(verse.explanation.is_none());
        assert!(verse.translation.is_none());
    }
}
