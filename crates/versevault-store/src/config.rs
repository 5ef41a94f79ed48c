//! Store configuration and backend selection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use versevault_core::VerseStore;

use crate::sqlite::SqliteStore;
use crate::supabase::{SupabaseStore, DEFAULT_FUTURE_TABLE, DEFAULT_VERSES_TABLE};

/// Connection settings for a Supabase project.
///
/// Note: Custom Debug impl masks the key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default, alias = "URL")]
    pub url: String,
    #[serde(
        default,
        alias = "anon",
        alias = "anon_key",
        alias = "api_key",
        alias = "apikey",
        alias = "public_key"
    )]
    pub key: String,
    #[serde(default = "default_verses_table")]
    pub verses_table: String,
    #[serde(default = "default_future_table")]
    pub future_table: String,
}

impl std::fmt::Debug for SupabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseConfig")
            .field("url", &self.url)
            .field("key", &"***")
            .field("verses_table", &self.verses_table)
            .field("future_table", &self.future_table)
            .finish()
    }
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            verses_table: default_verses_table(),
            future_table: default_future_table(),
        }
    }
}

impl SupabaseConfig {
    /// Both a url and a key are present.
    pub fn has_credentials(&self) -> bool {
        !self.url.trim().is_empty() && !self.key.trim().is_empty()
    }
}

fn default_verses_table() -> String {
    DEFAULT_VERSES_TABLE.to_string()
}
fn default_future_table() -> String {
    DEFAULT_FUTURE_TABLE.to_string()
}
fn default_database_path() -> PathBuf {
    PathBuf::from("vv_local.db")
}

/// Top-level versevault configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    /// SQLite file used when Supabase is not configured.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Remote store settings. Absent means local SQLite.
    #[serde(default)]
    pub supabase: Option<SupabaseConfig>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            supabase: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    expand_vars(s, |name| std::env::var(name).ok())
}

/// Substitute each `${NAME}` once. Substituted values are not rescanned.
fn expand_vars(s: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&lookup(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `versevault.toml` in the current directory
/// 2. `~/.config/versevault/config.toml`
///
/// Environment variable overrides: `VERSEVAULT_SUPABASE_URL`,
/// `VERSEVAULT_SUPABASE_KEY`, `VERSEVAULT_DATABASE`.
pub fn load_config() -> Result<VaultConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<VaultConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("versevault.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<VaultConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => VaultConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok());
    Ok(resolve(config))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("versevault"))
}

fn apply_env_overrides(
    mut config: VaultConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> VaultConfig {
    if let Some(path) = lookup("VERSEVAULT_DATABASE") {
        config.database_path = PathBuf::from(path);
    }
    if let Some(url) = lookup("VERSEVAULT_SUPABASE_URL") {
        config.supabase.get_or_insert_with(Default::default).url = url;
    }
    if let Some(key) = lookup("VERSEVAULT_SUPABASE_KEY") {
        config.supabase.get_or_insert_with(Default::default).key = key;
    }
    config
}

fn resolve(mut config: VaultConfig) -> VaultConfig {
    if let Some(remote) = config.supabase.as_mut() {
        remote.url = resolve_env_vars(&remote.url);
        remote.key = resolve_env_vars(&remote.key);
    }
    config
}

/// Pick and open the verse store for this process.
///
/// Supabase is used when credentials are configured, the client can be
/// built, and the project answers. Anything else falls back to the local
/// SQLite file, which is created if missing.
pub async fn open_store(config: &VaultConfig) -> Result<Box<dyn VerseStore>> {
    if let Some(remote) = config.supabase.as_ref().filter(|s| s.has_credentials()) {
        match connect_supabase(remote).await {
            Ok(store) => {
                info!(url = %remote.url, "using supabase verse store");
                return Ok(Box::new(store));
            }
            Err(e) => {
                warn!(error = %e, "supabase unavailable, falling back to local sqlite");
            }
        }
    }

    let store = SqliteStore::open(&config.database_path)?;
    Ok(Box::new(store))
}

async fn connect_supabase(remote: &SupabaseConfig) -> Result<SupabaseStore> {
    let store = SupabaseStore::new(&remote.url, &remote.key)?
        .with_tables(&remote.verses_table, &remote.future_table);
    store.ping().await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use versevault_core::Backend;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_VERSEVAULT_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_VERSEVAULT_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_VERSEVAULT_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_VERSEVAULT_TEST_VAR");
    }

    #[test]
    fn expanded_values_are_not_rescanned() {
        let lookup = |name: &str| match name {
            "SELF" => Some("x${SELF}".to_string()),
            "KEY" => Some("secret".to_string()),
            _ => None,
        };
        assert_eq!(expand_vars("${SELF}", lookup), "x${SELF}");
        assert_eq!(expand_vars("${KEY}-${MISSING}-${KEY}", lookup), "secret--secret");
        assert_eq!(expand_vars("a ${KEY} ${open", lookup), "a secret ${open");
    }

    #[test]
    fn default_config() {
        let config = VaultConfig::default();
        assert_eq!(config.database_path, PathBuf::from("vv_local.db"));
        assert!(config.supabase.is_none());
    }

    #[test]
    fn parse_config_with_key_alias() {
        let toml_str = r#"
database_path = "/tmp/vault.db"

[supabase]
url = "https://abc.supabase.co"
anon_key = "public-anon"
verses_table = "vv_verses"
"#;
        let config: VaultConfig = toml::from_str(toml_str).unwrap();
        let remote = config.supabase.unwrap();
        assert_eq!(remote.key, "public-anon");
        assert_eq!(remote.verses_table, "vv_verses");
        assert_eq!(remote.future_table, "future_verses");
        assert!(remote.has_credentials());
    }

    #[test]
    fn debug_masks_key() {
        let remote = SupabaseConfig {
            url: "https://abc.supabase.co".into(),
            key: "super-secret".into(),
            ..Default::default()
        };
        let printed = format!("{remote:?}");
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn env_overrides_fill_in_supabase() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("VERSEVAULT_SUPABASE_URL", "https://env.supabase.co"),
            ("VERSEVAULT_SUPABASE_KEY", "env-key"),
            ("VERSEVAULT_DATABASE", "/data/vault.db"),
        ]);
        let config = apply_env_overrides(VaultConfig::default(), |name| {
            env.get(name).map(|v| v.to_string())
        });
        assert_eq!(config.database_path, PathBuf::from("/data/vault.db"));
        let remote = config.supabase.unwrap();
        assert_eq!(remote.url, "https://env.supabase.co");
        assert_eq!(remote.key, "env-key");
        assert_eq!(remote.verses_table, "verses");
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/versevault.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[tokio::test]
    async fn no_credentials_selects_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig {
            database_path: dir.path().join("local.db"),
            supabase: Some(SupabaseConfig {
                url: "https://abc.supabase.co".into(),
                ..Default::default()
            }),
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
        assert!(config.database_path.exists());
    }

    #[tokio::test]
    async fn malformed_url_falls_back_to_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig {
            database_path: dir.path().join("local.db"),
            supabase: Some(SupabaseConfig {
                url: "abc.supabase.co".into(),
                key: "key".into(),
                ..Default::default()
            }),
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
    }

    #[tokio::test]
    async fn unreachable_project_falls_back_to_sqlite() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig {
            database_path: dir.path().join("local.db"),
            supabase: Some(SupabaseConfig {
                url: server.uri(),
                key: "wrong".into(),
                ..Default::default()
            }),
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), Backend::Sqlite);
    }

    #[tokio::test]
    async fn reachable_project_selects_supabase() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/verses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = VaultConfig {
            database_path: dir.path().join("local.db"),
            supabase: Some(SupabaseConfig {
                url: server.uri(),
                key: "anon".into(),
                ..Default::default()
            }),
        };
        let store = open_store(&config).await.unwrap();
        assert_eq!(store.backend(), Backend::Supabase);
        assert!(!config.database_path.exists());
    }
}
