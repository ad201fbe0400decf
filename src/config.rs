use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorpusConfig {
    /// Optional path to a JSON corpus file; the embedded default corpus
    /// is used when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default = "default_libretranslate_url")]
    pub libretranslate_url: String,
    #[serde(default = "default_mymemory_url")]
    pub mymemory_url: String,
    /// Per-provider-attempt request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// How long a cached translation stays valid.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            libretranslate_url: default_libretranslate_url(),
            mymemory_url: default_mymemory_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_libretranslate_url() -> String {
    "https://libretranslate.com/translate".to_string()
}
fn default_mymemory_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

impl Config {
    /// Minimal config for commands that need no database or server
    /// (e.g. `cfaq detect`) when no config file is present.
    pub fn minimal() -> Self {
        Self {
            db: DbConfig {
                path: PathBuf::from("./data/cfaq.sqlite"),
            },
            server: ServerConfig {
                bind: "127.0.0.1:7340".to_string(),
            },
            corpus: CorpusConfig::default(),
            translation: TranslationConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.translation.timeout_secs == 0 {
        anyhow::bail!("translation.timeout_secs must be > 0");
    }

    if config.translation.cache_ttl_secs == 0 {
        anyhow::bail!("translation.cache_ttl_secs must be > 0");
    }

    if config.translation.libretranslate_url.trim().is_empty()
        || config.translation.mymemory_url.trim().is_empty()
    {
        anyhow::bail!("translation endpoint URLs must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_has_defaults() {
        let cfg = Config::minimal();
        assert_eq!(cfg.translation.timeout_secs, 5);
        assert_eq!(cfg.translation.cache_ttl_secs, 86400);
        assert!(cfg.corpus.path.is_none());
    }

    #[test]
    fn test_parse_with_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [db]
            path = "./data/cfaq.sqlite"

            [server]
            bind = "127.0.0.1:7340"
            "#,
        )
        .unwrap();
        assert!(cfg.translation.libretranslate_url.contains("libretranslate"));
        assert!(cfg.translation.mymemory_url.contains("mymemory"));
    }

    #[test]
    fn test_parse_overrides() {
        let cfg: Config = toml::from_str(
            r#"
            [db]
            path = "./db.sqlite"

            [server]
            bind = "0.0.0.0:8080"

            [corpus]
            path = "./my-corpus.json"

            [translation]
            timeout_secs = 2
            cache_ttl_secs = 60
            libretranslate_url = "http://127.0.0.1:9/translate"
            mymemory_url = "http://127.0.0.1:9/get"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.translation.timeout_secs, 2);
        assert_eq!(cfg.corpus.path.as_deref(), Some(Path::new("./my-corpus.json")));
    }
}
