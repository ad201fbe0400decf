//! Translation provider abstraction and implementations.
//!
//! Defines the [`TranslationProvider`] trait and the two concrete backends
//! tried by the language bridge, in priority order:
//! - **[`LibreTranslateProvider`]** — JSON POST API, richer quality.
//! - **[`MyMemoryProvider`]** — simple public GET API, second in line.
//!
//! Providers are best-effort: any HTTP failure, non-2xx status, or
//! unusable body surfaces as an `Err`, and the bridge's fallback chain
//! moves on to the next provider. Every request carries an explicit
//! timeout so a stalled third-party API cannot hold up a user-facing
//! query.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::config::TranslationConfig;

/// A translation backend the bridge can call.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short identifier used in logs and the fallback result tag.
    fn name(&self) -> &'static str;

    /// Translate `text` between two concrete language codes.
    ///
    /// Implementations must return an error rather than the input text on
    /// failure; the chain treats an unchanged result as a miss.
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String>;
}

/// Build the provider chain in priority order from config.
pub fn provider_chain(config: &TranslationConfig) -> Vec<Box<dyn TranslationProvider>> {
    vec![
        Box::new(LibreTranslateProvider::new(config)),
        Box::new(MyMemoryProvider::new(config)),
    ]
}

// ============ LibreTranslate ============

/// LibreTranslate JSON API (`POST /translate`).
pub struct LibreTranslateProvider {
    endpoint: String,
    timeout: Duration,
}

impl LibreTranslateProvider {
    pub fn new(config: &TranslationConfig) -> Self {
        Self {
            endpoint: config.libretranslate_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &'static str {
        "libretranslate"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let body = serde_json::json!({
            "q": text,
            "source": source,
            "target": target,
            "format": "text",
        });

        let response = client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("LibreTranslate error {}", status);
        }

        let json: serde_json::Value = response.json().await?;
        match json.get("translatedText").and_then(|t| t.as_str()) {
            Some(translated) if !translated.trim().is_empty() => Ok(translated.to_string()),
            _ => bail!("LibreTranslate returned no translatedText"),
        }
    }
}

// ============ MyMemory ============

/// MyMemory public API (`GET /get?q=...&langpair=src|tgt`).
pub struct MyMemoryProvider {
    endpoint: String,
    timeout: Duration,
}

impl MyMemoryProvider {
    pub fn new(config: &TranslationConfig) -> Self {
        Self {
            endpoint: config.mymemory_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &'static str {
        "mymemory"
    }

    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let langpair = format!("{}|{}", source, target);
        let response = client
            .get(&self.endpoint)
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("MyMemory error {}", status);
        }

        let json: serde_json::Value = response.json().await?;
        let translated = json
            .get("responseData")
            .and_then(|d| d.get("translatedText"))
            .and_then(|t| t.as_str());

        match translated {
            Some(translated) if !translated.trim().is_empty() => Ok(translated.to_string()),
            _ => bail!("MyMemory returned no translatedText"),
        }
    }
}
