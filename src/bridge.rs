//! The language bridge: detection, translation with provider fallback,
//! and time-boxed memoization.
//!
//! The bridge sits between the user's language and the English baseline
//! the matcher operates in. Its one hard rule is that translation never
//! fails the chat flow: provider errors are logged and degrade to the
//! original text, so a translation outage leaves the bot answering in
//! English rather than not answering at all.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, MemoryTtlCache, TranslationCache};
use crate::config::Config;
use crate::lang::{self, BASELINE_LANG};
use crate::translate::{provider_chain, TranslationProvider};

/// Where a translation result came from. Callers use this to observe
/// degrades without comparing output text to input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationSource {
    /// Source and target language were equal; input returned unchanged.
    Identity,
    /// Served from the TTL cache.
    Cached,
    /// Produced by the named provider on this call.
    Provider(&'static str),
    /// Every provider failed; input returned unchanged.
    Degraded,
}

/// A translation result with its provenance.
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub source: TranslationSource,
}

impl Translation {
    /// True if no provider produced this text on this call.
    pub fn used_fallback(&self) -> bool {
        self.source == TranslationSource::Degraded
    }
}

/// A user query prepared for matching.
#[derive(Debug, Clone)]
pub struct ProcessedQuery {
    pub original_query: String,
    pub translated_query: String,
    pub detected_lang: String,
    /// The language answers should be translated back into: the caller's
    /// hint when given, else the detected language.
    pub user_lang: String,
}

/// Detection, translation, and caching behind one instance-owned facade.
pub struct LanguageBridge {
    providers: Vec<Box<dyn TranslationProvider>>,
    cache: Arc<dyn TranslationCache>,
}

impl LanguageBridge {
    pub fn new(config: &Config) -> Self {
        let ttl = Duration::from_secs(config.translation.cache_ttl_secs);
        Self {
            providers: provider_chain(&config.translation),
            cache: Arc::new(MemoryTtlCache::new(ttl)),
        }
    }

    /// Construct with explicit providers and cache; used by tests to
    /// inject fakes.
    pub fn with_parts(
        providers: Vec<Box<dyn TranslationProvider>>,
        cache: Arc<dyn TranslationCache>,
    ) -> Self {
        Self { providers, cache }
    }

    /// Heuristic, non-network language detection. See [`lang::detect_language`].
    pub fn detect_language(&self, text: &str) -> &'static str {
        lang::detect_language(text)
    }

    /// Number of live cache entries, exposed for the health endpoint.
    pub fn cache_entries(&self) -> usize {
        self.cache.len()
    }

    /// Translate between two concrete languages, trying each provider in
    /// priority order.
    ///
    /// A provider result that errors, comes back empty, or comes back
    /// identical to the input falls through to the next provider. When
    /// the chain is exhausted the original text is returned with a
    /// [`TranslationSource::Degraded`] tag. The final result is cached
    /// either way; equal source/target short-circuits but still caches.
    pub async fn translate_with_fallback(
        &self,
        text: &str,
        target: &str,
        source: &str,
    ) -> Translation {
        let key = CacheKey::new(text, source, target);
        if let Some(cached) = self.cache.get(&key) {
            return Translation {
                text: cached,
                source: TranslationSource::Cached,
            };
        }

        if source == target {
            self.cache.set(key, text.to_string());
            return Translation {
                text: text.to_string(),
                source: TranslationSource::Identity,
            };
        }

        for provider in &self.providers {
            match provider.translate(text, source, target).await {
                Ok(translated) if !translated.trim().is_empty() && translated != text => {
                    self.cache.set(key, translated.clone());
                    return Translation {
                        text: translated,
                        source: TranslationSource::Provider(provider.name()),
                    };
                }
                Ok(_) => {
                    eprintln!(
                        "Warning: provider {} returned an unusable result for {} -> {}",
                        provider.name(),
                        source,
                        target
                    );
                }
                Err(e) => {
                    eprintln!("Warning: provider {} failed: {}", provider.name(), e);
                }
            }
        }

        self.cache.set(key, text.to_string());
        Translation {
            text: text.to_string(),
            source: TranslationSource::Degraded,
        }
    }

    /// Translate `text` into `target`, detecting the source language when
    /// none is supplied. Returns the translation plus the language the
    /// input was treated as.
    pub async fn translate_text(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> (Translation, String) {
        if text.trim().is_empty() {
            let detected = source.unwrap_or(BASELINE_LANG).to_string();
            return (
                Translation {
                    text: String::new(),
                    source: TranslationSource::Identity,
                },
                detected,
            );
        }

        let detected = match source {
            Some(lang) => lang.to_string(),
            None => self.detect_language(text).to_string(),
        };

        let translation = self.translate_with_fallback(text, target, &detected).await;
        (translation, detected)
    }

    /// Prepare an inbound query for matching: detect (or accept a hint
    /// for) the user's language and translate the query to the baseline.
    pub async fn process_user_query(
        &self,
        query: &str,
        language_hint: Option<&str>,
    ) -> ProcessedQuery {
        if query.trim().is_empty() {
            let user_lang = language_hint.unwrap_or(BASELINE_LANG).to_string();
            return ProcessedQuery {
                original_query: String::new(),
                translated_query: String::new(),
                detected_lang: BASELINE_LANG.to_string(),
                user_lang,
            };
        }

        let detected = match language_hint {
            Some(lang) => lang.to_string(),
            None => self.detect_language(query).to_string(),
        };

        let (translation, detected) = self
            .translate_text(query, BASELINE_LANG, Some(&detected))
            .await;

        ProcessedQuery {
            original_query: query.to_string(),
            translated_query: translation.text,
            detected_lang: detected.clone(),
            user_lang: detected,
        }
    }

    /// Translate an answer back into the user's language. No-op when the
    /// user's language is the baseline or missing.
    pub async fn translate_response(&self, answer: &str, user_lang: &str) -> Translation {
        if answer.is_empty() || user_lang.is_empty() || user_lang == BASELINE_LANG {
            return Translation {
                text: answer.to_string(),
                source: TranslationSource::Identity,
            };
        }

        let (translation, _) = self
            .translate_text(answer, user_lang, Some(BASELINE_LANG))
            .await;
        translation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Scripted provider: returns a fixed mapping or fails, and counts calls
    /// through a shared counter the test can inspect after the move.
    struct FakeProvider {
        name: &'static str,
        result: Option<String>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeProvider {
        fn ok(name: &'static str, text: &str) -> Self {
            Self {
                name,
                result: Some(text.to_string()),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(name: &'static str) -> Self {
            Self {
                name,
                result: None,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Some(t) => Ok(t.clone()),
                None => bail!("provider down"),
            }
        }
    }

    /// Cache fake that records set() calls.
    struct RecordingCache {
        inner: MemoryTtlCache,
        sets: Mutex<Vec<CacheKey>>,
    }

    impl RecordingCache {
        fn new() -> Self {
            Self {
                inner: MemoryTtlCache::new(Duration::from_secs(60)),
                sets: Mutex::new(Vec::new()),
            }
        }
    }

    impl TranslationCache for RecordingCache {
        fn get(&self, key: &CacheKey) -> Option<String> {
            self.inner.get(key)
        }
        fn set(&self, key: CacheKey, value: String) {
            self.sets.lock().unwrap().push(key.clone());
            self.inner.set(key, value);
        }
        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    fn bridge_with(providers: Vec<Box<dyn TranslationProvider>>) -> LanguageBridge {
        LanguageBridge::with_parts(providers, Arc::new(MemoryTtlCache::new(Duration::from_secs(60))))
    }

    #[tokio::test]
    async fn test_equal_source_target_short_circuits_without_provider_call() {
        let provider = FakeProvider::ok("fake", "should not be used");
        let calls = provider.calls.clone();
        let bridge = LanguageBridge::with_parts(
            vec![Box::new(provider)],
            Arc::new(RecordingCache::new()),
        );

        let result = bridge.translate_with_fallback("hello", "en", "en").await;
        assert_eq!(result.text, "hello");
        assert_eq!(result.source, TranslationSource::Identity);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        // Short-circuit is still cached.
        assert_eq!(bridge.cache_entries(), 1);
        let again = bridge.translate_with_fallback("hello", "en", "en").await;
        assert_eq!(again.source, TranslationSource::Cached);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_provider_wins() {
        let bridge = bridge_with(vec![
            Box::new(FakeProvider::ok("primary", "hola")),
            Box::new(FakeProvider::ok("secondary", "wrong")),
        ]);

        let result = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(result.text, "hola");
        assert_eq!(result.source, TranslationSource::Provider("primary"));
    }

    #[tokio::test]
    async fn test_falls_through_to_second_provider() {
        let bridge = bridge_with(vec![
            Box::new(FakeProvider::failing("primary")),
            Box::new(FakeProvider::ok("secondary", "hola")),
        ]);

        let result = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(result.text, "hola");
        assert_eq!(result.source, TranslationSource::Provider("secondary"));
    }

    #[tokio::test]
    async fn test_unchanged_result_falls_through() {
        // A provider echoing the input is treated as a miss.
        let bridge = bridge_with(vec![
            Box::new(FakeProvider::ok("echo", "hello")),
            Box::new(FakeProvider::ok("secondary", "hola")),
        ]);

        let result = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(result.text, "hola");
        assert_eq!(result.source, TranslationSource::Provider("secondary"));
    }

    #[tokio::test]
    async fn test_all_providers_fail_degrades_to_original() {
        let bridge = bridge_with(vec![
            Box::new(FakeProvider::failing("primary")),
            Box::new(FakeProvider::failing("secondary")),
        ]);

        let result = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(result.text, "hello");
        assert_eq!(result.source, TranslationSource::Degraded);
        assert!(result.used_fallback());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers() {
        let primary = FakeProvider::ok("primary", "hola");
        let calls = primary.calls.clone();
        let bridge = bridge_with(vec![Box::new(primary)]);

        let first = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(first.source, TranslationSource::Provider("primary"));

        let second = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(second.source, TranslationSource::Cached);
        assert_eq!(second.text, "hola");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_cache_recomputes() {
        let cache = Arc::new(MemoryTtlCache::new(Duration::from_millis(0)));
        let bridge = LanguageBridge::with_parts(
            vec![Box::new(FakeProvider::ok("primary", "hola"))],
            cache,
        );

        let first = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(first.source, TranslationSource::Provider("primary"));
        // TTL of zero means the entry is already expired on the next read.
        let second = bridge.translate_with_fallback("hello", "es", "en").await;
        assert_eq!(second.source, TranslationSource::Provider("primary"));
    }

    #[tokio::test]
    async fn test_process_user_query_detects_and_translates() {
        let bridge = bridge_with(vec![Box::new(FakeProvider::ok("primary", "where is the library"))]);

        let processed = bridge.process_user_query("¿dónde está la biblioteca? gracias", None).await;
        assert_eq!(processed.detected_lang, "es");
        assert_eq!(processed.user_lang, "es");
        assert_eq!(processed.translated_query, "where is the library");
        assert_eq!(processed.original_query, "¿dónde está la biblioteca? gracias");
    }

    #[tokio::test]
    async fn test_process_user_query_hint_overrides_detection() {
        let bridge = bridge_with(vec![Box::new(FakeProvider::ok("primary", "translated"))]);

        let processed = bridge.process_user_query("some text", Some("fr")).await;
        assert_eq!(processed.detected_lang, "fr");
        assert_eq!(processed.user_lang, "fr");
    }

    #[tokio::test]
    async fn test_process_user_query_english_is_identity() {
        let bridge = bridge_with(vec![Box::new(FakeProvider::failing("primary"))]);

        let processed = bridge.process_user_query("library hours", None).await;
        assert_eq!(processed.detected_lang, "en");
        assert_eq!(processed.translated_query, "library hours");
    }

    #[tokio::test]
    async fn test_translate_response_noop_for_baseline() {
        let bridge = bridge_with(vec![Box::new(FakeProvider::failing("primary"))]);

        let result = bridge.translate_response("The library is open.", "en").await;
        assert_eq!(result.text, "The library is open.");
        assert_eq!(result.source, TranslationSource::Identity);
        let result = bridge.translate_response("The library is open.", "").await;
        assert_eq!(result.source, TranslationSource::Identity);
    }

    #[tokio::test]
    async fn test_round_trip_with_unreachable_providers_degrades_both_ways() {
        let bridge = bridge_with(vec![
            Box::new(FakeProvider::failing("primary")),
            Box::new(FakeProvider::failing("secondary")),
        ]);

        let processed = bridge.process_user_query("Hola", Some("es")).await;
        assert_eq!(processed.translated_query, "Hola");

        let back = bridge.translate_response("answer text", "es").await;
        assert_eq!(back.text, "answer text");
        assert!(back.used_fallback());
    }
}
