//! The FAQ corpus: the fixed set of question/answer/keyword records that
//! queries are scored against.
//!
//! The corpus is loaded once at startup and shared read-only across all
//! requests. Entry order is load order and is part of the data contract:
//! the matcher breaks score ties in favor of the first entry seen, so a
//! reordered corpus can change which answer a tied query receives.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::config::Config;

/// Default corpus shipped with the binary (campus FAQ set).
const DEFAULT_CORPUS_JSON: &str = include_str!("../data/corpus.json");

/// One question/answer record with its match keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// An ordered, validated set of [`CorpusEntry`] records.
#[derive(Debug, Clone)]
pub struct Corpus {
    entries: Vec<CorpusEntry>,
}

impl Corpus {
    /// Load the corpus for the given config: from `[corpus] path` when set,
    /// otherwise the embedded default set.
    pub fn load(config: &Config) -> Result<Self> {
        match &config.corpus.path {
            Some(path) => Self::from_file(path),
            None => Self::from_json(DEFAULT_CORPUS_JSON),
        }
    }

    /// Load and validate corpus entries from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid corpus file: {}", path.display()))
    }

    /// Parse and validate corpus entries from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<CorpusEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// Validate entries: non-empty question and answer, no duplicate
    /// questions. Order is preserved exactly as given.
    pub fn new(entries: Vec<CorpusEntry>) -> Result<Self> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.question.trim().is_empty() {
                bail!("corpus entry {} has an empty question", i);
            }
            if entry.answer.trim().is_empty() {
                bail!("corpus entry {} ({:?}) has an empty answer", i, entry.question);
            }
            if !seen.insert(entry.question.as_str()) {
                bail!("corpus has a duplicate question: {:?}", entry.question);
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
