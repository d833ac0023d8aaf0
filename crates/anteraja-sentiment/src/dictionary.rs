//! Target-language word set used by the normalizer's token filter.
//!
//! The bundled list covers everyday English plus delivery/logistics
//! vocabulary. A larger list (for example `/usr/share/dict/words`) can be
//! loaded once at startup with [`Dictionary::from_file`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use crate::error::SentimentError;

const BUNDLED_WORDS: &str = include_str!("../data/english_words.txt");

static BUNDLED: LazyLock<Dictionary> = LazyLock::new(|| Dictionary::from_list(BUNDLED_WORDS));

/// Immutable set of lowercase words.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// The process-wide bundled English dictionary, built on first use.
    #[must_use]
    pub fn bundled() -> &'static Dictionary {
        &BUNDLED
    }

    /// Build a dictionary from arbitrary words. Entries are trimmed and lowercased.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Parse a newline-separated word list. Blank lines and `#` comments are skipped.
    #[must_use]
    pub fn from_list(list: &str) -> Self {
        Self::from_words(
            list.lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load a newline-separated word list from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Dictionary`] if the file cannot be read.
    pub fn from_file(path: &Path) -> Result<Self, SentimentError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SentimentError::Dictionary {
            path: path.display().to_string(),
            source: e,
        })?;
        let dictionary = Self::from_list(&contents);
        tracing::debug!(
            path = %path.display(),
            words = dictionary.len(),
            "loaded dictionary"
        );
        Ok(dictionary)
    }

    /// Membership test. `word` must already be lowercase.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
