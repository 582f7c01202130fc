// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Text normalization
//!
//! Turns raw message text into the canonical lowercase, punctuation-free,
//! single-spaced form consumed by keyword matching and term weighting.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

// Compile regexes once at startup - safe because patterns are static
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("url regex is valid"));
static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+").expect("email regex is valid"));
static DIGITS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digits regex is valid"));

/// How punctuation is treated during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationMode {
    /// Delete ASCII punctuation, joining the surrounding characters ("don't" -> "dont")
    #[default]
    Remove,
    /// Replace every non-word character with a space ("don't" -> "don t")
    ReplaceWithSpace,
}

/// Normalization switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Strip `http(s)://` and `www.` links
    pub strip_urls: bool,
    /// Strip `user@host` substrings
    pub strip_emails: bool,
    /// Punctuation handling
    pub punctuation: PunctuationMode,
    /// Strip runs of digits
    pub strip_digits: bool,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            strip_urls: true,
            strip_emails: true,
            punctuation: PunctuationMode::Remove,
            strip_digits: true,
        }
    }
}

/// Deterministic, total text normalizer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Create a normalizer with the given switches
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a text into its canonical form
    ///
    /// Never fails: text without any word characters normalizes to the empty
    /// string. Applying the function twice yields the same result as applying
    /// it once.
    pub fn normalize(&self, text: &str) -> String {
        let mut text = text.to_lowercase();

        // Removed spans become spaces so neighbouring words never merge
        if self.config.strip_urls {
            text = URL_REGEX.replace_all(&text, " ").into_owned();
        }
        if self.config.strip_emails {
            text = EMAIL_REGEX.replace_all(&text, " ").into_owned();
        }
        if self.config.strip_digits {
            text = DIGITS_REGEX.replace_all(&text, " ").into_owned();
        }

        let text: String = match self.config.punctuation {
            PunctuationMode::Remove => text.chars().filter(|c| !c.is_ascii_punctuation()).collect(),
            PunctuationMode::ReplaceWithSpace => text
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                        c
                    } else {
                        ' '
                    }
                })
                .collect(),
        };

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Normalize a text and split it into whitespace tokens
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split(' ')
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }
}
