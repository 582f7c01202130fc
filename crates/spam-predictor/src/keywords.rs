// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Spam and ham keyword lists
//!
//! Keyword lists are immutable once built. Reloading produces a new
//! [`KeywordLists`] value that callers swap in wholesale.

use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SpamPredictorError, SpamPredictorResult};

const DEFAULT_SPAM_KEYWORDS: &[&str] = &[
    "act now",
    "bonus",
    "buy",
    "cash",
    "cheap",
    "claim",
    "click",
    "click here",
    "congratulations",
    "credit",
    "deal",
    "discount",
    "dollars",
    "earn",
    "exclusive",
    "free",
    "guaranteed",
    "limited",
    "lottery",
    "million",
    "miracle",
    "money",
    "offer",
    "prize",
    "risk free",
    "selected",
    "sweepstakes",
    "urgent",
    "viagra",
    "win",
    "winner",
    "won",
];

const DEFAULT_HAM_KEYWORDS: &[&str] = &[
    "agenda",
    "attached",
    "birthday",
    "call",
    "coffee",
    "deadline",
    "dinner",
    "discuss",
    "document",
    "feedback",
    "help",
    "lunch",
    "meeting",
    "notes",
    "office",
    "please",
    "presentation",
    "project",
    "question",
    "regards",
    "report",
    "review",
    "schedule",
    "team",
    "thank",
    "thanks",
    "tomorrow",
    "update",
    "updated",
];

/// On-disk shape of the keyword lists before validation
#[derive(Debug, Clone, Deserialize)]
struct RawKeywordLists {
    spam_keywords: Vec<String>,
    ham_keywords: Vec<String>,
}

/// Two disjoint sets of lowercase keywords and phrases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawKeywordLists")]
pub struct KeywordLists {
    spam_keywords: BTreeSet<String>,
    ham_keywords: BTreeSet<String>,
    #[serde(skip)]
    max_phrase_words: usize,
}

/// Keyword hits of a token stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordHits {
    /// Matches against the spam list
    pub spam: u64,
    /// Matches against the ham list
    pub ham: u64,
}

impl KeywordLists {
    /// Build keyword lists, canonicalizing every entry to lowercase single-spaced form
    ///
    /// # Errors
    ///
    /// Returns a validation error if an entry is blank or appears in both lists
    pub fn new<S, H>(spam_keywords: S, ham_keywords: H) -> SpamPredictorResult<Self>
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        H: IntoIterator,
        H::Item: AsRef<str>,
    {
        let spam_keywords = canonical_set(spam_keywords)?;
        let ham_keywords = canonical_set(ham_keywords)?;

        if let Some(shared) = spam_keywords.intersection(&ham_keywords).next() {
            return Err(SpamPredictorError::validation(format!(
                "keyword '{shared}' appears in both spam and ham lists"
            )));
        }

        let max_phrase_words = longest_phrase(&spam_keywords, &ham_keywords);

        Ok(Self {
            spam_keywords,
            ham_keywords,
            max_phrase_words,
        })
    }

    /// Load keyword lists from a YAML or JSON file
    ///
    /// The format is chosen from the file extension (`.json` is JSON,
    /// everything else is parsed as YAML).
    pub fn from_file<P: AsRef<Path>>(path: P) -> SpamPredictorResult<Self> {
        let path = path.as_ref();
        debug!("Loading keyword lists from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|e| {
            SpamPredictorError::io(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let lists: KeywordLists = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| {
                SpamPredictorError::json(format!("Failed to parse {}: {}", path.display(), e))
            })?
        } else {
            serde_yaml::from_str(&content).map_err(|e| {
                SpamPredictorError::yaml(format!("Failed to parse {}: {}", path.display(), e))
            })?
        };

        info!(
            "Loaded {} spam and {} ham keywords from {}",
            lists.spam_keywords.len(),
            lists.ham_keywords.len(),
            path.display()
        );

        Ok(lists)
    }

    /// Spam keyword set
    pub fn spam_keywords(&self) -> &BTreeSet<String> {
        &self.spam_keywords
    }

    /// Ham keyword set
    pub fn ham_keywords(&self) -> &BTreeSet<String> {
        &self.ham_keywords
    }

    /// Count keyword matches in a normalized token stream
    ///
    /// Single-word keywords are compared against whole tokens, never
    /// substrings. A phrase of `n` words matches `n` consecutive tokens.
    /// At each position the longest entry wins and its tokens are not
    /// matched again, so `click here` counts once even though `click` is
    /// also listed.
    pub fn count_hits<S: AsRef<str>>(&self, tokens: &[S]) -> KeywordHits {
        let mut hits = KeywordHits::default();
        let mut window = String::new();
        let mut start = 0;

        while start < tokens.len() {
            window.clear();
            let mut longest: Option<(usize, bool)> = None;

            for (offset, token) in tokens[start..].iter().take(self.max_phrase_words).enumerate() {
                if offset > 0 {
                    window.push(' ');
                }
                window.push_str(token.as_ref());

                if self.spam_keywords.contains(window.as_str()) {
                    longest = Some((offset + 1, true));
                } else if self.ham_keywords.contains(window.as_str()) {
                    longest = Some((offset + 1, false));
                }
            }

            match longest {
                Some((words, is_spam)) => {
                    if is_spam {
                        hits.spam += 1;
                    } else {
                        hits.ham += 1;
                    }
                    start += words;
                }
                None => start += 1,
            }
        }

        hits
    }
}

impl Default for KeywordLists {
    fn default() -> Self {
        let spam_keywords: BTreeSet<String> =
            DEFAULT_SPAM_KEYWORDS.iter().map(ToString::to_string).collect();
        let ham_keywords: BTreeSet<String> =
            DEFAULT_HAM_KEYWORDS.iter().map(ToString::to_string).collect();
        let max_phrase_words = longest_phrase(&spam_keywords, &ham_keywords);
        Self {
            spam_keywords,
            ham_keywords,
            max_phrase_words,
        }
    }
}

impl TryFrom<RawKeywordLists> for KeywordLists {
    type Error = SpamPredictorError;

    fn try_from(raw: RawKeywordLists) -> Result<Self, Self::Error> {
        Self::new(raw.spam_keywords, raw.ham_keywords)
    }
}

fn longest_phrase(spam: &BTreeSet<String>, ham: &BTreeSet<String>) -> usize {
    spam.iter()
        .chain(ham)
        .map(|keyword| keyword.split(' ').count())
        .max()
        .unwrap_or(0)
}

fn canonical_set<I>(keywords: I) -> SpamPredictorResult<BTreeSet<String>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    keywords
        .into_iter()
        .map(|keyword| {
            let canonical = keyword
                .as_ref()
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ");
            if canonical.is_empty() {
                Err(SpamPredictorError::validation("keyword entries cannot be blank"))
            } else {
                Ok(canonical)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::Builder;

    use super::*;

    fn tokens(text: &str) -> Vec<&str> {
        text.split(' ').collect()
    }

    #[test]
    fn default_lists_are_disjoint() {
        let lists = KeywordLists::default();
        assert!(lists.spam_keywords().is_disjoint(lists.ham_keywords()));
        assert!(lists.spam_keywords().contains("free"));
        assert!(lists.ham_keywords().contains("project"));

        let rebuilt = KeywordLists::new(DEFAULT_SPAM_KEYWORDS, DEFAULT_HAM_KEYWORDS).unwrap();
        assert_eq!(rebuilt, lists);
    }

    #[test]
    fn exact_token_matching() {
        let lists = KeywordLists::new(["free"], ["help"]).unwrap();
        let hits = lists.count_hits(&tokens("freedom is free and free helpers help"));
        assert_eq!(hits, KeywordHits { spam: 2, ham: 1 });
    }

    #[test]
    fn phrase_matching() {
        let lists = KeywordLists::new(["click here", "act now"], ["thank"]).unwrap();
        let hits = lists.count_hits(&tokens("click here or click there and act now"));
        assert_eq!(hits.spam, 2);
        assert_eq!(hits.ham, 0);
    }

    #[test]
    fn overlapping_entries_count_once() {
        let lists = KeywordLists::default();
        assert!(lists.spam_keywords().contains("click"));
        assert!(lists.spam_keywords().contains("click here"));

        assert_eq!(lists.count_hits(&tokens("click here")).spam, 1);
        assert_eq!(lists.count_hits(&tokens("click click here")).spam, 2);
        assert_eq!(lists.count_hits(&tokens("risk free money")).spam, 2);
        assert_eq!(lists.count_hits(&tokens("click")).spam, 1);
    }

    #[test]
    fn longest_entry_wins_across_lists() {
        let lists = KeywordLists::new(["meeting room"], ["meeting", "room"]).unwrap();
        let hits = lists.count_hits(&tokens("meeting room meeting"));
        assert_eq!(hits, KeywordHits { spam: 1, ham: 1 });
    }

    #[test]
    fn empty_stream_has_no_hits() {
        let lists = KeywordLists::default();
        let empty: Vec<&str> = Vec::new();
        assert_eq!(lists.count_hits(&empty), KeywordHits::default());
    }

    #[test]
    fn entries_are_canonicalized() {
        let lists = KeywordLists::new(["  FREE ", "Click   Here"], ["Help"]).unwrap();
        assert!(lists.spam_keywords().contains("free"));
        assert!(lists.spam_keywords().contains("click here"));
        assert!(lists.ham_keywords().contains("help"));
    }

    #[test]
    fn overlapping_lists_are_rejected() {
        let err = KeywordLists::new(["free", "help"], ["HELP"]).unwrap_err();
        assert!(matches!(err, SpamPredictorError::Validation { .. }));

        assert!(KeywordLists::new([" "], ["ok"]).is_err());
    }

    #[test]
    fn load_from_yaml_and_json() {
        let mut yaml = Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "spam_keywords: [prize, act now]\nham_keywords: [agenda]").unwrap();
        let lists = KeywordLists::from_file(yaml.path()).unwrap();
        assert_eq!(lists.spam_keywords().len(), 2);
        assert_eq!(lists.count_hits(&tokens("act now for a prize")).spam, 2);

        let mut json = Builder::new().suffix(".json").tempfile().unwrap();
        write!(json, r#"{{"spam_keywords": ["x"], "ham_keywords": ["x"]}}"#).unwrap();
        assert!(KeywordLists::from_file(json.path()).is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = KeywordLists::from_file("/nonexistent/keywords.yaml").unwrap_err();
        assert!(matches!(err, SpamPredictorError::Io { .. }));
    }
}
