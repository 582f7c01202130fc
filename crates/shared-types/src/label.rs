// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Message classification labels

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error raised when an integer class index cannot be mapped to a label
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid class index {0}, expected 0 (ham) or 1 (spam)")]
pub struct LabelError(pub i64);

/// Binary label of a short text message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SpamLabel {
    /// Legitimate message
    Ham,
    /// Unsolicited or malicious message
    Spam,
}

impl SpamLabel {
    /// Both labels in class-index order
    pub const ALL: [SpamLabel; 2] = [SpamLabel::Ham, SpamLabel::Spam];

    /// Class index used by the statistical model (ham = 0, spam = 1)
    pub const fn index(self) -> usize {
        match self {
            SpamLabel::Ham => 0,
            SpamLabel::Spam => 1,
        }
    }

    /// Label for a class index
    pub fn from_index(index: usize) -> Result<Self, LabelError> {
        match index {
            0 => Ok(SpamLabel::Ham),
            1 => Ok(SpamLabel::Spam),
            other => Err(LabelError(i64::try_from(other).unwrap_or(i64::MAX))),
        }
    }

    /// Check if the label represents spam
    pub fn is_spam(self) -> bool {
        matches!(self, SpamLabel::Spam)
    }

    /// Lowercase name of the label
    pub fn as_str(self) -> &'static str {
        match self {
            SpamLabel::Ham => "ham",
            SpamLabel::Spam => "spam",
        }
    }
}

impl TryFrom<i64> for SpamLabel {
    type Error = LabelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SpamLabel::Ham),
            1 => Ok(SpamLabel::Spam),
            other => Err(LabelError(other)),
        }
    }
}

impl From<SpamLabel> for u8 {
    fn from(label: SpamLabel) -> Self {
        match label {
            SpamLabel::Ham => 0,
            SpamLabel::Spam => 1,
        }
    }
}

impl fmt::Display for SpamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
