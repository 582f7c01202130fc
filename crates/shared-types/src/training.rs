// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Labeled training examples

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::label::SpamLabel;

/// A single labeled text used to fit a classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TrainingExample {
    /// Raw message text
    #[schema(example = "FREE SAMPLE! Try our new product today!")]
    pub text: String,
    /// Expected label
    pub label: SpamLabel,
}

impl TrainingExample {
    /// Create a new training example
    pub fn new(text: impl Into<String>, label: SpamLabel) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }

    /// Create a spam-labeled example
    pub fn spam(text: impl Into<String>) -> Self {
        Self::new(text, SpamLabel::Spam)
    }

    /// Create a ham-labeled example
    pub fn ham(text: impl Into<String>) -> Self {
        Self::new(text, SpamLabel::Ham)
    }
}
