// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Built-in sample data

use serde::Serialize;
use shared_types::TrainingExample;

const SAMPLE_SPAM: [&str; 10] = [
    "URGENT: You have won a $1000 gift card! Click here to claim now!",
    "FREE VIAGRA NOW!!! Limited time offer, act fast!",
    "CONGRATULATIONS! You've been selected for a free iPhone!",
    "Make money fast! Work from home and earn $5000 per week!",
    "LOSE WEIGHT FAST! Try our miracle diet pill today!",
    "FREE CREDIT REPORT! Check your score now!",
    "WIN A FREE VACATION! Enter our sweepstakes now!",
    "MAKE MONEY ONLINE! Join our affiliate program!",
    "FREE SAMPLE! Try our new product today!",
    "URGENT: Your account has been suspended. Click here to verify!",
];

const SAMPLE_HAM: [&str; 10] = [
    "Hi John, can you send me the meeting notes from yesterday?",
    "Thanks for your help with the project. It looks great!",
    "Don't forget about the team lunch tomorrow at 12 PM.",
    "I'll be working from home today due to the weather.",
    "Please review the attached document and let me know your thoughts.",
    "The presentation went well. Thanks for your support!",
    "Can we schedule a call to discuss the new requirements?",
    "I've updated the spreadsheet with the latest data.",
    "Happy birthday! Hope you have a wonderful day!",
    "Let me know if you need any clarification on the report.",
];

/// Showcase texts grouped by expected label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoExamples {
    /// Legitimate messages
    pub ham: [&'static str; 5],
    /// Spam messages
    pub spam: [&'static str; 5],
}

/// The 20-example training corpus used when no corpus is supplied
///
/// Ten spam texts followed by ten ham texts.
pub fn sample_corpus() -> Vec<TrainingExample> {
    SAMPLE_SPAM
        .iter()
        .map(|text| TrainingExample::spam(*text))
        .chain(SAMPLE_HAM.iter().map(|text| TrainingExample::ham(*text)))
        .collect()
}

/// Texts offered to users for trying out the classifier
pub fn demo_examples() -> DemoExamples {
    DemoExamples {
        ham: [
            "Hi John, how are you doing? Let's meet for coffee tomorrow.",
            "The meeting is scheduled for 2 PM today. Please bring your laptop.",
            "Thanks for your email. I'll get back to you soon.",
            "Can you please send me the report by Friday?",
            "I'm looking forward to our presentation next week.",
        ],
        spam: [
            "FREE MONEY! Click here to claim your $1000 prize NOW!",
            "URGENT: You've won a million dollars! Send your bank details immediately!",
            "Buy Viagra online at 50% discount! Limited time offer!",
            "Earn $5000 per week working from home! No experience needed!",
            "CONGRATULATIONS! You're our lucky winner! Claim your prize!",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::SpamLabel;

    #[test]
    fn sample_corpus_is_balanced() {
        let corpus = sample_corpus();
        assert_eq!(corpus.len(), 20);
        assert_eq!(
            corpus.iter().filter(|e| e.label == SpamLabel::Spam).count(),
            10
        );
        assert!(corpus.iter().all(|e| !e.text.trim().is_empty()));
    }

    #[test]
    fn demo_examples_serialize_by_label() {
        let json = serde_json::to_value(demo_examples()).unwrap();
        assert_eq!(json["ham"].as_array().map(Vec::len), Some(5));
        assert_eq!(json["spam"].as_array().map(Vec::len), Some(5));
    }
}
