// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the spam classification service
//!
//! This crate provides the label and training example types that are shared
//! between the classification engine and the HTTP layer, avoiding circular
//! dependencies.

pub mod label;
pub mod training;

pub use label::{LabelError, SpamLabel};
pub use training::TrainingExample;
