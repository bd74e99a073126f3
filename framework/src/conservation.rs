//! Conservation validator
//!
//! Gatekeeper between a [`CompletionDraft`] and the finalize call. A run
//! cannot report more finished output weight than the raw material it
//! consumed, every listed employee must report a non-zero contribution, and
//! at least one finished piece must be counted.
//!
//! The weight rule is a business proxy for "no more product than raw
//! material used", not a mass balance: process yield loss is not modelled,
//! so any output up to and including the input weight passes.
//!
//! Checks run in a fixed order and the first failure is reported:
//!
//! 1. [`Violation::EmptyContribution`]
//! 2. [`Violation::MissingStockCount`]
//! 3. [`Violation::MaterialExceeded`]

use crate::draft::CompletionDraft;
use crate::model::{DetailId, ProductionRun};
use crate::numeric::Weight;
use thiserror::Error;

/// Structured reason a draft was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// An entry has no output weight, or the draft has no entries at all
    #[error("output weight missing for detail {}", describe_entry(.entry))]
    EmptyContribution { entry: Option<DetailId> },

    #[error("finished stock count must be at least one piece")]
    MissingStockCount,

    /// `excess` is always `total_output - total_input`, never clamped
    #[error("output {total_output} kg exceeds material input {total_input} kg by {excess} kg")]
    MaterialExceeded {
        total_output: Weight,
        total_input: Weight,
        excess: Weight,
    },
}

fn describe_entry(entry: &Option<DetailId>) -> String {
    match entry {
        Some(id) => id.to_string(),
        None => "(no entries)".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Violation),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn into_result(self) -> Result<(), Violation> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(violation) => Err(violation),
        }
    }
}

/// Check a draft against the run it completes
///
/// Pure: the same draft and run always give the same answer.
pub fn validate(draft: &CompletionDraft, run: &ProductionRun) -> ValidationResult {
    if draft.entries().is_empty() {
        return ValidationResult::Invalid(Violation::EmptyContribution { entry: None });
    }

    if let Some(empty) = draft.entries().iter().find(|e| e.output_weight.is_zero()) {
        return ValidationResult::Invalid(Violation::EmptyContribution {
            entry: Some(empty.id),
        });
    }

    if draft.manual_stock() == 0 {
        return ValidationResult::Invalid(Violation::MissingStockCount);
    }

    let total_output = draft.total_output_weight();
    let total_input = draft.total_material_input(run);
    if total_output > total_input {
        return ValidationResult::Invalid(Violation::MaterialExceeded {
            total_output,
            total_input,
            excess: total_output.saturating_sub(total_input),
        });
    }

    ValidationResult::Valid
}
