//! Workflow public types

use crate::conservation::Violation;
use crate::error::{ApiError, ErrorKind};
use std::fmt;
use thiserror::Error;

/// Where a completion dialog is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// The draft accepts input
    Editing,
    /// Local checks are running on the draft
    Validating,
    /// One request is in flight; input and further submits are refused
    Submitting,
    /// The backend accepted the submission
    Done,
}

impl WorkflowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Validating => "validating",
            Self::Submitting => "submitting",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a submit did not go through
#[derive(Debug, Clone, Error)]
pub enum SubmitError {
    /// A request for this run is already in flight
    #[error("a submission for run {run_id} is already in progress")]
    AlreadySubmitting { run_id: u64 },

    /// The workflow cannot take input or a submit in its current state
    #[error("the completion is {state}, not editing")]
    NotEditing { state: WorkflowState },

    /// An outcome was reported with no request in flight
    #[error("no submission is in progress (state: {state})")]
    NotSubmitting { state: WorkflowState },

    /// The draft failed local validation; nothing was sent
    #[error(transparent)]
    Invalid(#[from] Violation),

    /// The request was sent and failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Classification of a transport or server failure
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Api(err) => Some(err.kind()),
            _ => None,
        }
    }
}
