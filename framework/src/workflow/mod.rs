//! Completion workflow
//!
//! Drives one completion dialog through
//! `Editing -> Validating -> Submitting -> Done`:
//!
//! - input is accepted only while editing
//! - a draft that fails validation stays in editing, untouched
//! - one request at a time; a second submit is refused without a network call
//! - a failed request returns to editing with the draft exactly as it was
//!
//! # Example
//!
//! ```rust,no_run
//! use produksi::model::DetailId;
//! use produksi::{CompletionWorkflow, HttpProductionApi};
//!
//! # async fn demo(api: HttpProductionApi) -> Result<(), Box<dyn std::error::Error>> {
//! let mut workflow = CompletionWorkflow::load(&api, 42).await?;
//! workflow.input_output_weight(DetailId(7), "12.5")?;
//! workflow.input_manual_stock("40")?;
//! let receipt = workflow.submit(&api).await?;
//! println!("{}", receipt.message.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod types;

pub use types::{SubmitError, WorkflowState};

use crate::api::{CompletionRequest, ProductionApi, SubmitReceipt};
use crate::conservation::{validate, ValidationResult};
use crate::draft::CompletionDraft;
use crate::error::{ApiError, ValidationErrors};
use crate::model::{DetailId, ProductionRun};
use crate::numeric::Weight;
use tracing::{debug, info, warn};

/// One completion dialog for one production run
#[derive(Debug, Clone)]
pub struct CompletionWorkflow {
    run: ProductionRun,
    draft: CompletionDraft,
    state: WorkflowState,
}

impl CompletionWorkflow {
    /// Start editing a freshly loaded run
    pub fn open(run: ProductionRun) -> Self {
        let draft = CompletionDraft::initialize(&run);
        debug!(run_id = run.id, mode = ?draft.mode(), "completion opened");
        Self {
            run,
            draft,
            state: WorkflowState::Editing,
        }
    }

    /// Fetch the run and start editing it
    pub async fn load(api: &dyn ProductionApi, run_id: u64) -> Result<Self, ApiError> {
        let run = api.fetch_run(run_id).await?;
        Ok(Self::open(run))
    }

    pub fn run(&self) -> &ProductionRun {
        &self.run
    }

    pub fn draft(&self) -> &CompletionDraft {
        &self.draft
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Current local verdict on the draft, without changing state
    pub fn check(&self) -> ValidationResult {
        validate(&self.draft, &self.run)
    }

    /// Set one entry's weight; `false` when the id is not on the run
    pub fn set_output_weight(&mut self, id: DetailId, value: Weight) -> Result<bool, SubmitError> {
        self.ensure_editing()?;
        Ok(self.draft.set_output_weight(id, value))
    }

    /// Normalize typed text into one entry's weight
    pub fn input_output_weight(&mut self, id: DetailId, raw: &str) -> Result<bool, SubmitError> {
        self.ensure_editing()?;
        Ok(self.draft.input_output_weight(id, raw))
    }

    pub fn set_manual_stock(&mut self, value: u32) -> Result<(), SubmitError> {
        self.ensure_editing()?;
        self.draft.set_manual_stock(value);
        Ok(())
    }

    /// Normalize typed text into the finished-piece count
    pub fn input_manual_stock(&mut self, raw: &str) -> Result<(), SubmitError> {
        self.ensure_editing()?;
        self.draft.input_manual_stock(raw);
        Ok(())
    }

    /// Validate the draft and, if it passes, enter `Submitting`
    ///
    /// Returns the request to send. The caller must report the outcome
    /// through [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<CompletionRequest, SubmitError> {
        match self.state {
            WorkflowState::Editing => {}
            WorkflowState::Submitting => {
                warn!(run_id = self.run.id, "submit refused: already submitting");
                return Err(SubmitError::AlreadySubmitting {
                    run_id: self.run.id,
                });
            }
            state => return Err(SubmitError::NotEditing { state }),
        }

        self.transition(WorkflowState::Validating);
        if let Err(violation) = validate(&self.draft, &self.run).into_result() {
            debug!(run_id = self.run.id, %violation, "draft rejected");
            self.transition(WorkflowState::Editing);
            return Err(SubmitError::Invalid(violation));
        }

        self.transition(WorkflowState::Submitting);
        Ok(self.draft.to_request())
    }

    /// Record the outcome of the request started by
    /// [`begin_submit`](Self::begin_submit)
    pub fn finish_submit(
        &mut self,
        outcome: Result<SubmitReceipt, ApiError>,
    ) -> Result<SubmitReceipt, SubmitError> {
        if self.state != WorkflowState::Submitting {
            return Err(SubmitError::NotSubmitting { state: self.state });
        }

        match outcome {
            Ok(receipt) => {
                self.transition(WorkflowState::Done);
                info!(run_id = self.run.id, mode = ?self.draft.mode(), "completion submitted");
                Ok(receipt)
            }
            Err(err) => {
                warn!(
                    run_id = self.run.id,
                    kind = err.kind().as_str(),
                    error = %err,
                    "completion submit failed"
                );
                self.transition(WorkflowState::Editing);
                Err(SubmitError::Api(err))
            }
        }
    }

    /// Give up on the request started by [`begin_submit`](Self::begin_submit)
    /// without an outcome
    ///
    /// Returns to `Editing` with the draft unchanged. Whether the backend
    /// applied the request is unknown.
    pub fn abort_submit(&mut self) -> Result<(), SubmitError> {
        if self.state != WorkflowState::Submitting {
            return Err(SubmitError::NotSubmitting { state: self.state });
        }

        warn!(run_id = self.run.id, "completion submit abandoned before a response");
        self.transition(WorkflowState::Editing);
        Ok(())
    }

    /// Validate, send, and record the outcome
    ///
    /// Payload field checks run before anything goes on the wire; a payload
    /// that fails them is reported as a 422-style [`ApiError::Validation`].
    ///
    /// Dropping the returned future before it completes puts the workflow
    /// back in `Editing`.
    pub async fn submit(&mut self, api: &dyn ProductionApi) -> Result<SubmitReceipt, SubmitError> {
        let request = self.begin_submit()?;
        let mut in_flight = InFlight(self);

        let outcome = match request.validate() {
            Ok(()) => api.submit(in_flight.0.run.id, &request).await,
            Err(errors) => Err(ApiError::Validation {
                message: "request payload is invalid".to_string(),
                errors: ValidationErrors::from_validator(errors),
            }),
        };

        in_flight.0.finish_submit(outcome)
    }

    /// Abandon the dialog; nothing is sent
    pub fn cancel(self) -> CompletionDraft {
        debug!(run_id = self.run.id, state = %self.state, "completion cancelled");
        self.draft
    }

    fn ensure_editing(&self) -> Result<(), SubmitError> {
        match self.state {
            WorkflowState::Editing => Ok(()),
            WorkflowState::Submitting => Err(SubmitError::AlreadySubmitting {
                run_id: self.run.id,
            }),
            state => Err(SubmitError::NotEditing { state }),
        }
    }

    fn transition(&mut self, to: WorkflowState) {
        debug!(run_id = self.run.id, from = %self.state, to = %to, "workflow transition");
        self.state = to;
    }
}

/// Held across the request in [`CompletionWorkflow::submit`]; aborts the
/// submission if the future is dropped before an outcome is recorded
struct InFlight<'a>(&'a mut CompletionWorkflow);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.0.state == WorkflowState::Submitting {
            let _ = self.0.abort_submit();
        }
    }
}
