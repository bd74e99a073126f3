//! Completion draft: the working copy a completion dialog edits
//!
//! A draft is built fresh from a [`ProductionRun`] each time the dialog opens,
//! edited in memory, and turned into a request body on submit. It never does
//! I/O.

use crate::api::{CompletionRequest, CorrectionRequest, FinalizeRequest, OutputWeightPayload};
use crate::model::{DetailId, ProductionRun};
use crate::numeric::{normalize_decimal, normalize_integer, Weight};

/// Whether a submission finalizes the run or corrects an already completed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// First-time completion; the run is closed by the submission
    Finalize,
    /// Re-editing the output of a run that is already completed
    Correct,
}

impl CompletionMode {
    pub fn finalizes(&self) -> bool {
        matches!(self, Self::Finalize)
    }
}

/// Working copy of one employee's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftEntry {
    pub id: DetailId,
    pub employee: String,
    pub output_weight: Weight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDraft {
    entries: Vec<DraftEntry>,
    manual_stock: u32,
    mode: CompletionMode,
}

impl CompletionDraft {
    /// Hydrate a draft from the run's current output rows
    ///
    /// Stock starts at zero for a first-time completion and at the recorded
    /// value when correcting a completed run.
    pub fn initialize(run: &ProductionRun) -> Self {
        let mode = if run.is_completed() {
            CompletionMode::Correct
        } else {
            CompletionMode::Finalize
        };

        let entries = run
            .outputs
            .iter()
            .map(|o| DraftEntry {
                id: o.id,
                employee: o.employee.clone(),
                output_weight: o.output_weight,
            })
            .collect();

        let manual_stock = match mode {
            CompletionMode::Finalize => 0,
            CompletionMode::Correct => run.recorded_stock,
        };

        Self {
            entries,
            manual_stock,
            mode,
        }
    }

    pub fn entries(&self) -> &[DraftEntry] {
        &self.entries
    }

    pub fn entry(&self, id: DetailId) -> Option<&DraftEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn manual_stock(&self) -> u32 {
        self.manual_stock
    }

    pub fn mode(&self) -> CompletionMode {
        self.mode
    }

    /// Replace the output weight of exactly one entry
    ///
    /// An id that is not on the draft is ignored; the return value tells
    /// whether an entry was touched.
    pub fn set_output_weight(&mut self, id: DetailId, value: Weight) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.output_weight = value;
                true
            }
            None => false,
        }
    }

    pub fn set_manual_stock(&mut self, value: u32) {
        self.manual_stock = value;
    }

    /// Feed raw field text for one entry through the decimal normalizer
    pub fn input_output_weight(&mut self, id: DetailId, raw: &str) -> bool {
        let prior = match self.entry(id) {
            Some(entry) => entry.output_weight,
            None => return false,
        };
        self.set_output_weight(id, normalize_decimal(raw, prior))
    }

    /// Feed raw field text for the stock count through the integer normalizer
    pub fn input_manual_stock(&mut self, raw: &str) {
        self.manual_stock = normalize_integer(raw, self.manual_stock);
    }

    pub fn total_output_weight(&self) -> Weight {
        self.entries.iter().map(|e| e.output_weight).sum()
    }

    /// Material consumed by the run, recomputed on every call
    pub fn total_material_input(&self, run: &ProductionRun) -> Weight {
        run.material_input_total()
    }

    /// Request body for the endpoint matching this draft's mode
    pub fn to_request(&self) -> CompletionRequest {
        let detail_produksi: Vec<OutputWeightPayload> = self
            .entries
            .iter()
            .map(|e| OutputWeightPayload {
                id_dproduksi: e.id,
                berat_hasil: e.output_weight,
            })
            .collect();

        match self.mode {
            CompletionMode::Finalize => CompletionRequest::Finalize(FinalizeRequest {
                detail_produksi,
                stok_manual: self.manual_stock,
                selesaikan_produksi: true,
            }),
            CompletionMode::Correct => CompletionRequest::Correct(CorrectionRequest {
                detail_produksi,
                stok_manual: self.manual_stock,
            }),
        }
    }
}
