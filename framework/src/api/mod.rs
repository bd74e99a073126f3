//! Production API boundary
//!
//! The completion workflow talks to the backend only through
//! [`ProductionApi`], so tests and alternative transports can stand in for
//! the HTTP client.

mod client;
mod wire;

pub use client::HttpProductionApi;
pub use wire::{
    CompletionRequest, CorrectionRequest, DetailBahanRecord, DetailProduksiRecord,
    FinalizeRequest, NamedRef, OutputWeightPayload, RunRecord, SubmitReceipt, UserRef,
};

use crate::error::ApiError;
use crate::model::ProductionRun;
use async_trait::async_trait;

#[async_trait]
pub trait ProductionApi: Send + Sync {
    /// `GET /produksi/{id}`
    async fn fetch_run(&self, id: u64) -> Result<ProductionRun, ApiError>;

    /// `PUT /produksi/{id}/berat-hasil`
    async fn finalize(&self, id: u64, request: &FinalizeRequest)
        -> Result<SubmitReceipt, ApiError>;

    /// `PUT /produksi/{id}/edit-completed`
    async fn correct(&self, id: u64, request: &CorrectionRequest)
        -> Result<SubmitReceipt, ApiError>;

    /// Dispatch a request to the endpoint matching its mode
    async fn submit(
        &self,
        id: u64,
        request: &CompletionRequest,
    ) -> Result<SubmitReceipt, ApiError> {
        match request {
            CompletionRequest::Finalize(body) => self.finalize(id, body).await,
            CompletionRequest::Correct(body) => self.correct(id, body).await,
        }
    }
}
