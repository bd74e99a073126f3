//! HTTP implementation of [`ProductionApi`]

use super::wire::{unwrap_envelope, ErrorBody, RunRecord};
use super::{CorrectionRequest, FinalizeRequest, ProductionApi, SubmitReceipt};
use crate::config::ApiConfig;
use crate::error::{ApiError, ValidationErrors};
use crate::model::ProductionRun;
use crate::session::TokenSource;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// JSON client for the `/produksi` endpoints
///
/// Every request carries the bearer token from the configured
/// [`TokenSource`]; timeouts come from [`ApiConfig::timeout`].
pub struct HttpProductionApi {
    http: reqwest::Client,
    base_url: String,
    token_source: Arc<dyn TokenSource>,
}

impl HttpProductionApi {
    pub fn new(config: &ApiConfig, token_source: Arc<dyn TokenSource>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            token_source,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach JSON headers and the Authorization header
    async fn authed(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        let builder = builder.header(reqwest::header::ACCEPT, "application/json");
        match self.token_source.token().await? {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Ok(builder),
        }
    }

    /// Read a JSON response, mapping non-2xx statuses to [`ApiError`]
    ///
    /// An empty success body reads as `{}`.
    async fn parse(resp: reqwest::Response) -> Result<serde_json::Value, ApiError> {
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            return Err(error_from_body(status, &bytes));
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Object(Default::default()));
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::decode(format!("response body: {}", e)))
    }

    async fn put_json<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<SubmitReceipt, ApiError> {
        let url = self.url(path);
        debug!(%url, "PUT");
        let req = self.authed(self.http.put(&url).json(body)).await?;
        let result = match Self::parse(req.send().await?).await {
            Ok(body) => decode::<SubmitReceipt>(body),
            Err(err) => Err(err),
        };
        if let Err(err) = &result {
            warn!(%url, kind = err.kind().as_str(), error = %err, "request failed");
        }
        result
    }
}

fn decode<R: DeserializeOwned>(body: serde_json::Value) -> Result<R, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::decode(format!("response body: {}", e)))
}

/// Build the error for a non-2xx response from its body
///
/// A JSON `message` is passed through verbatim; a 422 with an `errors`
/// object becomes [`ApiError::Validation`]; anything else keeps the raw text.
fn error_from_body(status: reqwest::StatusCode, bytes: &[u8]) -> ApiError {
    let code = status.as_u16();
    let parsed: Option<ErrorBody> = serde_json::from_slice(bytes).ok();
    let raw = String::from_utf8_lossy(bytes).trim().to_string();

    let message = parsed
        .as_ref()
        .and_then(|b| b.message.clone())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if raw.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                raw.clone()
            }
        });

    match parsed.and_then(|b| b.errors) {
        Some(errors) if code == 422 => ApiError::Validation {
            message,
            errors: ValidationErrors::from_map(errors),
        },
        _ => ApiError::server(code, message),
    }
}

#[async_trait]
impl ProductionApi for HttpProductionApi {
    async fn fetch_run(&self, id: u64) -> Result<ProductionRun, ApiError> {
        let url = self.url(&format!("/produksi/{}", id));
        debug!(%url, "GET");
        let req = self.authed(self.http.get(&url)).await?;
        let body = Self::parse(req.send().await?).await?;
        decode::<RunRecord>(unwrap_envelope(body))?.into_run(id)
    }

    async fn finalize(
        &self,
        id: u64,
        request: &FinalizeRequest,
    ) -> Result<SubmitReceipt, ApiError> {
        self.put_json(&FinalizeRequest::path(id), request).await
    }

    async fn correct(
        &self,
        id: u64,
        request: &CorrectionRequest,
    ) -> Result<SubmitReceipt, ApiError> {
        self.put_json(&CorrectionRequest::path(id), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CompletionRequest, OutputWeightPayload};
    use crate::error::ErrorKind;
    use crate::model::DetailId;
    use crate::numeric::Weight;
    use crate::session::StaticToken;
    use crate::testing::{StubBackend, StubResponse};
    use http::Method;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn client_for(stub: &StubBackend) -> HttpProductionApi {
        let config = ApiConfig::builder()
            .base_url(stub.url())
            .timeout(Duration::from_secs(2))
            .build();
        HttpProductionApi::new(&config, Arc::new(StaticToken::new("tok-123"))).unwrap()
    }

    fn finalize_body() -> FinalizeRequest {
        FinalizeRequest {
            detail_produksi: vec![OutputWeightPayload {
                id_dproduksi: DetailId(11),
                berat_hasil: Weight::from_grams(4_500),
            }],
            stok_manual: 20,
            selesaikan_produksi: true,
        }
    }

    #[tokio::test]
    async fn test_fetch_run_sends_token_and_decodes() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::GET,
            "/produksi/7",
            StubResponse::json(200, json!({
                "data": {
                    "id": 7,
                    "kode_produksi": "PRD-7",
                    "status": "dalam_proses",
                    "detailProduksi": [
                        { "id_dproduksi": 11, "berat_hasil": 0, "user": { "nama": "Sari" } }
                    ],
                    "detailBahan": [{ "berat": "10.000" }]
                }
            })),
        );

        let run = client_for(&stub).fetch_run(7).await.unwrap();
        assert_eq!(run.code, "PRD-7");
        assert_eq!(run.material_input_total(), Weight::from_grams(10_000));

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer tok-123"));
    }

    #[tokio::test]
    async fn test_finalize_puts_expected_body() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::PUT,
            "/produksi/7/berat-hasil",
            StubResponse::json(200, json!({ "message": "Produksi selesai" })),
        );

        let receipt = client_for(&stub).finalize(7, &finalize_body()).await.unwrap();
        assert_eq!(receipt.message.as_deref(), Some("Produksi selesai"));

        let requests = stub.requests();
        assert_eq!(requests[0].method, Method::PUT);
        assert_eq!(
            requests[0].json(),
            Some(json!({
                "detail_produksi": [{ "id_dproduksi": 11, "berat_hasil": 4.5 }],
                "stok_manual": 20,
                "selesaikan_produksi": true
            }))
        );
    }

    #[tokio::test]
    async fn test_submit_dispatches_correction() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::PUT,
            "/produksi/7/edit-completed",
            StubResponse::json(200, json!({ "message": "ok" })),
        );

        let request = CompletionRequest::Correct(CorrectionRequest {
            detail_produksi: finalize_body().detail_produksi,
            stok_manual: 3,
        });
        client_for(&stub).submit(7, &request).await.unwrap();

        let requests = stub.requests();
        assert_eq!(requests[0].path, "/produksi/7/edit-completed");
        assert!(requests[0].json().unwrap().get("selesaikan_produksi").is_none());
    }

    #[tokio::test]
    async fn test_server_message_is_propagated() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::PUT,
            "/produksi/7/berat-hasil",
            StubResponse::json(500, json!({ "message": "Deadlock found when trying to get lock" })),
        );

        let err = client_for(&stub).finalize(7, &finalize_body()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Contention);
        assert_eq!(err.message(), "Deadlock found when trying to get lock");
    }

    #[tokio::test]
    async fn test_conflict_and_plain_text_errors() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(Method::PUT, "/produksi/7/berat-hasil", StubResponse::text(409, "stale"));

        let err = client_for(&stub).finalize(7, &finalize_body()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(err.message(), "stale");
    }

    #[tokio::test]
    async fn test_unprocessable_carries_field_errors() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::PUT,
            "/produksi/7/berat-hasil",
            StubResponse::json(422, json!({
                "message": "The given data was invalid.",
                "errors": { "stok_manual": ["The stok manual must be at least 1."] }
            })),
        );

        match client_for(&stub).finalize(7, &finalize_body()).await.unwrap_err() {
            ApiError::Validation { message, errors } => {
                assert_eq!(message, "The given data was invalid.");
                assert_eq!(
                    errors.first(),
                    Some(("stok_manual", "The stok manual must be at least 1."))
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_decode_error() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(Method::GET, "/produksi/7", StubResponse::text(200, "<html>login</html>"));

        let err = client_for(&stub).fetch_run(7).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let stub = StubBackend::start().await.unwrap();
        stub.on(
            Method::GET,
            "/produksi/7",
            StubResponse::json(200, json!({ "status": "selesai" })).delay(Duration::from_secs(5)),
        );

        let config = ApiConfig::builder()
            .base_url(stub.url())
            .timeout(Duration::from_millis(200))
            .build();
        let api = HttpProductionApi::new(&config, Arc::new(StaticToken::new("t"))).unwrap();

        let err = api.fetch_run(7).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
    }

    #[test]
    fn test_error_from_empty_body_uses_reason() {
        let err = error_from_body(reqwest::StatusCode::SERVICE_UNAVAILABLE, b"");
        assert_eq!(err.message(), "Service Unavailable");
        assert_eq!(err.kind(), ErrorKind::Contention);
    }
}
