//! Testing utilities
//!
//! - [`StubBackend`] serves canned `/produksi` responses over real HTTP and
//!   records what it was sent
//! - [`fixtures`] builds production runs without going through the wire
//!
//! # Example
//!
//! ```rust,no_run
//! use produksi::testing::{StubBackend, StubResponse};
//!
//! # async fn demo() -> std::io::Result<()> {
//! let stub = StubBackend::start().await?;
//! stub.on(
//!     http::Method::GET,
//!     "/produksi/1",
//!     StubResponse::json(200, serde_json::json!({ "status": "selesai" })),
//! );
//! println!("point the client at {}", stub.url());
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
mod stub;

pub use stub::{RecordedRequest, StubBackend, StubResponse};
