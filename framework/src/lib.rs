pub mod api;
pub mod config;
pub mod conservation;
pub mod draft;
pub mod error;
pub mod model;
pub mod numeric;
pub mod session;
pub mod testing;
pub mod workflow;

pub use api::{CompletionRequest, HttpProductionApi, ProductionApi, SubmitReceipt};
pub use config::{ApiConfig, AppConfig, Config, ConfigError, Environment};
pub use conservation::{validate, ValidationResult, Violation};
pub use draft::{CompletionDraft, CompletionMode, DraftEntry};
pub use error::{ApiError, ErrorKind, ValidationErrors};
pub use model::{DetailId, ProductionRun, ProductionStatus};
pub use numeric::Weight;
pub use session::{NoAuth, StaticToken, TokenSource};
pub use workflow::{CompletionWorkflow, SubmitError, WorkflowState};
