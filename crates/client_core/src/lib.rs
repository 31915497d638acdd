//! Client-side analysis session for the NAT2 sequence classifier.
//!
//! The core validates and selects a sequence file, dispatches it to a classification
//! backend, decides whether the answer is a single label or a batch table, and exports
//! batch results. Backends and host shells plug in through [`AnalysisBackend`] and
//! [`HostShell`].

use anyhow::Result;
use async_trait::async_trait;

pub mod events;
pub mod host;
pub mod http_backend;
mod orchestrator;
mod presenter;
pub mod session;
pub mod surface;
pub mod timing;

pub use events::{
    BatchRow, Page, Presentation, ResultView, SessionEvent, SessionView, StatusLine,
    StatusSeverity,
};
pub use host::{
    DialogFilter, HostLink, HostShell, MissingHostShell, OpenDialogOptions, SaveDialogOptions,
};
pub use http_backend::HttpBackend;
pub use orchestrator::AnalysisOrchestrator;
pub use presenter::{
    ExportOutcome, ResultPresenter, DEFAULT_EXPORT_FILE_NAME, ELLIPSIS, SEQUENCE_PREVIEW_LIMIT,
};
pub use session::{SessionState, SharedSession};
pub use timing::PresentationPolicy;

/// Command surface of the classification backend. Paths are opaque handles the backend
/// knows how to resolve.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short prefix of the file, used to confirm it is readable.
    async fn preview_read(&self, path: &str) -> Result<String>;
    /// Either a plain label or a serialized array of `{id, sequence, classification}`.
    async fn classify(&self, path: &str) -> Result<String>;
    /// Turns a raw batch payload into exportable CSV text.
    async fn export_transform(&self, payload: &str) -> Result<String>;
    async fn persist(&self, destination: &str, content: &str) -> Result<()>;
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
