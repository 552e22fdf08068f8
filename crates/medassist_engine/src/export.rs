use std::path::PathBuf;

use medassist_logging::{session_info, session_warn};

use crate::persist::{save_document, PersistError};
use crate::{Backend, BackendError, ChatTurn, FailureKind};

/// File name every exported summary is saved under.
pub const DEFAULT_EXPORT_FILENAME: &str = "chat_summary.pdf";

const SUMMARIZE_FALLBACK: &str = "Failed to generate summary";
const FETCH_FALLBACK: &str = "Failed to download PDF";

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub filename: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub reference: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Summarize,
    Fetch,
    Deliver,
}

/// Every variant's message is what the user sees; the most specific text wins.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("{0}")]
    Summarize(String),
    #[error("No PDF filename received from server")]
    MissingReference,
    #[error("{0}")]
    Fetch(String),
    #[error("Generated PDF is empty")]
    EmptyArtifact,
    #[error("could not save summary: {0}")]
    Deliver(#[from] PersistError),
}

impl ExportError {
    pub fn stage(&self) -> ExportStage {
        match self {
            ExportError::Summarize(_) | ExportError::MissingReference => ExportStage::Summarize,
            ExportError::Fetch(_) | ExportError::EmptyArtifact => ExportStage::Fetch,
            ExportError::Deliver(_) => ExportStage::Deliver,
        }
    }
}

/// Local save of the generated document.
pub trait Delivery: Send + Sync {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError>;
}

/// Saves documents into a fixed download directory.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    dir: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl Delivery for DirectoryDelivery {
    fn deliver(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, PersistError> {
        save_document(&self.dir, filename, bytes)
    }
}

/// Summarize, fetch, deliver. The first failing stage aborts the rest.
pub async fn run_export(
    backend: &dyn Backend,
    delivery: &dyn Delivery,
    options: &ExportOptions,
    history: &[ChatTurn],
) -> Result<ExportReceipt, ExportError> {
    let result = export_stages(backend, delivery, options, history).await;
    match &result {
        Ok(receipt) => session_info!(
            "export saved {:?} ({} bytes, reference {})",
            receipt.path,
            receipt.byte_len,
            receipt.reference
        ),
        Err(err) => session_warn!("export failed at {:?}: {}", err.stage(), err),
    }
    result
}

async fn export_stages(
    backend: &dyn Backend,
    delivery: &dyn Delivery,
    options: &ExportOptions,
    history: &[ChatTurn],
) -> Result<ExportReceipt, ExportError> {
    let reference = backend
        .summarize(history)
        .await
        .map_err(|err| ExportError::Summarize(stage_message(&err, SUMMARIZE_FALLBACK)))?
        .filter(|name| !name.trim().is_empty())
        .ok_or(ExportError::MissingReference)?;

    let bytes = backend
        .fetch_document(&reference)
        .await
        .map_err(|err| ExportError::Fetch(stage_message(&err, FETCH_FALLBACK)))?;
    if bytes.is_empty() {
        return Err(ExportError::EmptyArtifact);
    }

    let path = delivery.deliver(&options.filename, &bytes)?;
    Ok(ExportReceipt {
        path,
        reference,
        byte_len: bytes.len() as u64,
    })
}

fn stage_message(err: &BackendError, fallback: &str) -> String {
    if let Some(detail) = err.detail.as_deref().filter(|d| !d.trim().is_empty()) {
        return detail.to_string();
    }
    match err.kind {
        FailureKind::HttpStatus(_) => fallback.to_string(),
        _ => err.to_string(),
    }
}
