use std::fmt;

use serde::{Deserialize, Serialize};

use crate::export::{ExportError, ExportReceipt};

pub type QueryId = u64;
pub type RequestId = u64;

/// Which long-running backend operation produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    WebScraping,
    RagRetrieval,
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AskReply {
    pub message: String,
    pub operation: Operation,
    pub sources: Vec<String>,
    pub cached: bool,
}

/// Body of `GET /search`.
#[derive(Debug, Deserialize)]
pub(crate) struct AskResponse {
    message: String,
    #[serde(default)]
    webscraping: Option<bool>,
    #[serde(default, rename = "ragRetrieval")]
    rag_retrieval: Option<bool>,
    #[serde(default)]
    sources: Option<Vec<String>>,
    #[serde(default, rename = "cachedResponse")]
    cached_response: Option<bool>,
}

impl From<AskResponse> for AskReply {
    fn from(response: AskResponse) -> Self {
        // Scraping wins if a response ever carries both flags.
        let operation = if response.webscraping.unwrap_or(false) {
            Operation::WebScraping
        } else if response.rag_retrieval.unwrap_or(false) {
            Operation::RagRetrieval
        } else {
            Operation::Direct
        };
        AskReply {
            message: response.message,
            operation,
            sources: response.sources.unwrap_or_default(),
            cached: response.cached_response.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    /// The backend records its own turns as `assistant`.
    #[serde(alias = "assistant")]
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub(crate) history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    pub(crate) chat_history: &'a [ChatTurn],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummarizeResponse {
    #[serde(default)]
    pub(crate) pdf_filename: Option<String>,
}

/// Error body the backend attaches to non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) detail: Option<String>,
}

#[derive(Debug)]
pub enum EngineEvent {
    AskCompleted {
        query_id: QueryId,
        result: Result<AskReply, BackendError>,
    },
    SettleElapsed {
        query_id: QueryId,
    },
    HistoryLoaded {
        request_id: RequestId,
        result: Result<Vec<ChatTurn>, BackendError>,
    },
    ExportCompleted {
        result: Result<ExportReceipt, ExportError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
    /// Server-reported `detail`, when the error body carried one.
    pub detail: Option<String>,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    MalformedResponse,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
