use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use medassist_logging::{session_debug, session_warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;

use crate::types::{
    AskResponse, ErrorBody, HistoryResponse, SummarizeRequest, SummarizeResponse,
};
use crate::{AskReply, BackendError, ChatTurn, FailureKind};

/// Origin the backend is served from when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: Url,
}

impl BackendSettings {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| BackendError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        Ok(Self { base_url })
    }
}

/// The answering service, consumed as an HTTP contract.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `GET /search?query=<text>`.
    async fn ask(&self, query: &str) -> Result<AskReply, BackendError>;

    /// `GET /chat-history`.
    async fn load_history(&self) -> Result<Vec<ChatTurn>, BackendError>;

    /// `POST /summarize-chat`; yields the generated file name, if the server sent one.
    async fn summarize(&self, history: &[ChatTurn]) -> Result<Option<String>, BackendError>;

    /// `GET /get-pdf/<reference>`; the raw document bytes.
    async fn fetch_document(&self, reference: &str) -> Result<Bytes, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        // No request timeouts: long scraping answers are expected to take a while.
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::new(FailureKind::InvalidUrl, "base url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn ask(&self, query: &str) -> Result<AskReply, BackendError> {
        let mut url = self.endpoint(&["search"])?;
        url.query_pairs_mut().append_pair("query", query);
        session_debug!("ask query_len={}", query.len());

        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = success_body(response).await?;
        let parsed: AskResponse = parse_json(&body)?;
        Ok(parsed.into())
    }

    async fn load_history(&self) -> Result<Vec<ChatTurn>, BackendError> {
        let url = self.endpoint(&["chat-history"])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let body = success_body(response).await?;
        let parsed: HistoryResponse = parse_json(&body)?;
        Ok(parsed.history)
    }

    async fn summarize(&self, history: &[ChatTurn]) -> Result<Option<String>, BackendError> {
        let url = self.endpoint(&["summarize-chat"])?;
        let payload = serde_json::to_vec(&SummarizeRequest {
            chat_history: history,
        })
        .map_err(|err| BackendError::new(FailureKind::MalformedResponse, err.to_string()))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = success_body(response).await?;
        let parsed: SummarizeResponse = parse_json(&body)?;
        Ok(parsed.pdf_filename)
    }

    async fn fetch_document(&self, reference: &str) -> Result<Bytes, BackendError> {
        let url = self.endpoint(&["get-pdf", reference])?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = ensure_success(response).await?;

        let mut buffer = BytesMut::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            buffer.extend_from_slice(&chunk);
        }
        session_debug!("fetched document {} ({} bytes)", reference, buffer.len());
        Ok(buffer.freeze())
    }
}

/// Turns a non-2xx response into an error carrying the server `detail`, if any.
async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .and_then(|body| body.detail);
    session_warn!("backend answered {} detail={:?}", status, detail);
    Err(BackendError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
        .with_detail(detail))
}

async fn success_body(response: Response) -> Result<Bytes, BackendError> {
    ensure_success(response)
        .await?
        .bytes()
        .await
        .map_err(map_reqwest_error)
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body)
        .map_err(|err| BackendError::new(FailureKind::MalformedResponse, err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return BackendError::new(FailureKind::MalformedResponse, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
