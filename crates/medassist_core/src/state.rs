use std::path::PathBuf;
use std::time::Duration;

use crate::history::HistoryView;
use crate::transcript::{MessageKind, Transcript};
use crate::view_model::{AppViewModel, MessageView};

pub type QueryId = u64;
pub type RequestId = u64;

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Wait applied after a placeholder is shown, standing in for a completion event.
    pub settle_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }
}

/// Lifecycle of the single outstanding query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryPhase {
    #[default]
    Idle,
    Awaiting {
        query_id: QueryId,
    },
    Settling {
        query_id: QueryId,
        kind: MessageKind,
        answer: String,
    },
}

impl QueryPhase {
    pub fn query_id(&self) -> Option<QueryId> {
        match self {
            QueryPhase::Idle => None,
            QueryPhase::Awaiting { query_id } | QueryPhase::Settling { query_id, .. } => {
                Some(*query_id)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportState {
    pub in_flight: bool,
    pub notice: Option<String>,
    pub last_saved: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: SessionConfig,
    input: String,
    transcript: Transcript,
    phase: QueryPhase,
    next_query_id: QueryId,
    history: HistoryView,
    next_request_id: RequestId,
    export: ExportState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        let busy = self.is_busy();
        let placeholder = self.transcript.placeholder();
        AppViewModel {
            input: self.input.clone(),
            messages: self
                .transcript
                .messages()
                .iter()
                .map(|message| MessageView {
                    text: message.text.clone(),
                    sender: message.sender,
                    kind: message.kind,
                })
                .collect(),
            busy,
            web_scraping: placeholder == Some(MessageKind::WebScrapingPlaceholder),
            rag_retrieval: placeholder == Some(MessageKind::RagPlaceholder),
            show_typing: busy && placeholder.is_none(),
            send_enabled: !busy && !self.input.trim().is_empty(),
            history_open: self.history.is_open(),
            history_loading: self.history.is_loading(),
            history: self.history.entries().to_vec(),
            exporting: self.export.in_flight,
            export_enabled: self.history.is_open()
                && !self.export.in_flight
                && !self.history.entries().is_empty(),
            notice: self.export.notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn phase(&self) -> &QueryPhase {
        &self.phase
    }

    pub fn history(&self) -> &HistoryView {
        &self.history
    }

    pub fn export(&self) -> &ExportState {
        &self.export
    }

    pub fn is_busy(&self) -> bool {
        self.phase != QueryPhase::Idle
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, text: String) {
        if self.input != text {
            self.input = text;
            self.mark_dirty();
        }
    }

    /// Appends the user message, clears the input and marks the dispatcher busy.
    pub(crate) fn begin_query(&mut self) -> (QueryId, String) {
        let text = std::mem::take(&mut self.input);
        self.next_query_id += 1;
        let query_id = self.next_query_id;
        self.transcript.push_user(text.clone());
        self.phase = QueryPhase::Awaiting { query_id };
        self.mark_dirty();
        (query_id, text)
    }

    pub(crate) fn begin_settle(&mut self, query_id: QueryId, kind: MessageKind, answer: String) {
        self.transcript.show_placeholder(kind);
        self.phase = QueryPhase::Settling {
            query_id,
            kind,
            answer,
        };
        self.mark_dirty();
    }

    /// Terminal step of every query: reveal the text and return to idle.
    pub(crate) fn finish_query(&mut self, text: String) {
        self.transcript.resolve(text);
        self.phase = QueryPhase::Idle;
        self.mark_dirty();
    }

    pub(crate) fn history_mut(&mut self) -> &mut HistoryView {
        &mut self.history
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.next_request_id += 1;
        self.next_request_id
    }

    pub(crate) fn export_mut(&mut self) -> &mut ExportState {
        &mut self.export
    }
}
