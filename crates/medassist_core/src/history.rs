use crate::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One turn of the server-side conversation log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Snapshot of the durable conversation log, alive while the history view is open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryView {
    open: bool,
    entries: Vec<HistoryEntry>,
    pending: Option<RequestId>,
    last_error: Option<String>,
}

impl HistoryView {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns false when the view was already open.
    pub(crate) fn open(&mut self) -> bool {
        if self.open {
            return false;
        }
        self.open = true;
        true
    }

    /// Closing discards the snapshot; nothing is merged into the transcript.
    pub(crate) fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        *self = Self::default();
        true
    }

    pub(crate) fn begin_load(&mut self, request_id: RequestId) {
        self.pending = Some(request_id);
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.open && self.pending == Some(request_id)
    }

    pub(crate) fn replace(&mut self, entries: Vec<HistoryEntry>) {
        self.entries = entries;
        self.pending = None;
        self.last_error = None;
    }

    pub(crate) fn record_failure(&mut self, reason: String) {
        self.pending = None;
        self.last_error = Some(reason);
    }
}
