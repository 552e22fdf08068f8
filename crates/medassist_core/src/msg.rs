use std::path::PathBuf;

/// What the backend reported doing while it produced an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Web scraping was started for this query.
    WebScraping,
    /// The answer came from knowledge-base retrieval.
    RagRetrieval,
    /// Plain answer, nothing to announce.
    Direct,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the question input.
    InputChanged(String),
    /// User pressed send with the current input.
    QuerySubmitted,
    /// Backend answered an outstanding query.
    AskAnswered {
        query_id: crate::QueryId,
        answer: String,
        operation: OperationKind,
    },
    /// The ask request failed (transport, status or malformed body).
    AskFailed {
        query_id: crate::QueryId,
        reason: String,
    },
    /// The settle delay for a placeholder has run out.
    SettleElapsed { query_id: crate::QueryId },
    /// User opened the history view.
    HistoryViewOpened,
    /// User closed the history view.
    HistoryViewClosed,
    /// User asked to reload the history while the view is open.
    HistoryRefreshRequested,
    /// Engine delivered the server-side conversation log.
    HistoryLoaded {
        request_id: crate::RequestId,
        entries: Vec<crate::HistoryEntry>,
    },
    /// Engine failed to load the conversation log.
    HistoryLoadFailed {
        request_id: crate::RequestId,
        reason: String,
    },
    /// User clicked Export in the history view.
    ExportClicked,
    /// Export pipeline saved the summary document.
    ExportSucceeded { path: PathBuf },
    /// Export pipeline aborted at some stage.
    ExportFailed { reason: String },
    /// User acknowledged the export notice.
    NoticeDismissed,
}
