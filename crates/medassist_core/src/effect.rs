use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Ask {
        query_id: crate::QueryId,
        text: String,
    },
    StartSettle {
        query_id: crate::QueryId,
        delay: Duration,
    },
    LoadHistory {
        request_id: crate::RequestId,
    },
    Export {
        history: Vec<crate::HistoryEntry>,
    },
}
