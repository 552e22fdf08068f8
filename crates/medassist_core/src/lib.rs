//! Assistant core: pure conversation state machine and view-model helpers.
mod effect;
mod history;
mod msg;
mod state;
mod transcript;
mod update;
mod view_model;

pub use effect::Effect;
pub use history::{HistoryEntry, HistoryView, Role};
pub use msg::{Msg, OperationKind};
pub use state::{
    AppState, ExportState, QueryId, QueryPhase, RequestId, SessionConfig, DEFAULT_SETTLE_DELAY,
};
pub use transcript::{
    Message, MessageKind, Sender, Transcript, FAILURE_NOTICE, RAG_PLACEHOLDER_TEXT,
    WEB_SCRAPING_PLACEHOLDER_TEXT,
};
pub use update::update;
pub use view_model::{AppViewModel, MessageView};
