use crate::{HistoryEntry, MessageKind, Sender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub text: String,
    pub sender: Sender,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input: String,
    pub messages: Vec<MessageView>,
    pub busy: bool,
    pub web_scraping: bool,
    pub rag_retrieval: bool,
    /// Typing indicator: busy with no placeholder on screen.
    pub show_typing: bool,
    pub send_enabled: bool,
    pub history_open: bool,
    pub history_loading: bool,
    pub history: Vec<HistoryEntry>,
    pub exporting: bool,
    pub export_enabled: bool,
    pub notice: Option<String>,
    pub dirty: bool,
}
