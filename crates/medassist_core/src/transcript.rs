/// Shown while the backend reports that web scraping has started.
pub const WEB_SCRAPING_PLACEHOLDER_TEXT: &str = "Web scraping in progress...";
/// Shown while the backend reports a knowledge-base retrieval.
pub const RAG_PLACEHOLDER_TEXT: &str = "Retrieving information from knowledge base...";
/// Bot reply used for every failed query; the raw error never reaches the transcript.
pub const FAILURE_NOTICE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MessageKind {
    #[default]
    Normal,
    WebScrapingPlaceholder,
    RagPlaceholder,
}

impl MessageKind {
    pub fn is_placeholder(self) -> bool {
        !matches!(self, MessageKind::Normal)
    }

    fn placeholder_text(self) -> Option<&'static str> {
        match self {
            MessageKind::Normal => None,
            MessageKind::WebScrapingPlaceholder => Some(WEB_SCRAPING_PLACEHOLDER_TEXT),
            MessageKind::RagPlaceholder => Some(RAG_PLACEHOLDER_TEXT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub sender: Sender,
    pub kind: MessageKind,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            kind: MessageKind::Normal,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            kind: MessageKind::Normal,
        }
    }
}

/// Ordered log of exchanged messages. Insertion order is the only ordering.
///
/// At most one placeholder lives in the log at a time, and it only ever
/// leaves through [`Transcript::resolve`], which swaps it for the final bot
/// message in a single mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Show an in-progress placeholder. Any placeholder already present is replaced.
    pub fn show_placeholder(&mut self, kind: MessageKind) {
        let Some(text) = kind.placeholder_text() else {
            return;
        };
        self.drop_placeholders();
        self.messages.push(Message {
            text: text.to_string(),
            sender: Sender::Bot,
            kind,
        });
    }

    /// Remove every placeholder and append the final bot message in one update.
    pub fn resolve(&mut self, answer: impl Into<String>) {
        self.drop_placeholders();
        self.messages.push(Message::bot(answer));
    }

    pub fn placeholder(&self) -> Option<MessageKind> {
        self.messages
            .iter()
            .map(|message| message.kind)
            .find(|kind| kind.is_placeholder())
    }

    pub fn placeholder_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|message| message.kind.is_placeholder())
            .count()
    }

    fn drop_placeholders(&mut self) {
        self.messages.retain(|message| !message.kind.is_placeholder());
    }
}
