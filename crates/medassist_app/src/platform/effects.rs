use std::sync::mpsc;
use std::thread;

use medassist_core::{Effect, HistoryEntry, Msg, OperationKind, Role};
use medassist_engine::{ChatRole, ChatTurn, EngineEvent, EngineEvents, EngineHandle, Operation};
use medassist_logging::{session_debug, session_info, session_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Ask { query_id, text } => {
                    session_info!("Ask query_id={} query_len={}", query_id, text.len());
                    self.engine.ask(query_id, text);
                }
                Effect::StartSettle { query_id, delay } => {
                    self.engine.settle(query_id, delay);
                }
                Effect::LoadHistory { request_id } => {
                    self.engine.load_history(request_id);
                }
                Effect::Export { history } => {
                    session_info!("Export entries={}", history.len());
                    self.engine
                        .export(history.into_iter().map(to_chat_turn).collect());
                }
            }
        }
    }
}

/// Forwards engine events to the UI loop until either side hangs up.
pub fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if msg_tx.send(AppEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
    });
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::AskCompleted { query_id, result } => match result {
            Ok(reply) => {
                if reply.cached {
                    session_info!("Ask {} answered from the backend cache", query_id);
                }
                if !reply.sources.is_empty() {
                    session_debug!("Ask {} sources: {}", query_id, reply.sources.join(", "));
                }
                Msg::AskAnswered {
                    query_id,
                    answer: reply.message,
                    operation: map_operation(reply.operation),
                }
            }
            Err(err) => {
                session_warn!("Ask {} failed: {}", query_id, err);
                Msg::AskFailed {
                    query_id,
                    reason: err.to_string(),
                }
            }
        },
        EngineEvent::SettleElapsed { query_id } => Msg::SettleElapsed { query_id },
        EngineEvent::HistoryLoaded { request_id, result } => match result {
            Ok(turns) => Msg::HistoryLoaded {
                request_id,
                entries: turns.into_iter().map(to_history_entry).collect(),
            },
            Err(err) => {
                session_warn!("Loading chat history failed: {}", err);
                Msg::HistoryLoadFailed {
                    request_id,
                    reason: err.to_string(),
                }
            }
        },
        EngineEvent::ExportCompleted { result } => match result {
            Ok(receipt) => Msg::ExportSucceeded { path: receipt.path },
            Err(err) => Msg::ExportFailed {
                reason: err.to_string(),
            },
        },
    }
}

fn map_operation(operation: Operation) -> OperationKind {
    match operation {
        Operation::WebScraping => OperationKind::WebScraping,
        Operation::RagRetrieval => OperationKind::RagRetrieval,
        Operation::Direct => OperationKind::Direct,
    }
}

fn to_history_entry(turn: ChatTurn) -> HistoryEntry {
    let role = match turn.role {
        ChatRole::User => Role::User,
        ChatRole::Bot => Role::Bot,
    };
    HistoryEntry::new(role, turn.content)
}

fn to_chat_turn(entry: HistoryEntry) -> ChatTurn {
    let role = match entry.role {
        Role::User => ChatRole::User,
        Role::Bot => ChatRole::Bot,
    };
    ChatTurn::new(role, entry.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medassist_engine::{AskReply, ExportError};

    #[test]
    fn scraping_reply_maps_to_answer() {
        let msg = map_event(EngineEvent::AskCompleted {
            query_id: 4,
            result: Ok(AskReply {
                message: "Here is a plan...".to_string(),
                operation: Operation::WebScraping,
                sources: Vec::new(),
                cached: false,
            }),
        });
        assert_eq!(
            msg,
            Msg::AskAnswered {
                query_id: 4,
                answer: "Here is a plan...".to_string(),
                operation: OperationKind::WebScraping,
            }
        );
    }

    #[test]
    fn cached_reply_with_sources_still_answers() {
        let msg = map_event(EngineEvent::AskCompleted {
            query_id: 5,
            result: Ok(AskReply {
                message: "Drink water.".to_string(),
                operation: Operation::RagRetrieval,
                sources: vec!["hydration.pdf".to_string(), "nhs.uk".to_string()],
                cached: true,
            }),
        });
        assert_eq!(
            msg,
            Msg::AskAnswered {
                query_id: 5,
                answer: "Drink water.".to_string(),
                operation: OperationKind::RagRetrieval,
            }
        );
    }

    #[test]
    fn history_roles_round_trip() {
        let entries = vec![
            HistoryEntry::new(Role::User, "hi"),
            HistoryEntry::new(Role::Bot, "hello"),
        ];
        let turns: Vec<_> = entries.iter().cloned().map(to_chat_turn).collect();
        let back: Vec<_> = turns.into_iter().map(to_history_entry).collect();
        assert_eq!(back, entries);
    }

    #[test]
    fn export_error_keeps_user_facing_text() {
        let msg = map_event(EngineEvent::ExportCompleted {
            result: Err(ExportError::EmptyArtifact),
        });
        assert_eq!(
            msg,
            Msg::ExportFailed {
                reason: "Generated PDF is empty".to_string(),
            }
        );
    }
}
