use crate::transcript::FAILURE_NOTICE;
use crate::{AppState, Effect, MessageKind, Msg, OperationKind, QueryPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::QuerySubmitted => {
            // One query in flight at a time; blank input is silently ignored.
            if state.is_busy() || state.input().trim().is_empty() {
                return (state, Vec::new());
            }
            let (query_id, text) = state.begin_query();
            vec![Effect::Ask { query_id, text }]
        }
        Msg::AskAnswered {
            query_id,
            answer,
            operation,
        } => {
            if state.phase() != &(QueryPhase::Awaiting { query_id }) {
                return (state, Vec::new());
            }
            match placeholder_for(operation) {
                Some(kind) => {
                    state.begin_settle(query_id, kind, answer);
                    vec![Effect::StartSettle {
                        query_id,
                        delay: state.config().settle_delay,
                    }]
                }
                None => {
                    state.finish_query(answer);
                    Vec::new()
                }
            }
        }
        Msg::SettleElapsed { query_id } => {
            let answer = match state.phase() {
                QueryPhase::Settling {
                    query_id: settling,
                    answer,
                    ..
                } if *settling == query_id => Some(answer.clone()),
                _ => None,
            };
            if let Some(answer) = answer {
                state.finish_query(answer);
            }
            Vec::new()
        }
        Msg::AskFailed { query_id, .. } => {
            if state.phase().query_id() == Some(query_id) {
                state.finish_query(FAILURE_NOTICE.to_string());
            }
            Vec::new()
        }
        Msg::HistoryViewOpened => {
            if state.history_mut().open() {
                state.mark_dirty();
                vec![request_history(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::HistoryRefreshRequested => {
            if state.history().is_open() {
                state.mark_dirty();
                vec![request_history(&mut state)]
            } else {
                Vec::new()
            }
        }
        Msg::HistoryViewClosed => {
            if state.history_mut().close() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::HistoryLoaded {
            request_id,
            entries,
        } => {
            if state.history().is_current(request_id) {
                state.history_mut().replace(entries);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::HistoryLoadFailed { request_id, reason } => {
            // Keep whatever was loaded before; the failure is only recorded.
            if state.history().is_current(request_id) {
                state.history_mut().record_failure(reason);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ExportClicked => {
            let history = state.history().entries().to_vec();
            if !state.history().is_open() || history.is_empty() || state.export().in_flight {
                return (state, Vec::new());
            }
            let export = state.export_mut();
            export.in_flight = true;
            export.notice = None;
            state.mark_dirty();
            vec![Effect::Export { history }]
        }
        Msg::ExportSucceeded { path } => {
            let export = state.export_mut();
            export.in_flight = false;
            export.notice = Some(format!("Summary saved to {}", path.display()));
            export.last_saved = Some(path);
            state.mark_dirty();
            Vec::new()
        }
        Msg::ExportFailed { reason } => {
            let export = state.export_mut();
            export.in_flight = false;
            export.notice = Some(format!("Export failed: {reason}. Please try again."));
            state.mark_dirty();
            Vec::new()
        }
        Msg::NoticeDismissed => {
            if state.export_mut().notice.take().is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn placeholder_for(operation: OperationKind) -> Option<MessageKind> {
    match operation {
        OperationKind::WebScraping => Some(MessageKind::WebScrapingPlaceholder),
        OperationKind::RagRetrieval => Some(MessageKind::RagPlaceholder),
        OperationKind::Direct => None,
    }
}

fn request_history(state: &mut AppState) -> Effect {
    let request_id = state.next_request_id();
    state.history_mut().begin_load(request_id);
    Effect::LoadHistory { request_id }
}
