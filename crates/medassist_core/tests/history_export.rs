use std::path::PathBuf;
use std::sync::Once;

use medassist_core::{update, AppState, Effect, HistoryEntry, Msg, RequestId, Role};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(medassist_logging::initialize_for_tests);
}

fn sample_history() -> Vec<HistoryEntry> {
    vec![
        HistoryEntry::new(Role::User, "hi"),
        HistoryEntry::new(Role::Bot, "hello"),
    ]
}

fn open_history(state: AppState) -> (AppState, RequestId) {
    let (state, effects) = update(state, Msg::HistoryViewOpened);
    match effects.as_slice() {
        [Effect::LoadHistory { request_id }] => (state, *request_id),
        other => panic!("expected a single LoadHistory effect, got {other:?}"),
    }
}

fn loaded_view() -> AppState {
    let (state, request_id) = open_history(AppState::new());
    let (state, _) = update(
        state,
        Msg::HistoryLoaded {
            request_id,
            entries: sample_history(),
        },
    );
    state
}

#[test]
fn opening_the_view_loads_history_in_order() {
    init_logging();
    let (state, request_id) = open_history(AppState::new());
    assert!(state.view().history_loading);

    let (state, effects) = update(
        state,
        Msg::HistoryLoaded {
            request_id,
            entries: sample_history(),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.history_open);
    assert!(!view.history_loading);
    assert_eq!(view.history, sample_history());
    // The server log never leaks into the live transcript.
    assert!(view.messages.is_empty());
}

#[test]
fn reopening_an_open_view_does_not_poll() {
    init_logging();
    let (state, _) = open_history(AppState::new());
    let (_state, effects) = update(state, Msg::HistoryViewOpened);
    assert!(effects.is_empty());
}

#[test]
fn refresh_replaces_instead_of_merging() {
    init_logging();
    let state = loaded_view();
    let (state, effects) = update(state, Msg::HistoryRefreshRequested);
    let request_id = match effects.as_slice() {
        [Effect::LoadHistory { request_id }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };

    let replacement = vec![HistoryEntry::new(Role::User, "only")];
    let (state, _) = update(
        state,
        Msg::HistoryLoaded {
            request_id,
            entries: replacement.clone(),
        },
    );
    assert_eq!(state.history().entries(), replacement.as_slice());
}

#[test]
fn load_failure_keeps_previous_snapshot() {
    init_logging();
    let state = loaded_view();
    let (state, effects) = update(state, Msg::HistoryRefreshRequested);
    let request_id = match effects.as_slice() {
        [Effect::LoadHistory { request_id }] => *request_id,
        other => panic!("unexpected effects {other:?}"),
    };

    let (state, _) = update(
        state,
        Msg::HistoryLoadFailed {
            request_id,
            reason: "network error".to_string(),
        },
    );
    assert_eq!(state.history().entries(), sample_history().as_slice());
    assert_eq!(state.history().last_error(), Some("network error"));
    assert!(state.view().notice.is_none());
}

#[test]
fn closing_discards_snapshot_and_ignores_late_results() {
    init_logging();
    let (state, request_id) = open_history(AppState::new());
    let (state, _) = update(state, Msg::HistoryViewClosed);
    let (state, _) = update(
        state,
        Msg::HistoryLoaded {
            request_id,
            entries: sample_history(),
        },
    );
    assert!(!state.view().history_open);
    assert!(state.history().entries().is_empty());

    let state = loaded_view();
    let (state, _) = update(state, Msg::HistoryViewClosed);
    assert!(state.history().entries().is_empty());
    let (_state, effects) = update(state, Msg::HistoryRefreshRequested);
    assert!(effects.is_empty());
}

#[test]
fn export_is_disabled_for_empty_history() {
    init_logging();
    let (state, request_id) = open_history(AppState::new());
    let (state, _) = update(
        state,
        Msg::HistoryLoaded {
            request_id,
            entries: Vec::new(),
        },
    );
    assert!(!state.view().export_enabled);

    let (state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());
    assert!(!state.export().in_flight);
}

#[test]
fn export_runs_once_and_clears_in_flight_on_success() {
    init_logging();
    let state = loaded_view();
    assert!(!state.export().in_flight);
    assert!(state.view().export_enabled);

    let (state, effects) = update(state, Msg::ExportClicked);
    assert_eq!(
        effects,
        vec![Effect::Export {
            history: sample_history(),
        }]
    );
    assert!(state.export().in_flight);
    assert!(state.view().exporting);
    assert!(!state.view().export_enabled);

    let (state, effects) = update(state, Msg::ExportClicked);
    assert!(effects.is_empty());

    let path = PathBuf::from("downloads").join("chat_summary.pdf");
    let (state, _) = update(state, Msg::ExportSucceeded { path: path.clone() });
    assert!(!state.export().in_flight);
    assert_eq!(state.export().last_saved.as_ref(), Some(&path));
    assert!(state
        .view()
        .notice
        .unwrap()
        .starts_with("Summary saved to"));
}

#[test]
fn export_failure_surfaces_reason_and_reenables() {
    init_logging();
    let state = loaded_view();
    let (state, _) = update(state, Msg::ExportClicked);
    let (state, _) = update(
        state,
        Msg::ExportFailed {
            reason: "model unavailable".to_string(),
        },
    );

    let view = state.view();
    assert!(!view.exporting);
    assert!(view.export_enabled);
    assert_eq!(
        view.notice.as_deref(),
        Some("Export failed: model unavailable. Please try again.")
    );

    let (mut state, _) = update(state, Msg::NoticeDismissed);
    assert!(state.view().notice.is_none());
    assert!(state.consume_dirty());
}
