use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use log::LevelFilter;
use medassist_core::{update, AppState, Msg};
use medassist_engine::{BackendSettings, EngineConfig, EngineHandle};
use medassist_logging::{session_debug, session_info};

use super::config::{load_config, DEFAULT_CONFIG_FILE};
use super::effects::{spawn_event_loop, EffectRunner};
use super::ui::commands::{parse_line, Command, HELP};
use super::ui::render::TerminalRenderer;

/// Everything the UI loop reacts to, from the keyboard or the engine.
pub enum AppEvent {
    Msg(Msg),
    Help,
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let config = load_config(&config_path)?;
    medassist_logging::initialize(&config.log_destination(), LevelFilter::Info);
    session_info!(
        "Starting with backend {} settle_delay_ms={}",
        config.base_url,
        config.settle_delay_ms
    );

    let backend = BackendSettings::new(&config.base_url)
        .with_context(|| format!("invalid base_url {:?}", config.base_url))?;
    let (engine, events) =
        EngineHandle::new(EngineConfig::new(backend, config.download_dir.clone()))
            .context("failed to start engine")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    spawn_event_loop(events, event_tx.clone());
    spawn_input_reader(event_tx);

    let runner = EffectRunner::new(engine);
    let mut state = AppState::with_config(config.session_config());
    let mut renderer = TerminalRenderer::new();
    let stdout = io::stdout();

    writeln!(stdout.lock(), "Medical Assistant\n{HELP}")?;

    // The UI loop is the only writer of the session state.
    for event in event_rx {
        match event {
            AppEvent::Quit => break,
            AppEvent::Help => writeln!(stdout.lock(), "{HELP}")?,
            AppEvent::Msg(msg) => {
                session_debug!("dispatch {:?}", msg);
                let (next, effects) = update(state, msg);
                state = next;
                runner.enqueue(effects);
                if state.consume_dirty() {
                    renderer.render(&state.view(), &mut stdout.lock())?;
                }
            }
        }
    }

    session_info!("Shutting down");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let events = match parse_line(&line) {
                Command::Send(msgs) => msgs.into_iter().map(AppEvent::Msg).collect(),
                Command::Help => vec![AppEvent::Help],
                Command::Quit => vec![AppEvent::Quit],
            };
            for event in events {
                if event_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = event_tx.send(AppEvent::Quit);
    });
}
