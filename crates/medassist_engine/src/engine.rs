use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use medassist_logging::{session_debug, session_info};

use crate::backend::{Backend, BackendSettings, ReqwestBackend};
use crate::export::{run_export, Delivery, DirectoryDelivery, ExportOptions};
use crate::{BackendError, ChatTurn, EngineEvent, QueryId, RequestId};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub backend: BackendSettings,
    pub download_dir: PathBuf,
    pub export: ExportOptions,
}

impl EngineConfig {
    pub fn new(backend: BackendSettings, download_dir: PathBuf) -> Self {
        Self {
            backend,
            download_dir,
            export: ExportOptions::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("could not start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("could not build http client: {0}")]
    Backend(#[from] BackendError),
}

enum EngineCommand {
    Ask { query_id: QueryId, text: String },
    Settle { query_id: QueryId, delay: Duration },
    LoadHistory { request_id: RequestId },
    Export { history: Vec<ChatTurn> },
}

/// Command side of the engine; cheap to clone.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Event side of the engine. Every command produces exactly one event.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineEvents {
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

struct Workers {
    backend: Arc<dyn Backend>,
    delivery: Arc<dyn Delivery>,
    export: ExportOptions,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<(Self, EngineEvents), EngineError> {
        let backend = Arc::new(ReqwestBackend::new(config.backend)?);
        let delivery = Arc::new(DirectoryDelivery::new(config.download_dir));
        Self::with_parts(backend, delivery, config.export)
    }

    /// Runs the engine over caller-provided backend and delivery.
    pub fn with_parts(
        backend: Arc<dyn Backend>,
        delivery: Arc<dyn Delivery>,
        export: ExportOptions,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let workers = Arc::new(Workers {
            backend,
            delivery,
            export,
        });

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let workers = workers.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = handle_command(&workers, command).await;
                    let _ = event_tx.send(event);
                });
            }
            session_info!("engine command channel closed");
        });

        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn ask(&self, query_id: QueryId, text: impl Into<String>) {
        self.send(EngineCommand::Ask {
            query_id,
            text: text.into(),
        });
    }

    pub fn settle(&self, query_id: QueryId, delay: Duration) {
        self.send(EngineCommand::Settle { query_id, delay });
    }

    pub fn load_history(&self, request_id: RequestId) {
        self.send(EngineCommand::LoadHistory { request_id });
    }

    pub fn export(&self, history: Vec<ChatTurn>) {
        self.send(EngineCommand::Export { history });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(workers: &Workers, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Ask { query_id, text } => {
            let result = workers.backend.ask(&text).await;
            session_debug!("ask {} finished ok={}", query_id, result.is_ok());
            EngineEvent::AskCompleted { query_id, result }
        }
        EngineCommand::Settle { query_id, delay } => {
            // Stands in for a completion signal the backend does not send.
            tokio::time::sleep(delay).await;
            EngineEvent::SettleElapsed { query_id }
        }
        EngineCommand::LoadHistory { request_id } => {
            let result = workers.backend.load_history().await;
            EngineEvent::HistoryLoaded { request_id, result }
        }
        EngineCommand::Export { history } => {
            let result = run_export(
                workers.backend.as_ref(),
                workers.delivery.as_ref(),
                &workers.export,
                &history,
            )
            .await;
            EngineEvent::ExportCompleted { result }
        }
    }
}
