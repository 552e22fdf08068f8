//! Assistant engine: backend IO, settle timers and the export pipeline.
mod backend;
mod engine;
mod export;
mod persist;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend, DEFAULT_BASE_URL};
pub use engine::{EngineConfig, EngineError, EngineEvents, EngineHandle};
pub use export::{
    run_export, Delivery, DirectoryDelivery, ExportError, ExportOptions, ExportReceipt,
    ExportStage, DEFAULT_EXPORT_FILENAME,
};
pub use persist::PersistError;
pub use types::{
    AskReply, BackendError, ChatRole, ChatTurn, EngineEvent, FailureKind, Operation, QueryId,
    RequestId,
};
