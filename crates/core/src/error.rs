use crate::model::EntityId;
use thiserror::Error;

/// Hard failures of an engine task.
///
/// Unresolved names and failed overload matches are not errors; they surface
/// as `None`. Only broken invariants of the producing layer end up here.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: u32, end: u32 },
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("unknown or stale scope handle: {0:?}")]
    UnknownScope(EntityId),
    #[error("engine worker has stopped")]
    WorkerStopped,
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
