use thiserror::Error;

/// Errors surfaced by the reflex engine.
#[derive(Debug, Error)]
pub enum ReflexError {
    /// A cell was added under a name that is already registered.
    #[error("duplicate cell name: {0}")]
    DuplicateCell(String),

    /// A target cell name could not be resolved in the registry.
    #[error("cell not found: {0}")]
    CellNotFound(String),

    /// `run` was called with an empty queue and no start signal supplied.
    #[error("no start signal supplied and the activation queue is empty")]
    MissingStartSignal,

    /// The start signal handed to `run` did not carry priority 0.
    #[error("start signal must have priority 0, got {0}")]
    StartSignalPriority(u32),

    /// A cell invocation failed. The loop performs no isolation or
    /// retry between cells; the failure ends the run.
    #[error("cell '{cell}' failed during activation")]
    Cell {
        cell: String,
        #[source]
        source: anyhow::Error,
    },
}
