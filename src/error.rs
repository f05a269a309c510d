//! Error types for the voice session
//!
//! Every variant here is caught at the boundary where it occurs and turned
//! into a status message. None of them stop the session loop.

use thiserror::Error;

/// Failures of the listening engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Speech recognition is not present in this runtime
    #[error("speech recognition not available")]
    Unavailable,

    /// The engine refused to start (e.g. it is already running)
    #[error("recognition failed to start: {0}")]
    StartRejected(String),
}

/// Failures of a command dispatch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Command service answered with a non-2xx status
    #[error("command service returned HTTP {0}")]
    Status(u16),

    /// Command service could not be reached
    #[error("command service unreachable: {0}")]
    Transport(String),

    /// Response body was not `{"response": "..."}`
    #[error("invalid command service response: {0}")]
    Decode(String),

    /// No answer within the configured bound
    #[error("command service timed out")]
    Timeout,
}

/// Errors surfaced to library callers
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The controller loop has exited
    #[error("voice session loop is not running")]
    LoopClosed,
}
