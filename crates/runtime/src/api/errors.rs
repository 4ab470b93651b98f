//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, configuration and refused inputs
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use game_core::{ConfigError, ErrorSeverity, GameError, InputError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("invalid game configuration")]
    InvalidConfig(#[from] ConfigError),

    #[error("input refused: {0}")]
    InputRefused(#[from] InputError),

    #[error("input provider failed: {0}")]
    Provider(String),
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
            RuntimeError::InvalidConfig(_) => ErrorSeverity::Validation,
            RuntimeError::InputRefused(err) => err.severity(),
            RuntimeError::Provider(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            RuntimeError::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            RuntimeError::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            RuntimeError::InvalidConfig(err) => err.error_code(),
            RuntimeError::InputRefused(err) => err.error_code(),
            RuntimeError::Provider(_) => "RUNTIME_PROVIDER",
        }
    }
}
