//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and device operations so clients
//! can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use bureau_core::{
    BureauError, ErrorSeverity, ExecuteError, Item, OperationKind, OperationOutcome,
};

use super::DeviceId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("device worker command channel closed")]
    CommandChannelClosed,

    #[error("device worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("device worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("device {device} rejected operation")]
    Rejected {
        device: DeviceId,
        #[source]
        source: ExecuteError,
    },

    #[error("{operation} is driven by the device timer and cannot be requested")]
    TimerOwnedOperation { operation: OperationKind },

    #[error("{operation} produced unexpected outcome {outcome:?}")]
    UnexpectedOutcome {
        operation: OperationKind,
        outcome: OperationOutcome,
    },
}

impl RuntimeError {
    /// Underlying device error, when the worker refused the request.
    pub fn execute_error(&self) -> Option<&ExecuteError> {
        match self {
            RuntimeError::Rejected { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Takes back the item that accompanied a rejected operation.
    pub fn into_returned(self) -> Option<Item> {
        match self {
            RuntimeError::Rejected { source, .. } => source.into_returned(),
            _ => None,
        }
    }
}

impl BureauError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::Rejected { source, .. } => source.severity(),
            RuntimeError::TimerOwnedOperation { .. } => ErrorSeverity::Validation,
            RuntimeError::UnexpectedOutcome { .. } => ErrorSeverity::Internal,
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            RuntimeError::CommandChannelClosed => "command_channel_closed",
            RuntimeError::ReplyChannelClosed(_) => "reply_channel_closed",
            RuntimeError::WorkerJoin(_) => "worker_join",
            RuntimeError::Rejected { source, .. } => source.error_code(),
            RuntimeError::TimerOwnedOperation { .. } => "timer_owned_operation",
            RuntimeError::UnexpectedOutcome { .. } => "unexpected_outcome",
        }
    }
}
