//! Error types for photocopier operations.

use crate::error::{BureauError, ErrorSeverity};
use crate::items::Item;

use super::operation::OperationKind;
use super::state::ApplianceState;

/// Guard and invariant failures raised by photocopier transitions.
///
/// Guard failures leave the device untouched; only
/// [`PhotocopierError::InvariantViolation`] is reported after a mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhotocopierError {
    #[error("device is busy with a production job")]
    Busy,

    #[error("{operation} is not allowed while {state}")]
    InvalidState {
        operation: OperationKind,
        state: ApplianceState,
    },

    #[error("tray is empty")]
    EmptyTray,

    #[error("tray is closed")]
    TrayClosed,

    #[error("tray is full ({capacity} pages)")]
    TrayFull { capacity: u32 },

    #[error("item is not blank paper")]
    NotPrintablePaper,

    #[error("scanner lid is closed")]
    ScannerClosed,

    #[error("scanner holds no document")]
    NoDocument,

    #[error("scanner already holds a document")]
    DocumentAlreadyHeld,

    #[error("item is not a paper document")]
    NotADocument,

    #[error("no ink cartridge installed")]
    NoCartridge,

    #[error("insufficient ink: {available} available, {required} required")]
    InsufficientInk { available: u32, required: u32 },

    #[error("an ink cartridge is already installed")]
    CartridgeAlreadyInstalled,

    #[error("item is not an ink cartridge")]
    NotACartridge,

    #[error("no production job in progress")]
    NotProducing,

    #[error("invariant violated: {0}")]
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    InvariantViolation(&'static str),
}

impl BureauError for PhotocopierError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Busy => ErrorSeverity::Recoverable,
            Self::InvariantViolation(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Busy => "busy",
            Self::InvalidState { .. } => "invalid_state",
            Self::EmptyTray => "empty_tray",
            Self::TrayClosed => "tray_closed",
            Self::TrayFull { .. } => "tray_full",
            Self::NotPrintablePaper => "not_printable_paper",
            Self::ScannerClosed => "scanner_closed",
            Self::NoDocument => "no_document",
            Self::DocumentAlreadyHeld => "document_already_held",
            Self::NotADocument => "not_a_document",
            Self::NoCartridge => "no_cartridge",
            Self::InsufficientInk { .. } => "insufficient_ink",
            Self::CartridgeAlreadyInstalled => "cartridge_already_installed",
            Self::NotACartridge => "not_a_cartridge",
            Self::NotProducing => "not_producing",
            Self::InvariantViolation(_) => "invariant_violation",
        }
    }
}

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TransitionPhase {
    PreValidate,
    Apply,
    PostValidate,
}

/// Failure of [`ApplianceController::execute`](super::ApplianceController::execute).
///
/// When an operation carried an item (a sheet, a document, a cartridge) and was
/// rejected before it took ownership, the item is handed back in `returned`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{operation} failed during {phase}: {error}")]
pub struct ExecuteError {
    pub operation: OperationKind,
    pub phase: TransitionPhase,
    pub error: PhotocopierError,
    pub returned: Option<Item>,
}

impl ExecuteError {
    /// True when a guard rejected the request and nothing changed.
    pub fn is_rejection(&self) -> bool {
        self.phase == TransitionPhase::PreValidate
    }

    /// Takes back the item that accompanied a rejected operation.
    pub fn into_returned(self) -> Option<Item> {
        self.returned
    }
}

impl BureauError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        self.error.severity()
    }

    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
