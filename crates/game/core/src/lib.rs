//! Deterministic appliance and chat logic shared across hosts.
//!
//! `bureau-core` defines the canonical rules for the office photocopier (tray,
//! scanner, ink and the production cycle) and the player chat bubble. All
//! photocopier mutation flows through [`photocopier::ApplianceController`];
//! time is supplied by the host through `advance`, so the crate never sleeps or
//! spawns tasks.
pub mod chat;
pub mod config;
pub mod error;
pub mod items;
pub mod photocopier;

pub use chat::{BubbleEvent, BubbleType, ChatBubble, ChatVisual, split_message};
pub use config::{BureauConfig, ChatBubbleConfig, PhotocopierConfig};
pub use error::{BureauError, ErrorSeverity};
pub use items::{Book, InkCartridge, Item, Paper};
pub use photocopier::{
    ApplianceController, ApplianceState, ChangeSet, CollectingSink, CompletedJob, ContextOption,
    ExecuteError, InteractionOutcome, ItemSink, JobKind, ListenerId, Operation, OperationKind,
    OperationOutcome, PhotocopierError, RenderListener, ScannerModel, SoundCue, StatusView,
    TransitionPhase, TrayModel,
};
