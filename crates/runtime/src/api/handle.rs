//! Cloneable façade for issuing commands to a device worker.
//!
//! [`DeviceHandle`] hides channel plumbing and offers async helpers mirroring
//! the controller operations, plus topic subscriptions on the shared bus.
use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, oneshot};

use bureau_core::{
    ContextOption, InteractionOutcome, Item, Operation, OperationKind, OperationOutcome,
    StatusView,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Identifies one photocopier hosted by a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct DeviceId(pub u32);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "copier#{}", self.0)
    }
}

/// Client-facing handle to one device worker.
#[derive(Clone)]
pub struct DeviceHandle {
    id: DeviceId,
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl DeviceHandle {
    pub(crate) fn new(
        id: DeviceId,
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            id,
            command_tx,
            event_bus,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Execute any operation on the device.
    ///
    /// Production completion belongs to the worker's timer and is refused here.
    pub async fn execute(&self, operation: Operation) -> Result<OperationOutcome> {
        self.request(|reply| Command::Execute { operation, reply })
            .await?
    }

    pub async fn toggle_tray(&self) -> Result<()> {
        self.execute(Operation::ToggleTray).await.map(drop)
    }

    pub async fn toggle_scanner_lid(&self) -> Result<()> {
        self.execute(Operation::ToggleScannerLid).await.map(drop)
    }

    /// Start a print job. Output appears on [`Topic::Output`] once the
    /// production delay has elapsed.
    pub async fn print(&self) -> Result<()> {
        self.execute(Operation::Print).await.map(drop)
    }

    pub async fn scan(&self) -> Result<()> {
        self.execute(Operation::Scan).await.map(drop)
    }

    pub async fn clear_scanned_text(&self) -> Result<()> {
        self.execute(Operation::ClearScannedText).await.map(drop)
    }

    /// Toggle book/paper output and return the announcement text.
    pub async fn switch_printing_mode(&self) -> Result<String> {
        match self.execute(Operation::SwitchPrintingMode).await? {
            OperationOutcome::Announcement(text) => Ok(text),
            outcome => Err(RuntimeError::UnexpectedOutcome {
                operation: OperationKind::SwitchPrintingMode,
                outcome,
            }),
        }
    }

    pub async fn add_page_to_tray(&self, item: Item) -> Result<()> {
        self.execute(Operation::AddPageToTray(item)).await.map(drop)
    }

    pub async fn place_document(&self, item: Item) -> Result<()> {
        self.execute(Operation::PlaceDocument(item)).await.map(drop)
    }

    pub async fn insert_cartridge(&self, item: Item) -> Result<()> {
        self.execute(Operation::InsertCartridge(item)).await.map(drop)
    }

    pub async fn remove_cartridge(&self) -> Result<()> {
        self.execute(Operation::RemoveCartridge).await.map(drop)
    }

    /// Apply a hand (empty or holding `item`) to the device.
    pub async fn interact(&self, hand: Option<Item>) -> Result<InteractionOutcome> {
        self.request(|reply| Command::Interact { hand, reply })
            .await?
    }

    /// Run a context-menu entry. Returns the announcement, if any.
    pub async fn apply_context_option(&self, option: ContextOption) -> Result<Option<String>> {
        self.request(|reply| Command::ContextOption { option, reply })
            .await?
    }

    /// Context-menu entries currently offered by the device.
    pub async fn context_options(&self) -> Result<Vec<ContextOption>> {
        self.request(|reply| Command::QueryContextOptions { reply })
            .await
    }

    /// Read-only snapshot of the device.
    pub async fn status(&self) -> Result<StatusView> {
        self.request(|reply| Command::QueryStatus { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Device` - render requests, completions and rejections
    /// - `Topic::Output` - items dropped into the world and sound cues
    ///
    /// Events from every device on the runtime share these topics; filter by
    /// [`Event::device`] when only this one matters.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
