//! Combined printer/scanner appliance.
//!
//! The [`ApplianceController`] is the single authoritative owner of one
//! device. It routes every request through the transition pipeline in
//! [`operation`], keeps the production clock, and tells subscribed
//! [`RenderListener`]s whenever something observable changed.
//!
//! ```text
//!            toggle_tray                    toggle_scanner_lid
//!  TrayOpen <-----------> Idle <--------------------------> ScannerOpen
//!                          |  ^
//!            print / scan  |  |  delay elapsed (job committed)
//!                          v  |
//!                       Production
//! ```
mod error;
pub mod interaction;
mod listener;
mod operation;
mod sink;
mod state;

use core::time::Duration;

pub use error::{ExecuteError, PhotocopierError, TransitionPhase};
pub use interaction::{ContextOption, InteractionOutcome};
pub use listener::{ChangeSet, ListenerId, RenderListener, StatusView};
pub use operation::{CompletedJob, Operation, OperationKind, OperationOutcome};
pub use sink::{CollectingSink, ItemSink, SoundCue};
pub use state::{ApplianceState, JobKind, ScannerModel, TrayModel};

use crate::config::PhotocopierConfig;
use crate::items::Item;

use listener::RenderListeners;
use operation::{ApplyContext, DeviceTransition, drive_transition};
use state::{DeviceState, Phase};

/// Authoritative state machine for one photocopier.
///
/// Guard failures come back as [`ExecuteError`] values with the device left
/// untouched; callers that want silent no-op behaviour can check the `can_*`
/// predicates first or simply ignore the error.
#[derive(Debug)]
pub struct ApplianceController<S: ItemSink> {
    device: DeviceState,
    config: PhotocopierConfig,
    sink: S,
    listeners: RenderListeners,
}

impl<S: ItemSink> ApplianceController<S> {
    /// Creates an idle device with an empty tray, an empty scanner and no
    /// cartridge.
    pub fn new(config: PhotocopierConfig, sink: S) -> Self {
        Self {
            device: DeviceState::new(config.tray_capacity),
            config,
            sink,
            listeners: RenderListeners::default(),
        }
    }

    // ===== observation =====

    pub fn state(&self) -> ApplianceState {
        self.device.state()
    }

    pub fn tray(&self) -> &TrayModel {
        &self.device.tray
    }

    pub fn scanner(&self) -> &ScannerModel {
        &self.device.scanner
    }

    pub fn ink_level(&self) -> Option<u32> {
        self.device.ink_level()
    }

    pub fn has_cartridge(&self) -> bool {
        self.device.cartridge.is_some()
    }

    pub fn config(&self) -> &PhotocopierConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Time left on the current production job, if any.
    pub fn production_remaining(&self) -> Option<Duration> {
        match self.device.phase {
            Phase::Production(job) => Some(job.remaining),
            _ => None,
        }
    }

    /// Kind of the current production job, if any.
    pub fn production_job(&self) -> Option<JobKind> {
        match self.device.phase {
            Phase::Production(job) => Some(job.kind),
            _ => None,
        }
    }

    /// Snapshot for the display layer.
    pub fn status(&self) -> StatusView {
        let device = &self.device;
        StatusView {
            state: device.state(),
            tray_count: device.tray.page_count,
            tray_capacity: device.tray.capacity,
            tray_open: device.tray.is_open,
            scanner_open: device.scanner.is_open,
            document_loaded: device.scanner.has_document(),
            scanned_text: device.scanner.scanned_text.clone(),
            print_book: device.tray.print_book,
            ink_level: device.ink_level(),
        }
    }

    // ===== listeners =====

    pub fn subscribe(&mut self, listener: impl RenderListener + 'static) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ===== predicates =====

    /// Tray non-empty, device idle, and the cartridge holds enough ink.
    pub fn can_print(&self) -> bool {
        operation::Print
            .pre_validate(&self.device, &self.config)
            .is_ok()
    }

    /// Document on the scanner bed, device idle, and enough ink to scan.
    pub fn can_scan(&self) -> bool {
        operation::Scan
            .pre_validate(&self.device, &self.config)
            .is_ok()
    }

    pub fn can_add_page_to_tray(&self, item: &Item) -> bool {
        operation::AddPageToTray::check(item, &self.device).is_ok()
    }

    pub fn can_place_document(&self, item: &Item) -> bool {
        operation::PlaceDocument::check(item, &self.device).is_ok()
    }

    // ===== operations =====

    /// Executes any operation and notifies listeners if anything observable
    /// changed.
    pub fn execute(&mut self, operation: Operation) -> Result<OperationOutcome, ExecuteError> {
        match operation {
            Operation::ToggleTray => self.run(operation::ToggleTray).map(applied),
            Operation::ToggleScannerLid => self.run(operation::ToggleScannerLid).map(applied),
            Operation::Print => self.run(operation::Print).map(applied),
            Operation::Scan => self.run(operation::Scan).map(applied),
            Operation::CompleteProduction => self
                .run(operation::CompleteProduction)
                .map(OperationOutcome::Completed),
            Operation::ClearScannedText => self.run(operation::ClearScannedText).map(applied),
            Operation::SwitchPrintingMode => self
                .run(operation::SwitchPrintingMode)
                .map(OperationOutcome::Announcement),
            Operation::AddPageToTray(item) => {
                self.run(operation::AddPageToTray(item)).map(applied)
            }
            Operation::PlaceDocument(item) => {
                self.run(operation::PlaceDocument(item)).map(applied)
            }
            Operation::InsertCartridge(item) => {
                self.run(operation::InsertCartridge(item)).map(applied)
            }
            Operation::RemoveCartridge => self.run(operation::RemoveCartridge).map(applied),
        }
    }

    pub fn toggle_tray(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::ToggleTray)
    }

    pub fn toggle_scanner_lid(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::ToggleScannerLid)
    }

    /// Starts a print job. Output is committed when production completes.
    pub fn print(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::Print)
    }

    /// Starts a scan job. Ink is consumed immediately.
    pub fn scan(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::Scan)
    }

    pub fn clear_scanned_text(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::ClearScannedText)
    }

    /// Toggles book/paper output. Allowed in any state; returns the local chat
    /// announcement.
    pub fn switch_printing_mode(&mut self) -> Result<String, ExecuteError> {
        self.run(operation::SwitchPrintingMode)
    }

    pub fn add_page_to_tray(&mut self, item: Item) -> Result<(), ExecuteError> {
        self.run(operation::AddPageToTray(item))
    }

    pub fn place_document(&mut self, item: Item) -> Result<(), ExecuteError> {
        self.run(operation::PlaceDocument(item))
    }

    pub fn insert_cartridge(&mut self, item: Item) -> Result<(), ExecuteError> {
        self.run(operation::InsertCartridge(item))
    }

    /// Ejects the cartridge into the world through the sink.
    pub fn remove_cartridge(&mut self) -> Result<(), ExecuteError> {
        self.run(operation::RemoveCartridge)
    }

    /// Commits the pending production job now, regardless of remaining time.
    ///
    /// Hosts that keep their own timer call this when it fires.
    pub fn complete_production(&mut self) -> Result<CompletedJob, ExecuteError> {
        self.run(operation::CompleteProduction)
    }

    /// Advances the production clock by `elapsed`.
    ///
    /// Returns the completed job when the delay runs out during this call.
    /// Outside production this is a no-op.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Result<CompletedJob, ExecuteError>> {
        let Phase::Production(job) = &mut self.device.phase else {
            return None;
        };
        job.remaining = job.remaining.saturating_sub(elapsed);
        if !job.remaining.is_zero() {
            return None;
        }
        Some(self.complete_production())
    }

    fn run<T: DeviceTransition>(&mut self, transition: T) -> Result<T::Output, ExecuteError> {
        let before = self.status();
        let mut ctx = ApplyContext {
            config: &self.config,
            sink: &mut self.sink,
        };
        let output = drive_transition(transition, &mut self.device, &mut ctx)?;

        let after = self.status();
        let changes = ChangeSet::between(&before, &after);
        if !changes.is_empty() {
            self.listeners.notify(&after, changes);
        }
        Ok(output)
    }
}

fn applied(_: ()) -> OperationOutcome {
    OperationOutcome::Applied
}
