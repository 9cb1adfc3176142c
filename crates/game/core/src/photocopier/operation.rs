//! Photocopier operations and their transition pipeline.
//!
//! Every request against the device is materialised as an [`Operation`] and
//! driven through the same three phases:
//! pre_validate → apply → post_validate.
//!
//! Guards live in `pre_validate` and must not touch the device. `apply` assumes
//! the guards passed. `post_validate` re-checks the structural invariants of the
//! device after the mutation.

use crate::config::PhotocopierConfig;
use crate::items::{Book, Item, Paper};

use super::error::{ExecuteError, PhotocopierError, TransitionPhase};
use super::sink::{ItemSink, SoundCue};
use super::state::{DeviceState, JobKind, Phase, ProductionJob};

/// Read-only facts and the world sink available while applying a transition.
pub(crate) struct ApplyContext<'a> {
    pub(crate) config: &'a PhotocopierConfig,
    pub(crate) sink: &'a mut dyn ItemSink,
}

/// Defines how one operation mutates the device.
pub(crate) trait DeviceTransition: Sized {
    type Output;

    const KIND: OperationKind;

    /// Validates pre-conditions using the device **before** mutation.
    fn pre_validate(
        &self,
        _device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        Ok(())
    }

    /// Mutates the device. Consumes the transition so carried items move in.
    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<Self::Output, PhotocopierError>;

    /// Item to hand back when the guard rejects the transition.
    fn into_returned(self) -> Option<Item> {
        None
    }
}

/// Runs a transition through the three-phase pipeline.
pub(crate) fn drive_transition<T>(
    transition: T,
    device: &mut DeviceState,
    ctx: &mut ApplyContext<'_>,
) -> Result<T::Output, ExecuteError>
where
    T: DeviceTransition,
{
    if let Err(error) = transition.pre_validate(device, ctx.config) {
        return Err(ExecuteError {
            operation: T::KIND,
            phase: TransitionPhase::PreValidate,
            error,
            returned: transition.into_returned(),
        });
    }

    let output = transition
        .apply(device, ctx)
        .map_err(|error| ExecuteError {
            operation: T::KIND,
            phase: TransitionPhase::Apply,
            error,
            returned: None,
        })?;

    device.check_invariants().map_err(|error| ExecuteError {
        operation: T::KIND,
        phase: TransitionPhase::PostValidate,
        error,
        returned: None,
    })?;

    Ok(output)
}

/// Discriminant of [`Operation`], used in errors and logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    ToggleTray,
    ToggleScannerLid,
    Print,
    Scan,
    CompleteProduction,
    ClearScannedText,
    SwitchPrintingMode,
    AddPageToTray,
    PlaceDocument,
    InsertCartridge,
    RemoveCartridge,
}

/// A request against the appliance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operation {
    ToggleTray,
    ToggleScannerLid,
    Print,
    Scan,
    CompleteProduction,
    ClearScannedText,
    SwitchPrintingMode,
    AddPageToTray(Item),
    PlaceDocument(Item),
    InsertCartridge(Item),
    RemoveCartridge,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::ToggleTray => OperationKind::ToggleTray,
            Operation::ToggleScannerLid => OperationKind::ToggleScannerLid,
            Operation::Print => OperationKind::Print,
            Operation::Scan => OperationKind::Scan,
            Operation::CompleteProduction => OperationKind::CompleteProduction,
            Operation::ClearScannedText => OperationKind::ClearScannedText,
            Operation::SwitchPrintingMode => OperationKind::SwitchPrintingMode,
            Operation::AddPageToTray(_) => OperationKind::AddPageToTray,
            Operation::PlaceDocument(_) => OperationKind::PlaceDocument,
            Operation::InsertCartridge(_) => OperationKind::InsertCartridge,
            Operation::RemoveCartridge => OperationKind::RemoveCartridge,
        }
    }
}

/// What a finished production job produced.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompletedJob {
    /// `copies` loose sheets were spawned.
    PrintedCopies { copies: u32 },
    /// One book of `pages` pages was spawned.
    PrintedBook { pages: u32 },
    Scanned { text: String },
}

/// Result of a successful operation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperationOutcome {
    Applied,
    /// Local chat announcement produced by the operation.
    Announcement(String),
    Completed(CompletedJob),
}

fn reject_if_producing(device: &DeviceState) -> Result<(), PhotocopierError> {
    if device.is_producing() {
        return Err(PhotocopierError::Busy);
    }
    Ok(())
}

fn require_idle(device: &DeviceState, operation: OperationKind) -> Result<(), PhotocopierError> {
    reject_if_producing(device)?;
    if !device.is_idle() {
        return Err(PhotocopierError::InvalidState {
            operation,
            state: device.state(),
        });
    }
    Ok(())
}

fn start_production(device: &mut DeviceState, kind: JobKind, config: &PhotocopierConfig) {
    device.phase = Phase::Production(ProductionJob {
        kind,
        remaining: config.production_delay(),
    });
}

pub(crate) struct ToggleTray;

impl DeviceTransition for ToggleTray {
    type Output = ();
    const KIND: OperationKind = OperationKind::ToggleTray;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        reject_if_producing(device)?;
        match device.phase {
            Phase::Idle | Phase::TrayOpen => Ok(()),
            _ => Err(PhotocopierError::InvalidState {
                operation: Self::KIND,
                state: device.state(),
            }),
        }
    }

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        device.tray.is_open = !device.tray.is_open;
        device.phase = if device.tray.is_open {
            Phase::TrayOpen
        } else {
            Phase::Idle
        };
        Ok(())
    }
}

pub(crate) struct ToggleScannerLid;

impl DeviceTransition for ToggleScannerLid {
    type Output = ();
    const KIND: OperationKind = OperationKind::ToggleScannerLid;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        reject_if_producing(device)?;
        match device.phase {
            Phase::Idle | Phase::ScannerOpen => Ok(()),
            _ => Err(PhotocopierError::InvalidState {
                operation: Self::KIND,
                state: device.state(),
            }),
        }
    }

    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        device.scanner.is_open = !device.scanner.is_open;
        if device.scanner.is_open {
            device.phase = Phase::ScannerOpen;
            // Opening the lid drops whatever paper was staged on the bed.
            if let Some(document) = device.scanner.held_document.take() {
                ctx.sink.spawn_item(Item::Paper(document));
            }
        } else {
            device.phase = Phase::Idle;
        }
        Ok(())
    }
}

pub(crate) struct Print;

impl DeviceTransition for Print {
    type Output = ();
    const KIND: OperationKind = OperationKind::Print;

    fn pre_validate(
        &self,
        device: &DeviceState,
        config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        require_idle(device, Self::KIND)?;
        if device.tray.is_empty() {
            return Err(PhotocopierError::EmptyTray);
        }
        device.require_ink(config.ink_per_use)
    }

    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        ctx.sink.play_sound(SoundCue::Copier);
        start_production(device, JobKind::Print, ctx.config);
        Ok(())
    }
}

pub(crate) struct Scan;

impl DeviceTransition for Scan {
    type Output = ();
    const KIND: OperationKind = OperationKind::Scan;

    fn pre_validate(
        &self,
        device: &DeviceState,
        config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        require_idle(device, Self::KIND)?;
        if !device.scanner.has_document() {
            return Err(PhotocopierError::NoDocument);
        }
        device.require_ink(config.ink_per_use)
    }

    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        // Ink is spent up front, not when the job completes.
        let cartridge = device
            .cartridge
            .as_mut()
            .ok_or(PhotocopierError::NoCartridge)?;
        cartridge.spend(ctx.config.ink_per_use);
        start_production(device, JobKind::Scan, ctx.config);
        Ok(())
    }
}

pub(crate) struct CompleteProduction;

impl DeviceTransition for CompleteProduction {
    type Output = CompletedJob;
    const KIND: OperationKind = OperationKind::CompleteProduction;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        if !device.is_producing() {
            return Err(PhotocopierError::NotProducing);
        }
        Ok(())
    }

    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<CompletedJob, PhotocopierError> {
        let Phase::Production(job) = device.phase else {
            return Err(PhotocopierError::NotProducing);
        };

        let completed = match job.kind {
            JobKind::Print => {
                let pages = device.tray.page_count;
                let text = device.scanner.scanned_text.clone().unwrap_or_default();
                device.tray.page_count = 0;

                if device.tray.print_book {
                    let book = Book {
                        pages: vec![text; pages as usize],
                    };
                    ctx.sink.spawn_item(Item::Book(book));
                    CompletedJob::PrintedBook { pages }
                } else {
                    for _ in 0..pages {
                        ctx.sink.spawn_item(Item::Paper(Paper::with_text(text.clone())));
                    }
                    CompletedJob::PrintedCopies { copies: pages }
                }
            }
            JobKind::Scan => {
                let document = device
                    .scanner
                    .held_document
                    .take()
                    .ok_or(PhotocopierError::NoDocument)?;
                let text = document.text.clone();
                device.scanner.scanned_text = Some(text.clone());
                // The original comes back out once it has been read.
                ctx.sink.spawn_item(Item::Paper(document));
                CompletedJob::Scanned { text }
            }
        };

        device.phase = Phase::Idle;
        Ok(completed)
    }
}

pub(crate) struct ClearScannedText;

impl DeviceTransition for ClearScannedText {
    type Output = ();
    const KIND: OperationKind = OperationKind::ClearScannedText;

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        device.scanner.scanned_text = None;
        Ok(())
    }
}

pub(crate) struct SwitchPrintingMode;

impl DeviceTransition for SwitchPrintingMode {
    type Output = String;
    const KIND: OperationKind = OperationKind::SwitchPrintingMode;

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<String, PhotocopierError> {
        device.tray.print_book = !device.tray.print_book;
        let mode = if device.tray.print_book {
            "Books"
        } else {
            "Copies of Paper"
        };
        Ok(format!("The printer will now print {mode}"))
    }
}

pub(crate) struct AddPageToTray(pub(crate) Item);

impl AddPageToTray {
    pub(crate) fn check(item: &Item, device: &DeviceState) -> Result<(), PhotocopierError> {
        if !item.as_paper().is_some_and(Paper::is_blank) {
            return Err(PhotocopierError::NotPrintablePaper);
        }
        reject_if_producing(device)?;
        if !device.tray.is_open {
            return Err(PhotocopierError::TrayClosed);
        }
        if device.tray.is_full() {
            return Err(PhotocopierError::TrayFull {
                capacity: device.tray.capacity,
            });
        }
        Ok(())
    }
}

impl DeviceTransition for AddPageToTray {
    type Output = ();
    const KIND: OperationKind = OperationKind::AddPageToTray;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        Self::check(&self.0, device)
    }

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        device.tray.page_count += 1;
        Ok(())
    }

    fn into_returned(self) -> Option<Item> {
        Some(self.0)
    }
}

pub(crate) struct PlaceDocument(pub(crate) Item);

impl PlaceDocument {
    pub(crate) fn check(item: &Item, device: &DeviceState) -> Result<(), PhotocopierError> {
        if !item.is_paper() {
            return Err(PhotocopierError::NotADocument);
        }
        reject_if_producing(device)?;
        if !device.scanner.is_open {
            return Err(PhotocopierError::ScannerClosed);
        }
        if device.scanner.has_document() {
            return Err(PhotocopierError::DocumentAlreadyHeld);
        }
        Ok(())
    }
}

impl DeviceTransition for PlaceDocument {
    type Output = ();
    const KIND: OperationKind = OperationKind::PlaceDocument;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        Self::check(&self.0, device)
    }

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        let Item::Paper(paper) = self.0 else {
            return Err(PhotocopierError::NotADocument);
        };
        device.scanner.held_document = Some(paper);
        Ok(())
    }

    fn into_returned(self) -> Option<Item> {
        Some(self.0)
    }
}

pub(crate) struct InsertCartridge(pub(crate) Item);

impl DeviceTransition for InsertCartridge {
    type Output = ();
    const KIND: OperationKind = OperationKind::InsertCartridge;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        if !self.0.is_ink_cartridge() {
            return Err(PhotocopierError::NotACartridge);
        }
        if device.cartridge.is_some() {
            return Err(PhotocopierError::CartridgeAlreadyInstalled);
        }
        Ok(())
    }

    fn apply(
        self,
        device: &mut DeviceState,
        _ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        let Item::InkCartridge(cartridge) = self.0 else {
            return Err(PhotocopierError::NotACartridge);
        };
        device.cartridge = Some(cartridge);
        Ok(())
    }

    fn into_returned(self) -> Option<Item> {
        Some(self.0)
    }
}

pub(crate) struct RemoveCartridge;

impl DeviceTransition for RemoveCartridge {
    type Output = ();
    const KIND: OperationKind = OperationKind::RemoveCartridge;

    fn pre_validate(
        &self,
        device: &DeviceState,
        _config: &PhotocopierConfig,
    ) -> Result<(), PhotocopierError> {
        reject_if_producing(device)?;
        if device.cartridge.is_none() {
            return Err(PhotocopierError::NoCartridge);
        }
        Ok(())
    }

    fn apply(
        self,
        device: &mut DeviceState,
        ctx: &mut ApplyContext<'_>,
    ) -> Result<(), PhotocopierError> {
        let cartridge = device.cartridge.take().ok_or(PhotocopierError::NoCartridge)?;
        ctx.sink.spawn_item(Item::InkCartridge(cartridge));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::InkCartridge;
    use crate::photocopier::sink::CollectingSink;

    fn run<T: DeviceTransition>(
        transition: T,
        device: &mut DeviceState,
        sink: &mut CollectingSink,
    ) -> Result<T::Output, ExecuteError> {
        let config = PhotocopierConfig::default();
        let mut ctx = ApplyContext {
            config: &config,
            sink,
        };
        drive_transition(transition, device, &mut ctx)
    }

    #[test]
    fn rejected_page_is_returned() {
        let mut device = DeviceState::new(5);
        let mut sink = CollectingSink::new();
        let err = run(AddPageToTray(Paper::blank().into()), &mut device, &mut sink).unwrap_err();

        assert_eq!(err.phase, TransitionPhase::PreValidate);
        assert_eq!(err.error, PhotocopierError::TrayClosed);
        assert_eq!(err.returned, Some(Item::Paper(Paper::blank())));
        assert_eq!(device, DeviceState::new(5));
    }

    #[test]
    fn written_paper_is_not_printable() {
        let mut device = DeviceState::new(5);
        let mut sink = CollectingSink::new();
        run(ToggleTray, &mut device, &mut sink).unwrap();

        let err = run(
            AddPageToTray(Paper::with_text("memo").into()),
            &mut device,
            &mut sink,
        )
        .unwrap_err();
        assert_eq!(err.error, PhotocopierError::NotPrintablePaper);
    }

    #[test]
    fn complete_without_job_is_rejected() {
        let mut device = DeviceState::new(5);
        let mut sink = CollectingSink::new();
        let err = run(CompleteProduction, &mut device, &mut sink).unwrap_err();
        assert_eq!(err.error, PhotocopierError::NotProducing);
    }

    #[test]
    fn scan_spends_configured_ink() {
        let mut device = DeviceState::new(5);
        device.cartridge = Some(InkCartridge::new(3, 30));
        device.scanner.held_document = Some(Paper::with_text("report"));
        let mut sink = CollectingSink::new();

        run(Scan, &mut device, &mut sink).unwrap();
        assert_eq!(device.ink_level(), Some(2));
        assert!(device.is_producing());
    }

    #[test]
    fn operation_kind_display() {
        assert_eq!(OperationKind::AddPageToTray.to_string(), "add_page_to_tray");
        assert_eq!(
            Operation::InsertCartridge(InkCartridge::full(30).into()).kind(),
            OperationKind::InsertCartridge
        );
    }
}
