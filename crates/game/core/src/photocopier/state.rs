//! Device state: operating phase plus the orthogonal tray and scanner models.

use core::time::Duration;

use crate::items::{InkCartridge, Paper};

use super::error::PhotocopierError;

/// Operating state of the appliance. Exactly one is active at a time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ApplianceState {
    #[default]
    Idle,
    TrayOpen,
    ScannerOpen,
    Production,
}

/// What the device is producing while in [`ApplianceState::Production`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum JobKind {
    Print,
    Scan,
}

/// A production job in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProductionJob {
    pub kind: JobKind,
    pub remaining: Duration,
}

/// Internal phase. Only `Production` carries data; tray and scanner are
/// tracked on [`DeviceState`] independently of the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    TrayOpen,
    ScannerOpen,
    Production(ProductionJob),
}

impl Phase {
    pub(crate) fn state(&self) -> ApplianceState {
        match self {
            Phase::Idle => ApplianceState::Idle,
            Phase::TrayOpen => ApplianceState::TrayOpen,
            Phase::ScannerOpen => ApplianceState::ScannerOpen,
            Phase::Production(_) => ApplianceState::Production,
        }
    }
}

/// Paper tray: blank sheets waiting to be printed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrayModel {
    pub page_count: u32,
    pub capacity: u32,
    pub is_open: bool,
    /// Print bound books instead of loose copies.
    pub print_book: bool,
}

impl TrayModel {
    pub fn new(capacity: u32) -> Self {
        Self {
            page_count: 0,
            capacity: capacity.max(1),
            is_open: false,
            print_book: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }

    pub fn is_full(&self) -> bool {
        self.page_count >= self.capacity
    }
}

/// Scanner bed: at most one document, plus the text of the last scan.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScannerModel {
    pub is_open: bool,
    pub held_document: Option<Paper>,
    pub scanned_text: Option<String>,
}

impl ScannerModel {
    pub fn has_document(&self) -> bool {
        self.held_document.is_some()
    }
}

/// Complete mutable model of one appliance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct DeviceState {
    pub(crate) phase: Phase,
    pub(crate) tray: TrayModel,
    pub(crate) scanner: ScannerModel,
    pub(crate) cartridge: Option<InkCartridge>,
}

impl DeviceState {
    pub(crate) fn new(tray_capacity: u32) -> Self {
        Self {
            phase: Phase::Idle,
            tray: TrayModel::new(tray_capacity),
            scanner: ScannerModel::default(),
            cartridge: None,
        }
    }

    pub(crate) fn state(&self) -> ApplianceState {
        self.phase.state()
    }

    pub(crate) fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    pub(crate) fn is_producing(&self) -> bool {
        matches!(self.phase, Phase::Production(_))
    }

    pub(crate) fn ink_level(&self) -> Option<u32> {
        self.cartridge.map(|c| c.ink)
    }

    /// Fails unless a cartridge is installed with at least `cost` ink.
    pub(crate) fn require_ink(&self, cost: u32) -> Result<(), PhotocopierError> {
        let cartridge = self.cartridge.ok_or(PhotocopierError::NoCartridge)?;
        if !cartridge.has_ink_for(cost) {
            return Err(PhotocopierError::InsufficientInk {
                available: cartridge.ink,
                required: cost,
            });
        }
        Ok(())
    }

    /// Structural invariants that must hold between operations.
    pub(crate) fn check_invariants(&self) -> Result<(), PhotocopierError> {
        if self.tray.page_count > self.tray.capacity {
            return Err(PhotocopierError::InvariantViolation(
                "tray page count exceeds capacity",
            ));
        }
        let consistent = match self.phase {
            Phase::Idle => !self.tray.is_open && !self.scanner.is_open,
            Phase::TrayOpen => self.tray.is_open && !self.scanner.is_open,
            Phase::ScannerOpen => !self.tray.is_open && self.scanner.is_open,
            Phase::Production(_) => !self.tray.is_open && !self.scanner.is_open,
        };
        if !consistent {
            return Err(PhotocopierError::InvariantViolation(
                "operating state disagrees with tray or scanner",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_device_is_idle_and_consistent() {
        let device = DeviceState::new(5);
        assert_eq!(device.state(), ApplianceState::Idle);
        assert!(device.check_invariants().is_ok());
        assert!(device.tray.is_empty());
        assert!(!device.scanner.has_document());
    }

    #[test]
    fn open_tray_in_idle_phase_is_inconsistent() {
        let mut device = DeviceState::new(5);
        device.tray.is_open = true;
        assert!(matches!(
            device.check_invariants(),
            Err(PhotocopierError::InvariantViolation(_))
        ));
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        assert_eq!(TrayModel::new(0).capacity, 1);
    }

    #[test]
    fn require_ink_reports_levels() {
        let mut device = DeviceState::new(5);
        assert_eq!(device.require_ink(1), Err(PhotocopierError::NoCartridge));
        device.cartridge = Some(InkCartridge::new(0, 30));
        assert_eq!(
            device.require_ink(1),
            Err(PhotocopierError::InsufficientInk {
                available: 0,
                required: 1
            })
        );
    }
}
