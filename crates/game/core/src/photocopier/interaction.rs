//! Hand interactions and context-menu options.
//!
//! Translates what a player does at the machine (click with an empty hand,
//! apply a sheet, apply a toner cartridge) into controller operations.

use crate::items::Item;

use super::error::ExecuteError;
use super::sink::ItemSink;
use super::state::ApplianceState;
use super::ApplianceController;

/// What happened when a player applied their hand to the device.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractionOutcome {
    CartridgeInserted,
    TrayClosed,
    ScannerClosed,
    /// Nothing was open: the host should open the control panel for the player.
    PanelRequested,
    PageAdded,
    DocumentPlaced,
    /// The device had no use for the held item; it stays in the player's hand.
    Declined(Item),
    /// Empty-handed click on a busy device; nothing happens.
    Ignored,
}

impl InteractionOutcome {
    /// Examine text shown to the performing player.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            InteractionOutcome::TrayClosed => Some("You close the tray."),
            InteractionOutcome::ScannerClosed => Some("You close the scanner lid."),
            InteractionOutcome::PageAdded => Some("You place the sheet in the tray."),
            InteractionOutcome::DocumentPlaced => Some("You place the document in the scanner."),
            _ => None,
        }
    }
}

/// Right-click menu entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContextOption {
    #[strum(to_string = "Switch Printing Mode")]
    SwitchPrintingMode,
    #[strum(to_string = "Remove Ink Cart")]
    RemoveInkCartridge,
}

impl<S: ItemSink> ApplianceController<S> {
    /// Whether a hand-apply with `hand` is meaningful right now.
    pub fn will_interact(&self, hand: Option<&Item>) -> bool {
        let state = self.state();
        match hand {
            Some(item) if item.is_ink_cartridge() => true,
            None => state != ApplianceState::Production,
            Some(item) => {
                matches!(
                    state,
                    ApplianceState::TrayOpen | ApplianceState::ScannerOpen
                ) && item.is_paper()
            }
        }
    }

    /// Performs a hand-apply. The held item, if any, is moved in and either
    /// consumed by the device or handed back through
    /// [`InteractionOutcome::Declined`]. Hands rejected by
    /// [`will_interact`](Self::will_interact) change nothing.
    pub fn perform_interaction(
        &mut self,
        hand: Option<Item>,
    ) -> Result<InteractionOutcome, ExecuteError> {
        if !self.will_interact(hand.as_ref()) {
            return Ok(hand.map_or(InteractionOutcome::Ignored, InteractionOutcome::Declined));
        }
        let Some(item) = hand else {
            return self.interact_empty_handed();
        };

        if item.is_ink_cartridge() && !self.has_cartridge() {
            self.insert_cartridge(item)?;
            return Ok(InteractionOutcome::CartridgeInserted);
        }
        if self.can_add_page_to_tray(&item) {
            self.add_page_to_tray(item)?;
            return Ok(InteractionOutcome::PageAdded);
        }
        if self.can_place_document(&item) {
            self.place_document(item)?;
            return Ok(InteractionOutcome::DocumentPlaced);
        }
        Ok(InteractionOutcome::Declined(item))
    }

    fn interact_empty_handed(&mut self) -> Result<InteractionOutcome, ExecuteError> {
        if self.tray().is_open {
            self.toggle_tray()?;
            Ok(InteractionOutcome::TrayClosed)
        } else if self.scanner().is_open {
            self.toggle_scanner_lid()?;
            Ok(InteractionOutcome::ScannerClosed)
        } else {
            // The panel needs a fresh status to draw from.
            self.request_render();
            Ok(InteractionOutcome::PanelRequested)
        }
    }

    /// Notifies listeners with the current status even though nothing changed.
    pub fn request_render(&self) {
        self.listeners
            .notify(&self.status(), super::listener::ChangeSet::empty());
    }

    pub fn context_options(&self) -> Vec<ContextOption> {
        let mut options = vec![ContextOption::SwitchPrintingMode];
        if self.has_cartridge() {
            options.push(ContextOption::RemoveInkCartridge);
        }
        options
    }

    /// Runs a context-menu entry. Returns the chat announcement, if any.
    pub fn apply_context_option(
        &mut self,
        option: ContextOption,
    ) -> Result<Option<String>, ExecuteError> {
        match option {
            ContextOption::SwitchPrintingMode => self.switch_printing_mode().map(Some),
            ContextOption::RemoveInkCartridge => self.remove_cartridge().map(|()| None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhotocopierConfig;
    use crate::items::{InkCartridge, Paper};
    use crate::photocopier::{ChangeSet, CollectingSink, StatusView};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn controller() -> ApplianceController<CollectingSink> {
        ApplianceController::new(PhotocopierConfig::default(), CollectingSink::new())
    }

    #[test]
    fn cartridge_in_hand_always_interacts() {
        let copier = controller();
        assert!(copier.will_interact(Some(&InkCartridge::full(30).into())));
    }

    #[test]
    fn paper_only_interacts_when_something_is_open() {
        let mut copier = controller();
        let paper: Item = Paper::blank().into();
        assert!(!copier.will_interact(Some(&paper)));

        copier.toggle_tray().unwrap();
        assert!(copier.will_interact(Some(&paper)));
    }

    #[test]
    fn empty_hand_closes_whatever_is_open() {
        let mut copier = controller();
        copier.toggle_tray().unwrap();

        let outcome = copier.perform_interaction(None).unwrap();
        assert_eq!(outcome, InteractionOutcome::TrayClosed);
        assert_eq!(outcome.message(), Some("You close the tray."));
        assert_eq!(copier.state(), ApplianceState::Idle);

        copier.toggle_scanner_lid().unwrap();
        let outcome = copier.perform_interaction(None).unwrap();
        assert_eq!(outcome, InteractionOutcome::ScannerClosed);

        let outcome = copier.perform_interaction(None).unwrap();
        assert_eq!(outcome, InteractionOutcome::PanelRequested);
    }

    #[test]
    fn sheets_go_to_tray_then_scanner() {
        let mut copier = controller();
        copier.toggle_tray().unwrap();
        let outcome = copier.perform_interaction(Some(Paper::blank().into())).unwrap();
        assert_eq!(outcome, InteractionOutcome::PageAdded);
        assert_eq!(copier.tray().page_count, 1);

        copier.toggle_tray().unwrap();
        copier.toggle_scanner_lid().unwrap();
        let outcome = copier
            .perform_interaction(Some(Paper::with_text("minutes").into()))
            .unwrap();
        assert_eq!(outcome, InteractionOutcome::DocumentPlaced);
        assert!(copier.scanner().has_document());
    }

    #[test]
    fn unusable_item_is_handed_back() {
        let mut copier = controller();
        let item = Item::Other {
            name: "stapler".into(),
        };
        let outcome = copier.perform_interaction(Some(item.clone())).unwrap();
        assert_eq!(outcome, InteractionOutcome::Declined(item));
    }

    #[test]
    fn second_cartridge_is_declined() {
        let mut copier = controller();
        copier
            .perform_interaction(Some(InkCartridge::full(30).into()))
            .unwrap();
        let spare: Item = InkCartridge::full(30).into();
        let outcome = copier.perform_interaction(Some(spare.clone())).unwrap();
        assert_eq!(outcome, InteractionOutcome::Declined(spare));
    }

    #[test]
    fn busy_device_ignores_empty_hand() {
        let mut copier = controller();
        copier.insert_cartridge(InkCartridge::full(30).into()).unwrap();
        copier.toggle_scanner_lid().unwrap();
        copier.place_document(Paper::with_text("memo").into()).unwrap();
        copier.toggle_scanner_lid().unwrap();
        copier.scan().unwrap();

        let renders = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&renders);
        copier.subscribe(move |_: &StatusView, _: ChangeSet| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!copier.will_interact(None));
        assert_eq!(
            copier.perform_interaction(None).unwrap(),
            InteractionOutcome::Ignored
        );
        let sheet: Item = Paper::blank().into();
        assert_eq!(
            copier.perform_interaction(Some(sheet.clone())).unwrap(),
            InteractionOutcome::Declined(sheet)
        );
        assert_eq!(renders.load(Ordering::SeqCst), 0);
        assert_eq!(copier.state(), ApplianceState::Production);
    }

    #[test]
    fn context_options_follow_cartridge() {
        let mut copier = controller();
        assert_eq!(
            copier.context_options(),
            vec![ContextOption::SwitchPrintingMode]
        );

        copier.insert_cartridge(InkCartridge::full(30).into()).unwrap();
        assert_eq!(
            copier.context_options(),
            vec![
                ContextOption::SwitchPrintingMode,
                ContextOption::RemoveInkCartridge
            ]
        );
        assert_eq!(ContextOption::RemoveInkCartridge.to_string(), "Remove Ink Cart");

        let removed = copier
            .apply_context_option(ContextOption::RemoveInkCartridge)
            .unwrap();
        assert_eq!(removed, None);
        assert!(!copier.has_cartridge());
        assert_eq!(
            copier.sink().items,
            vec![Item::InkCartridge(InkCartridge::full(30))]
        );

        let announcement = copier
            .apply_context_option(ContextOption::SwitchPrintingMode)
            .unwrap();
        assert_eq!(
            announcement.as_deref(),
            Some("The printer will now print Books")
        );
    }
}
