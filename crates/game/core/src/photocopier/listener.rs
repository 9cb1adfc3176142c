//! Render-invalidation observers.
//!
//! Display layers subscribe to the controller and get called synchronously after
//! every operation that changed something they can show. They receive a fresh
//! [`StatusView`] plus a [`ChangeSet`] naming what moved, so they can refresh
//! lazily instead of polling.

use bitflags::bitflags;

use super::state::ApplianceState;

bitflags! {
    /// Tracks which observable aspects of the device changed during an operation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ChangeSet: u8 {
        const STATE        = 1 << 0;
        const TRAY         = 1 << 1;
        const SCANNER      = 1 << 2;
        const SCANNED_TEXT = 1 << 3;
        const PRINT_MODE   = 1 << 4;
        const INK          = 1 << 5;
    }
}

impl ChangeSet {
    /// Compares two snapshots field by field.
    pub fn between(before: &StatusView, after: &StatusView) -> Self {
        let mut changes = ChangeSet::empty();
        if before.state != after.state {
            changes |= ChangeSet::STATE;
        }
        if before.tray_count != after.tray_count
            || before.tray_capacity != after.tray_capacity
            || before.tray_open != after.tray_open
        {
            changes |= ChangeSet::TRAY;
        }
        if before.scanner_open != after.scanner_open
            || before.document_loaded != after.document_loaded
        {
            changes |= ChangeSet::SCANNER;
        }
        if before.scanned_text != after.scanned_text {
            changes |= ChangeSet::SCANNED_TEXT;
        }
        if before.print_book != after.print_book {
            changes |= ChangeSet::PRINT_MODE;
        }
        if before.ink_level != after.ink_level {
            changes |= ChangeSet::INK;
        }
        changes
    }
}

/// Everything a status display needs to draw the appliance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusView {
    pub state: ApplianceState,
    pub tray_count: u32,
    pub tray_capacity: u32,
    pub tray_open: bool,
    pub scanner_open: bool,
    pub document_loaded: bool,
    pub scanned_text: Option<String>,
    pub print_book: bool,
    /// `None` when no cartridge is installed.
    pub ink_level: Option<u32>,
}

impl StatusView {
    pub fn has_scanned_text(&self) -> bool {
        self.scanned_text.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Observer notified when the device needs to be redrawn.
pub trait RenderListener: Send {
    fn render_required(&self, status: &StatusView, changes: ChangeSet);
}

impl<F> RenderListener for F
where
    F: Fn(&StatusView, ChangeSet) + Send,
{
    fn render_required(&self, status: &StatusView, changes: ChangeSet) {
        self(status, changes)
    }
}

/// Handle returned by `subscribe`, used to unsubscribe later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Default)]
pub(crate) struct RenderListeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn RenderListener>)>,
}

impl RenderListeners {
    pub(crate) fn subscribe(&mut self, listener: Box<dyn RenderListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Calls every listener in subscription order.
    pub(crate) fn notify(&self, status: &StatusView, changes: ChangeSet) {
        for (_, listener) in &self.entries {
            listener.render_required(status, changes);
        }
    }
}

impl core::fmt::Debug for RenderListeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RenderListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn idle_view() -> StatusView {
        StatusView {
            state: ApplianceState::Idle,
            tray_count: 0,
            tray_capacity: 5,
            tray_open: false,
            scanner_open: false,
            document_loaded: false,
            scanned_text: None,
            print_book: false,
            ink_level: Some(30),
        }
    }

    #[test]
    fn change_set_tracks_fields() {
        let before = idle_view();
        let mut after = before.clone();
        assert!(ChangeSet::between(&before, &after).is_empty());

        after.state = ApplianceState::TrayOpen;
        after.tray_open = true;
        after.ink_level = Some(29);
        let changes = ChangeSet::between(&before, &after);
        assert_eq!(changes, ChangeSet::STATE | ChangeSet::TRAY | ChangeSet::INK);
    }

    #[test]
    fn unsubscribe_removes_only_target() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut listeners = RenderListeners::default();

        let first = {
            let calls = Arc::clone(&calls);
            listeners.subscribe(Box::new(move |_: &StatusView, _: ChangeSet| {
                calls.fetch_add(1, Ordering::SeqCst);
            }))
        };
        let _second = {
            let calls = Arc::clone(&calls);
            listeners.subscribe(Box::new(move |_: &StatusView, _: ChangeSet| {
                calls.fetch_add(10, Ordering::SeqCst);
            }))
        };

        assert!(listeners.unsubscribe(first));
        assert!(!listeners.unsubscribe(first));
        listeners.notify(&idle_view(), ChangeSet::STATE);
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        assert_eq!(listeners.len(), 1);
    }
}
