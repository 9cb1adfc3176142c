//! World-facing output of the appliance.

use crate::items::Item;

/// Sounds the appliance asks the host to play at its position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SoundCue {
    Copier,
}

/// Receives everything the device puts into the world: printed output,
/// ejected originals, removed cartridges, and sound cues.
pub trait ItemSink {
    fn spawn_item(&mut self, item: Item);

    fn play_sound(&mut self, _cue: SoundCue) {}
}

/// Sink that keeps everything in memory. Handy for tests and headless hosts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectingSink {
    pub items: Vec<Item>,
    pub sounds: Vec<SoundCue>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything spawned so far.
    pub fn take_items(&mut self) -> Vec<Item> {
        core::mem::take(&mut self.items)
    }
}

impl ItemSink for CollectingSink {
    fn spawn_item(&mut self, item: Item) {
        self.items.push(item);
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }
}
