use core::time::Duration;

/// Top-level configuration for a bureau host.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BureauConfig {
    pub photocopier: PhotocopierConfig,
    pub chat_bubble: ChatBubbleConfig,
}

/// Tunable parameters of a photocopier instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PhotocopierConfig {
    /// Maximum number of blank sheets the tray accepts.
    pub tray_capacity: u32,
    /// Time spent in production before a print or scan completes.
    pub production_delay_ms: u64,
    /// Ink consumed per scan and required to be present for any job.
    pub ink_per_use: u32,
    /// Ink level of a freshly made cartridge.
    pub cartridge_capacity: u32,
}

impl PhotocopierConfig {
    pub const DEFAULT_TRAY_CAPACITY: u32 = 10;
    pub const DEFAULT_PRODUCTION_DELAY_MS: u64 = 4_000;
    pub const DEFAULT_INK_PER_USE: u32 = 1;
    pub const DEFAULT_CARTRIDGE_CAPACITY: u32 = 30;

    pub fn new() -> Self {
        Self {
            tray_capacity: Self::DEFAULT_TRAY_CAPACITY,
            production_delay_ms: Self::DEFAULT_PRODUCTION_DELAY_MS,
            ink_per_use: Self::DEFAULT_INK_PER_USE,
            cartridge_capacity: Self::DEFAULT_CARTRIDGE_CAPACITY,
        }
    }

    pub fn with_tray_capacity(mut self, tray_capacity: u32) -> Self {
        self.tray_capacity = tray_capacity;
        self
    }

    pub fn with_production_delay(mut self, delay: Duration) -> Self {
        self.production_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn production_delay(&self) -> Duration {
        Duration::from_millis(self.production_delay_ms)
    }
}

impl Default for PhotocopierConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Presentation constants for the player chat bubble.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ChatBubbleConfig {
    /// Size when the player speaks like a normal person.
    pub size_normal: f32,
    /// Size for all-caps text or text ending with `!!`.
    pub size_caps: f32,
    /// Size for text starting with `#`.
    pub size_whisper: f32,
    /// Longest chunk shown in one bubble, in characters.
    pub max_chars: usize,
    pub chars_per_second: f32,
    pub min_display_secs: f32,
    pub max_display_secs: f32,
}

impl ChatBubbleConfig {
    pub const DEFAULT_MAX_CHARS: usize = 52;

    pub fn new() -> Self {
        Self {
            size_normal: 8.0,
            size_caps: 12.0,
            size_whisper: 6.0,
            max_chars: Self::DEFAULT_MAX_CHARS,
            chars_per_second: 10.0,
            min_display_secs: 2.5,
            max_display_secs: 10.0,
        }
    }

    /// How long a chunk of `char_count` characters stays on screen.
    pub fn display_time(&self, char_count: usize) -> Duration {
        let secs = (char_count as f32 / self.chars_per_second)
            .max(self.min_display_secs)
            .min(self.max_display_secs);
        // Negative or non-finite settings yield a zero duration.
        Duration::try_from_secs_f32(secs).unwrap_or(Duration::ZERO)
    }
}

impl Default for ChatBubbleConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_time_is_clamped() {
        let config = ChatBubbleConfig::default();
        assert_eq!(config.display_time(0), Duration::from_secs_f32(2.5));
        assert_eq!(config.display_time(40), Duration::from_secs_f32(4.0));
        assert_eq!(config.display_time(500), Duration::from_secs_f32(10.0));
    }

    #[test]
    fn nonsensical_bounds_give_zero_time() {
        let config = ChatBubbleConfig {
            min_display_secs: -3.0,
            max_display_secs: -1.0,
            ..ChatBubbleConfig::default()
        };
        assert_eq!(config.display_time(5), Duration::ZERO);

        let config = ChatBubbleConfig {
            chars_per_second: 0.0,
            max_display_secs: f32::INFINITY,
            ..ChatBubbleConfig::default()
        };
        assert_eq!(config.display_time(5), Duration::ZERO);
    }

    #[test]
    fn default_production_delay_is_four_seconds() {
        assert_eq!(
            PhotocopierConfig::default().production_delay(),
            Duration::from_secs(4)
        );
    }
}
