use crate::config::ChatBubbleConfig;

/// Visual style of a chat bubble, derived from the text it shows.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BubbleType {
    /// Regular text, regular bubble.
    #[default]
    Normal,
    /// Starts with `#`; smaller bubble.
    Whisper,
    /// All caps with at least one letter, or ends with `!!`; bigger bubble.
    Caps,
    /// Clown speech. Drawn at normal size.
    Clown,
}

impl BubbleType {
    /// Classifies a chunk of chat text.
    pub fn classify(text: &str) -> Self {
        if text.starts_with('#') {
            return BubbleType::Whisper;
        }
        if text.ends_with("!!") {
            return BubbleType::Caps;
        }
        let has_letter = text.chars().any(char::is_alphabetic);
        let has_lowercase = text.chars().any(char::is_lowercase);
        if has_letter && !has_lowercase {
            return BubbleType::Caps;
        }
        BubbleType::Normal
    }

    pub fn size(self, config: &ChatBubbleConfig) -> f32 {
        match self {
            BubbleType::Caps => config.size_caps,
            BubbleType::Whisper => config.size_whisper,
            BubbleType::Normal | BubbleType::Clown => config.size_normal,
        }
    }
}
