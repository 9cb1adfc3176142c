//! Player chat bubble.
//!
//! Long messages are chunked, queued, and shown one after another above the
//! speaker, each for a time proportional to its length. When the player has
//! bubbles disabled, a simple typing icon is toggled instead.

mod bubble;
mod split;

use std::collections::VecDeque;
use std::time::Duration;

pub use bubble::BubbleType;
pub use split::split_message;

use crate::config::ChatBubbleConfig;

/// How a chat line was presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatVisual {
    /// Bubbles are disabled; the chat icon was switched on or off.
    Icon { visible: bool },
    /// The text was queued on the bubble.
    Bubble,
}

/// Visible change produced by [`ChatBubble::advance`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BubbleEvent {
    Shown(String),
    Hidden,
}

#[derive(Clone, Debug, PartialEq)]
struct QueuedChunk {
    text: String,
    max_time: Duration,
}

#[derive(Clone, Debug, PartialEq)]
struct ActiveChunk {
    chunk: QueuedChunk,
    elapsed: Duration,
    bubble_type: BubbleType,
}

/// Chat bubble controller for one player.
#[derive(Clone, Debug)]
pub struct ChatBubble {
    config: ChatBubbleConfig,
    queue: VecDeque<QueuedChunk>,
    current: Option<ActiveChunk>,
    bubbles_enabled: bool,
    icon_visible: bool,
    zoom_level: u32,
}

impl ChatBubble {
    pub fn new(config: ChatBubbleConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
            current: None,
            bubbles_enabled: false,
            icon_visible: false,
            zoom_level: 1,
        }
    }

    pub fn with_bubbles_enabled(mut self, enabled: bool) -> Self {
        self.bubbles_enabled = enabled;
        self
    }

    pub fn bubbles_enabled(&self) -> bool {
        self.bubbles_enabled
    }

    /// Applies the player's preference. Turning bubbles off drops anything
    /// queued and hides the bubble at once.
    pub fn set_bubbles_enabled(&mut self, enabled: bool) {
        self.bubbles_enabled = enabled;
        if !enabled {
            self.queue.clear();
            self.current = None;
        }
    }

    /// Camera zoom level; bubble scale is divided by it. Clamped to at least 1.
    pub fn set_zoom_level(&mut self, zoom_level: u32) {
        self.zoom_level = zoom_level.max(1);
    }

    /// Routes a chat line either to the icon or to the bubble queue.
    pub fn determine_visual(&mut self, toggle: bool, message: &str) -> ChatVisual {
        if !self.bubbles_enabled {
            self.icon_visible = toggle;
            return ChatVisual::Icon { visible: toggle };
        }
        self.add_message(message);
        ChatVisual::Bubble
    }

    /// Chunks and queues `message`, showing it right away if nothing is up.
    /// Blank messages are ignored.
    pub fn add_message(&mut self, message: &str) {
        if message.trim().is_empty() {
            return;
        }
        for text in split_message(message, self.config.max_chars) {
            let max_time = self.config.display_time(text.chars().count());
            self.queue.push_back(QueuedChunk { text, max_time });
        }
        if self.current.is_none() {
            self.show_next();
        }
    }

    /// Advances the display clock by one frame.
    ///
    /// At most one chunk transition happens per call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<BubbleEvent> {
        let active = self.current.as_mut()?;
        active.elapsed += elapsed;
        if active.elapsed < active.chunk.max_time {
            return None;
        }
        match self.show_next() {
            Some(text) => Some(BubbleEvent::Shown(text)),
            None => Some(BubbleEvent::Hidden),
        }
    }

    fn show_next(&mut self) -> Option<String> {
        self.current = self.queue.pop_front().map(|chunk| ActiveChunk {
            bubble_type: BubbleType::classify(&chunk.text),
            chunk,
            elapsed: Duration::ZERO,
        });
        self.current.as_ref().map(|active| active.chunk.text.clone())
    }

    pub fn is_visible(&self) -> bool {
        self.current.is_some()
    }

    pub fn icon_visible(&self) -> bool {
        self.icon_visible
    }

    pub fn text(&self) -> Option<&str> {
        self.current.as_ref().map(|active| active.chunk.text.as_str())
    }

    pub fn bubble_type(&self) -> Option<BubbleType> {
        self.current.as_ref().map(|active| active.bubble_type)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Scale of the bubble canvas for the current chunk and zoom level.
    pub fn scale(&self) -> Option<f32> {
        self.bubble_type()
            .map(|kind| kind.size(&self.config) / self.zoom_level as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bubble() -> ChatBubble {
        ChatBubble::new(ChatBubbleConfig::default()).with_bubbles_enabled(true)
    }

    #[test]
    fn disabled_bubbles_toggle_icon() {
        let mut chat = ChatBubble::new(ChatBubbleConfig::default());
        assert_eq!(
            chat.determine_visual(true, "hello"),
            ChatVisual::Icon { visible: true }
        );
        assert!(chat.icon_visible());
        assert!(!chat.is_visible());
        assert_eq!(
            chat.determine_visual(false, ""),
            ChatVisual::Icon { visible: false }
        );
    }

    #[test]
    fn short_message_shows_for_minimum_time() {
        let mut chat = bubble();
        assert_eq!(chat.determine_visual(true, "hi"), ChatVisual::Bubble);
        assert_eq!(chat.text(), Some("hi"));

        assert_eq!(chat.advance(Duration::from_secs(2)), None);
        assert_eq!(
            chat.advance(Duration::from_millis(500)),
            Some(BubbleEvent::Hidden)
        );
        assert!(!chat.is_visible());
        assert_eq!(chat.advance(Duration::from_secs(5)), None);
    }

    #[test]
    fn chunks_play_in_order() {
        let mut chat = bubble();
        let long = format!("{} {}", "a".repeat(40), "b".repeat(40));
        chat.add_message(&long);
        assert_eq!(chat.text(), Some("a".repeat(40).as_str()));
        assert_eq!(chat.pending(), 1);

        // 40 characters stay up for four seconds.
        assert_eq!(chat.advance(Duration::from_secs(3)), None);
        assert_eq!(
            chat.advance(Duration::from_secs(1)),
            Some(BubbleEvent::Shown("b".repeat(40)))
        );
        assert_eq!(
            chat.advance(Duration::from_secs(4)),
            Some(BubbleEvent::Hidden)
        );
    }

    #[test]
    fn later_messages_wait_for_current() {
        let mut chat = bubble();
        chat.add_message("first");
        chat.add_message("second");
        assert_eq!(chat.text(), Some("first"));
        assert_eq!(
            chat.advance(Duration::from_secs(3)),
            Some(BubbleEvent::Shown("second".into()))
        );
    }

    #[test]
    fn disabling_clears_queue() {
        let mut chat = bubble();
        chat.add_message("one");
        chat.add_message("two");
        chat.set_bubbles_enabled(false);
        assert!(!chat.is_visible());
        assert_eq!(chat.pending(), 0);
    }

    #[test]
    fn scale_uses_type_and_zoom() {
        let mut chat = bubble();
        chat.set_zoom_level(2);
        chat.add_message("STOP");
        assert_eq!(chat.bubble_type(), Some(BubbleType::Caps));
        assert_eq!(chat.scale(), Some(6.0));

        chat.set_zoom_level(0);
        assert_eq!(chat.scale(), Some(12.0));
    }

    #[test]
    fn negative_display_bounds_do_not_panic() {
        let config = ChatBubbleConfig {
            min_display_secs: -3.0,
            max_display_secs: -1.0,
            ..ChatBubbleConfig::default()
        };
        let mut chat = ChatBubble::new(config).with_bubbles_enabled(true);
        chat.add_message("hello");
        assert_eq!(chat.text(), Some("hello"));
        assert_eq!(chat.advance(Duration::ZERO), Some(BubbleEvent::Hidden));
    }

    #[test]
    fn blank_message_is_ignored() {
        let mut chat = bubble();
        chat.add_message("   ");
        assert!(!chat.is_visible());
    }
}
