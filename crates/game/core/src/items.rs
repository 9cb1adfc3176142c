//! World items exchanged between players and appliances.

/// A loose sheet of paper. Blank when `text` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paper {
    pub text: String,
}

impl Paper {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// A bound book; one entry per page.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Book {
    pub pages: Vec<String>,
}

impl Book {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Toner cartridge feeding a photocopier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InkCartridge {
    pub ink: u32,
    pub capacity: u32,
}

impl InkCartridge {
    pub fn new(ink: u32, capacity: u32) -> Self {
        Self {
            ink: ink.min(capacity),
            capacity,
        }
    }

    pub fn full(capacity: u32) -> Self {
        Self::new(capacity, capacity)
    }

    /// Whether at least `cost` ink remains.
    pub fn has_ink_for(&self, cost: u32) -> bool {
        self.ink >= cost
    }

    /// Consumes `cost` ink, saturating at empty.
    pub fn spend(&mut self, cost: u32) {
        self.ink = self.ink.saturating_sub(cost);
    }
}

/// Anything a player can hold in hand.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Item {
    Paper(Paper),
    Book(Book),
    InkCartridge(InkCartridge),
    Other { name: String },
}

impl Item {
    pub fn as_paper(&self) -> Option<&Paper> {
        match self {
            Item::Paper(paper) => Some(paper),
            _ => None,
        }
    }

    pub fn is_paper(&self) -> bool {
        matches!(self, Item::Paper(_))
    }

    pub fn is_ink_cartridge(&self) -> bool {
        matches!(self, Item::InkCartridge(_))
    }
}

impl From<Paper> for Item {
    fn from(paper: Paper) -> Self {
        Item::Paper(paper)
    }
}

impl From<Book> for Item {
    fn from(book: Book) -> Self {
        Item::Book(book)
    }
}

impl From<InkCartridge> for Item {
    fn from(cartridge: InkCartridge) -> Self {
        Item::InkCartridge(cartridge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cartridge_spend_saturates() {
        let mut cartridge = InkCartridge::new(2, 30);
        assert!(cartridge.has_ink_for(2));
        cartridge.spend(5);
        assert_eq!(cartridge.ink, 0);
        assert!(!cartridge.has_ink_for(1));
    }

    #[test]
    fn cartridge_level_capped_by_capacity() {
        assert_eq!(InkCartridge::new(50, 30).ink, 30);
    }
}
