//! Editable page text.
//!
//! Each layout row belongs to a page location and carries a name, e.g. the
//! `Cover Tag Line` of the `Index Page`. Pages load every block for their
//! location at once and look names up while rendering.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Layout locations.
pub mod locations {
    pub const INDEX_PAGE: &str = "Index Page";
    pub const DESIGNS_PAGE: &str = "Designs Page";
    pub const CONTACT_CARD: &str = "Contact Card";
}

/// Block names within a location.
pub mod names {
    pub const COVER_TAG_LINE: &str = "Cover Tag Line";
    pub const FEATURED_HEADER: &str = "Featured Header";
    pub const FEATURED_BUTTONS: &str = "Featured Buttons";
    pub const DESIGNS_ALERT_HEADER: &str = "Designs Page Alert Header";
    pub const DESIGNS_ALERT_BUTTON: &str = "Designs Page Alert Button";
    pub const HEADER: &str = "Header";
    pub const BUTTONS: &str = "Buttons";
    pub const NAME: &str = "Name";
    pub const PHONE: &str = "Phone";
    pub const EMAIL: &str = "Email";
    pub const BUTTON: &str = "Button";
}

/// Content for one location, keyed by block name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlocks {
    location: String,
    blocks: HashMap<String, String>,
}

impl ContentBlocks {
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            blocks: HashMap::new(),
        }
    }

    /// Build from `(name, content)` pairs. Later duplicates win.
    #[must_use]
    pub fn from_pairs<I>(location: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            location: location.into(),
            blocks: pairs.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Content for `name`; empty when the block has not been created.
    #[must_use]
    pub fn get(&self, name: &str) -> &str {
        self.blocks.get(name).map_or("", String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.blocks.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_block_is_empty() {
        let blocks = ContentBlocks::from_pairs(
            locations::INDEX_PAGE,
            [(names::COVER_TAG_LINE.to_string(), "Handmade in Texas".to_string())],
        );

        assert_eq!(blocks.get(names::COVER_TAG_LINE), "Handmade in Texas");
        assert_eq!(blocks.get(names::FEATURED_HEADER), "");
        assert!(!blocks.contains(names::FEATURED_HEADER));
        assert_eq!(blocks.location(), "Index Page");
    }

    #[test]
    fn test_later_duplicates_win() {
        let blocks = ContentBlocks::from_pairs(
            locations::CONTACT_CARD,
            [
                ("Phone".to_string(), "old".to_string()),
                ("Phone".to_string(), "new".to_string()),
            ],
        );
        assert_eq!(blocks.get(names::PHONE), "new");
        assert_eq!(blocks.len(), 1);
    }
}
