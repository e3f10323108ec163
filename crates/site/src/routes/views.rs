//! Display data shared by several page templates.

use prosper_core::catalog::CatalogEntry;
use prosper_core::content::{ContentBlocks, names};

use crate::content;

/// Length of the caption under a product card.
const CARD_SUMMARY_CHARS: usize = 120;

/// The owner's contact card shown in the page footer.
#[derive(Debug, Clone, Default)]
pub struct ContactCard {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub button: String,
}

impl ContactCard {
    #[must_use]
    pub fn from_blocks(blocks: &ContentBlocks) -> Self {
        Self {
            name: blocks.get(names::NAME).to_owned(),
            phone: blocks.get(names::PHONE).to_owned(),
            email: blocks.get(names::EMAIL).to_owned(),
            button: blocks.get(names::BUTTON).to_owned(),
        }
    }
}

/// One product tile.
#[derive(Debug, Clone)]
pub struct ProductCard {
    pub name: String,
    pub image: String,
    pub summary: String,
}

impl From<&CatalogEntry> for ProductCard {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            name: entry.product_name.clone(),
            image: entry.location.clone(),
            summary: content::summary(&entry.description, CARD_SUMMARY_CHARS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prosper_core::content::locations;

    #[test]
    fn test_contact_card_missing_blocks_are_blank() {
        let blocks = ContentBlocks::from_pairs(
            locations::CONTACT_CARD,
            [("Phone".to_string(), "856-577-4087".to_string())],
        );
        let card = ContactCard::from_blocks(&blocks);
        assert_eq!(card.phone, "856-577-4087");
        assert!(card.name.is_empty());
    }
}
