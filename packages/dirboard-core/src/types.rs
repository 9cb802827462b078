use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tags::tag_hue;

/// A single Markdown file inside a column directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// `file://` URI of the card file. Unique within one rebuild.
    pub uri: String,
    /// Leaf file name, always ending in `.md` (any case).
    pub file_name: String,
    pub title: String,
    pub body: String,
    /// `body` rendered to HTML during the rebuild that produced this card.
    pub body_html: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// File creation time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Directory leaf name; doubles as display label and move target.
    pub name: String,
    pub cards: Vec<Card>,
}

/// Read projection of a board folder. Rebuilt wholesale, never patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }

    /// Find a card by its URI across all columns.
    pub fn find_card(&self, uri: &str) -> Option<(&Column, &Card)> {
        self.columns
            .iter()
            .find_map(|col| col.cards.iter().find(|c| c.uri == uri).map(|card| (col, card)))
    }

    /// Every distinct tag on the board mapped to its display hue.
    pub fn tag_hues(&self) -> BTreeMap<String, u16> {
        self.columns
            .iter()
            .flat_map(|col| col.cards.iter())
            .flat_map(|card| card.tags.iter())
            .map(|tag| (tag.clone(), tag_hue(tag)))
            .collect()
    }
}
