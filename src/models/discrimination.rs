//! Discrimination group model: a curated pair of commonly confused idioms.

use serde::{Deserialize, Serialize};

use super::IdiomRecord;

/// One contrast row of a discrimination group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminationDimension {
    pub label: String,
    /// Value for the first idiom of the pair
    pub item_a: String,
    /// Value for the second idiom of the pair
    pub item_b: String,
}

/// A discrimination group contrasting two idioms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminationGroup {
    pub id: String,
    pub idiom_ids: [String; 2],
    pub title: String,
    pub dimensions: Vec<DiscriminationDimension>,
    pub summary: String,
}

impl DiscriminationGroup {
    pub fn involves(&self, idiom_id: &str) -> bool {
        self.idiom_ids.iter().any(|id| id == idiom_id)
    }

    /// The two words named by a title of the form "A vs B".
    pub fn title_words(&self) -> Option<(&str, &str)> {
        let (a, b) = self.title.split_once(" vs ")?;
        Some((a.trim(), b.trim()))
    }
}

/// A discrimination group with its idioms resolved for display.
///
/// Either idiom is `None` when the group references an id the catalog does not know.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminationView {
    pub group: DiscriminationGroup,
    /// The two words named in the title, when it has the "A vs B" form
    pub words: Option<[String; 2]>,
    pub first: Option<IdiomRecord>,
    pub second: Option<IdiomRecord>,
}
