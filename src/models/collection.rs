//! Collection entry model for the personal idiom library.

use serde::{Deserialize, Serialize};

use super::IdiomRecord;

/// User-assigned recall confidence for a collected idiom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Familiarity {
    #[default]
    Unfamiliar,
    Neutral,
    Familiar,
}

impl Familiarity {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "unfamiliar" => Some(Familiarity::Unfamiliar),
            "neutral" => Some(Familiarity::Neutral),
            "familiar" => Some(Familiarity::Familiar),
            _ => None,
        }
    }
}

/// An idiom in the user's personal collection.
///
/// `id` is the catalog id when the word matched the catalog, otherwise a generated
/// `custom_` id. No two entries share an id or a word.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
    pub id: String,
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinyin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Creation time in epoch milliseconds
    pub added_at: i64,
    #[serde(default)]
    pub familiarity: Familiarity,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_custom: bool,
}

/// Candidate entry for `CollectionStore::add`. Unset fields get defaults on insert.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewEntry {
    pub id: String,
    pub word: String,
    #[serde(default)]
    pub pinyin: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub added_at: Option<i64>,
    #[serde(default)]
    pub familiarity: Option<Familiarity>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_custom: bool,
}

impl NewEntry {
    pub fn new(id: impl Into<String>, word: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            ..Default::default()
        }
    }

    /// Candidate linked to a catalog record, snapshotting its pinyin and definition.
    pub fn from_catalog(idiom: &IdiomRecord) -> Self {
        Self {
            id: idiom.id.clone(),
            word: idiom.word.clone(),
            pinyin: Some(idiom.pinyin.clone()),
            definition: Some(idiom.definition.clone()),
            ..Default::default()
        }
    }
}

/// Partial update for a collection entry. `None` fields are left untouched.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default)]
    pub familiarity: Option<Familiarity>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub pinyin: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        self.familiarity.is_none()
            && self.tags.is_none()
            && self.pinyin.is_none()
            && self.definition.is_none()
    }
}

/// Counts of collected idioms per familiarity state.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total: usize,
    pub unfamiliar: usize,
    pub neutral: usize,
    pub familiar: usize,
}

/// A collection entry together with its catalog record, when it has one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEntry {
    #[serde(flatten)]
    pub entry: CollectionEntry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idiom: Option<IdiomRecord>,
}
