//! Idiom model for the reference catalog.

use serde::{Deserialize, Serialize};

/// Emotional valence (感情色彩) of an idiom.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Commendatory,
    Derogatory,
    Neutral,
}

impl Emotion {
    /// Display label used in comparison tables.
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Commendatory => "褒义",
            Emotion::Derogatory => "贬义",
            Emotion::Neutral => "中性",
        }
    }
}

/// Example sentences showing correct and incorrect usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IdiomExamples {
    #[serde(default)]
    pub correct: Vec<String>,
    #[serde(default)]
    pub incorrect: Vec<String>,
}

/// A canonical idiom record. Loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IdiomRecord {
    pub id: String,
    pub word: String,
    pub pinyin: String,
    pub definition: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub emotion: Emotion,
    pub usage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub misuse_warning: Option<String>,
    #[serde(default)]
    pub examples: IdiomExamples,
    #[serde(default)]
    pub tags: Vec<String>,
}
