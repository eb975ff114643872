//! Reference catalog of curated idioms and discrimination groups.
//!
//! Read-only after construction. Lookups by id and by exact word are indexed.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::AppError;
use crate::models::{DiscriminationGroup, DiscriminationView, IdiomRecord};

const BUNDLED_IDIOMS: &str = include_str!("../../data/idioms.json");
const BUNDLED_DISCRIMINATIONS: &str = include_str!("../../data/discriminations.json");

/// Immutable in-memory catalog.
#[derive(Debug)]
pub struct Catalog {
    idioms: Vec<IdiomRecord>,
    by_id: HashMap<String, usize>,
    by_word: HashMap<String, usize>,
    discriminations: Vec<DiscriminationGroup>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids or words.
    pub fn new(
        idioms: Vec<IdiomRecord>,
        discriminations: Vec<DiscriminationGroup>,
    ) -> Result<Self, AppError> {
        let mut by_id = HashMap::with_capacity(idioms.len());
        let mut by_word = HashMap::with_capacity(idioms.len());

        for (pos, idiom) in idioms.iter().enumerate() {
            if by_id.insert(idiom.id.clone(), pos).is_some() {
                return Err(AppError::Catalog(format!("Duplicate idiom id {}", idiom.id)));
            }
            if by_word.insert(idiom.word.clone(), pos).is_some() {
                return Err(AppError::Catalog(format!(
                    "Duplicate idiom word {}",
                    idiom.word
                )));
            }
        }

        // Dangling references are tolerated and resolved by omission at display time.
        for group in &discriminations {
            for id in &group.idiom_ids {
                if !by_id.contains_key(id) {
                    tracing::warn!(
                        "Discrimination group {} references unknown idiom {}",
                        group.id,
                        id
                    );
                }
            }
        }

        Ok(Self {
            idioms,
            by_id,
            by_word,
            discriminations,
        })
    }

    /// Parse a catalog from its two JSON documents.
    pub fn from_json(idioms: &str, discriminations: &str) -> Result<Self, AppError> {
        let idioms: Vec<IdiomRecord> = serde_json::from_str(idioms)
            .map_err(|e| AppError::Catalog(format!("Invalid idiom data: {}", e)))?;
        let discriminations: Vec<DiscriminationGroup> = serde_json::from_str(discriminations)
            .map_err(|e| AppError::Catalog(format!("Invalid discrimination data: {}", e)))?;
        Self::new(idioms, discriminations)
    }

    /// The catalog shipped inside the binary.
    pub fn bundled() -> Result<Self, AppError> {
        Self::from_json(BUNDLED_IDIOMS, BUNDLED_DISCRIMINATIONS)
    }

    /// Load `idioms.json` and `discriminations.json` from a directory.
    pub fn open(dir: &Path) -> Result<Self, AppError> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path)
                .map_err(|e| AppError::Catalog(format!("Failed to read {:?}: {}", path, e)))
        };
        Self::from_json(&read("idioms.json")?, &read("discriminations.json")?)
    }

    /// Open the catalog directory when one is configured, otherwise use the bundled data.
    pub fn load(dir: Option<&Path>) -> Result<Self, AppError> {
        let catalog = match dir {
            Some(dir) => Self::open(dir)?,
            None => Self::bundled()?,
        };
        tracing::info!(
            "Catalog loaded with {} idioms and {} discrimination groups",
            catalog.idioms().len(),
            catalog.all_discrimination_groups().len()
        );
        Ok(catalog)
    }

    /// All idioms in catalog order.
    pub fn idioms(&self) -> &[IdiomRecord] {
        &self.idioms
    }

    pub fn find_by_id(&self, id: &str) -> Option<&IdiomRecord> {
        self.by_id.get(id).map(|&pos| &self.idioms[pos])
    }

    pub fn find_by_word(&self, word: &str) -> Option<&IdiomRecord> {
        self.by_word.get(word).map(|&pos| &self.idioms[pos])
    }

    pub fn all_discrimination_groups(&self) -> &[DiscriminationGroup] {
        &self.discriminations
    }

    /// First discrimination group contrasting the given idiom.
    pub fn find_discrimination_for_idiom(&self, id: &str) -> Option<&DiscriminationGroup> {
        self.discriminations.iter().find(|group| group.involves(id))
    }

    pub fn discrimination_view(&self, group: &DiscriminationGroup) -> DiscriminationView {
        let [first, second] = &group.idiom_ids;
        DiscriminationView {
            words: group
                .title_words()
                .map(|(a, b)| [a.to_string(), b.to_string()]),
            group: group.clone(),
            first: self.find_by_id(first).cloned(),
            second: self.find_by_id(second).cloned(),
        }
    }

    /// Substring search over word, pinyin (case-insensitive) and definition.
    ///
    /// A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&IdiomRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.idioms.iter().collect();
        }

        let lower = query.to_lowercase();
        self.idioms
            .iter()
            .filter(|idiom| {
                idiom.word.contains(query)
                    || idiom.pinyin.to_lowercase().contains(&lower)
                    || idiom.definition.contains(query)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Emotion;

    fn idiom(id: &str, word: &str) -> IdiomRecord {
        IdiomRecord {
            id: id.to_string(),
            word: word.to_string(),
            pinyin: "pin yin".to_string(),
            definition: "释义".to_string(),
            source: None,
            emotion: Emotion::Neutral,
            usage: "用法".to_string(),
            misuse_warning: None,
            examples: Default::default(),
            tags: vec![],
        }
    }

    #[test]
    fn test_bundled_catalog_lookups() {
        let catalog = Catalog::bundled().unwrap();

        assert_eq!(catalog.idioms().len(), 10);
        assert_eq!(catalog.find_by_id("cy_003").unwrap().word, "空穴来风");
        assert_eq!(catalog.find_by_word("首屈一指").unwrap().id, "cy_002");
        assert!(catalog.find_by_word("全新成语").is_none());
        assert!(catalog.find_by_id("cy_999").is_none());
        assert_eq!(catalog.all_discrimination_groups().len(), 2);
    }

    #[test]
    fn test_find_discrimination_for_idiom() {
        let catalog = Catalog::bundled().unwrap();

        let group = catalog.find_discrimination_for_idiom("cy_010").unwrap();
        assert_eq!(group.id, "diff_001");
        assert_eq!(group.title_words(), Some(("不以为然", "不以为意")));
        assert!(catalog.find_discrimination_for_idiom("cy_005").is_none());
    }

    #[test]
    fn test_search_matches_word_pinyin_and_definition() {
        let catalog = Catalog::bundled().unwrap();

        assert_eq!(catalog.search("  ").len(), 10);

        let by_word: Vec<_> = catalog.search("首").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(by_word, vec!["cy_001", "cy_002"]);

        let by_pinyin: Vec<_> = catalog.search("KŌNG").iter().map(|i| i.id.as_str()).collect();
        assert_eq!(by_pinyin, vec!["cy_003"]);

        let by_definition: Vec<_> = catalog
            .search("没有根据的说法")
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(by_definition, vec!["cy_004"]);

        assert!(catalog.search("不存在的词").is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids_and_words() {
        let err = Catalog::new(vec![idiom("a", "甲"), idiom("a", "乙")], vec![]).unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));

        let err = Catalog::new(vec![idiom("a", "甲"), idiom("b", "甲")], vec![]).unwrap_err();
        assert!(matches!(err, AppError::Catalog(_)));
    }

    #[test]
    fn test_dangling_reference_resolves_by_omission() {
        let group = DiscriminationGroup {
            id: "diff_x".to_string(),
            idiom_ids: ["a".to_string(), "missing".to_string()],
            title: "甲 vs 丙".to_string(),
            dimensions: vec![],
            summary: String::new(),
        };
        let catalog = Catalog::new(vec![idiom("a", "甲")], vec![group]).unwrap();

        let view = catalog.discrimination_view(&catalog.all_discrimination_groups()[0]);
        assert_eq!(view.first.unwrap().word, "甲");
        assert!(view.second.is_none());
        assert_eq!(view.words, Some(["甲".to_string(), "丙".to_string()]));
    }

    #[test]
    fn test_invalid_json_is_catalog_error() {
        let err = Catalog::from_json("not json", "[]").unwrap_err();
        assert_eq!(err.error_code(), "CATALOG_ERROR");
    }
}
