//! Bulk import of pasted idiom lists.
//!
//! Import is preview-then-commit: `parse` classifies every line without touching the
//! collection, `commit` adds the ready lines. Lines are classified against the
//! collection as it was before the paste, so a word repeated within one paste is
//! `ready` twice and the second add is rejected by the store's own duplicate check.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::collection::CollectionStore;
use crate::errors::AppError;
use crate::models::NewEntry;
use crate::notify::Notice;

/// Where a ready line's entry comes from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum ReadySource {
    /// Word matches the catalog idiom with this id
    #[serde(rename_all = "camelCase")]
    Linked { idiom_id: String },
    /// Word is unknown to the catalog and becomes a custom entry
    Custom,
}

/// How a pasted line will be imported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LineStatus {
    /// Word is already collected; skipped on commit
    Duplicate,
    Ready(ReadySource),
}

impl LineStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LineStatus::Ready(_))
    }
}

/// One classified input line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImportLine {
    pub word: String,
    #[serde(flatten)]
    pub status: LineStatus,
}

/// Preview of an import, in input order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImportPlan {
    pub lines: Vec<ImportLine>,
}

impl ImportPlan {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn ready_count(&self) -> usize {
        self.lines.iter().filter(|line| line.status.is_ready()).count()
    }

    pub fn duplicate_count(&self) -> usize {
        self.lines.len() - self.ready_count()
    }
}

/// Opaque id for an entry with no catalog record.
pub fn custom_id() -> String {
    format!("custom_{}", Uuid::new_v4().simple())
}

/// Split `text` into trimmed non-empty lines and classify each one.
///
/// Already collected words are `Duplicate`; otherwise a line is `Ready`, linked when
/// the word exactly matches a catalog idiom and custom when it does not.
pub fn parse(text: &str, collection: &CollectionStore, catalog: &Catalog) -> ImportPlan {
    let lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|word| {
            let status = if collection.contains_word(word) {
                LineStatus::Duplicate
            } else if let Some(idiom) = catalog.find_by_word(word) {
                LineStatus::Ready(ReadySource::Linked {
                    idiom_id: idiom.id.clone(),
                })
            } else {
                LineStatus::Ready(ReadySource::Custom)
            };
            ImportLine {
                word: word.to_string(),
                status,
            }
        })
        .collect();

    ImportPlan { lines }
}

/// Entry to add for a ready word. Id, pinyin and definition come only from the catalog.
fn candidate_for(word: String, catalog: &Catalog) -> NewEntry {
    match catalog.find_by_word(&word) {
        Some(idiom) => NewEntry::from_catalog(idiom),
        None => NewEntry {
            is_custom: true,
            ..NewEntry::new(custom_id(), word)
        },
    }
}

/// Add every ready line of the plan, in order. Returns the number of entries added.
///
/// Each ready word is looked up in the catalog again, so the linkage carried by the
/// plan is never trusted. Lines the store rejects as duplicates are skipped.
pub async fn commit(
    plan: ImportPlan,
    collection: &mut CollectionStore,
    catalog: &Catalog,
) -> Result<usize, AppError> {
    if plan.is_empty() {
        return Ok(0);
    }

    let mut imported = 0;

    for line in plan.lines {
        let LineStatus::Ready(source) = &line.status else {
            continue;
        };

        let candidate = candidate_for(line.word.clone(), catalog);
        if let ReadySource::Linked { idiom_id } = source {
            if *idiom_id != candidate.id {
                tracing::debug!(
                    "Import of {} relinked from {} to {}",
                    line.word,
                    idiom_id,
                    candidate.id
                );
            }
        }

        match collection.add(candidate).await {
            Ok(_) => imported += 1,
            Err(AppError::Duplicate(_)) => {
                tracing::debug!("Import skipped {}: already collected", line.word);
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!("Imported {} idioms", imported);
    collection
        .notifier()
        .notify(Notice::success(format!("成功导入 {} 个成语", imported)));
    Ok(imported)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::db::MemorySlots;
    use crate::notify::RecordingNotifier;

    async fn store_with(words: &[(&str, &str)]) -> CollectionStore {
        let mut store = CollectionStore::load(
            Arc::new(MemorySlots::default()),
            Arc::new(RecordingNotifier::default()),
        )
        .await;
        for (id, word) in words {
            store.add(NewEntry::new(*id, *word)).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_parse_classifies_in_input_order() {
        let catalog = Catalog::bundled().unwrap();
        let store = store_with(&[("cy_002", "首屈一指")]).await;

        let plan = parse("首屈一指\n空穴来风\n全新成语", &store, &catalog);

        assert_eq!(plan.lines.len(), 3);
        assert_eq!(plan.lines[0].word, "首屈一指");
        assert_eq!(plan.lines[0].status, LineStatus::Duplicate);
        assert_eq!(
            plan.lines[1].status,
            LineStatus::Ready(ReadySource::Linked {
                idiom_id: "cy_003".to_string()
            })
        );
        assert_eq!(plan.lines[2].status, LineStatus::Ready(ReadySource::Custom));
        assert_eq!(plan.ready_count(), 2);
        assert_eq!(plan.duplicate_count(), 1);
        // Preview never mutates the collection
        assert_eq!(store.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_parse_trims_and_skips_blank_lines() {
        let catalog = Catalog::bundled().unwrap();
        let store = store_with(&[]).await;

        let plan = parse("\n  无稽之谈  \r\n\n\t\n金碧辉煌\n", &store, &catalog);
        let words: Vec<_> = plan.lines.iter().map(|l| l.word.as_str()).collect();
        assert_eq!(words, vec!["无稽之谈", "金碧辉煌"]);

        assert!(parse("   \n\n", &store, &catalog).is_empty());
    }

    #[tokio::test]
    async fn test_commit_adds_ready_lines_once() {
        let catalog = Catalog::bundled().unwrap();
        let mut store = store_with(&[("cy_002", "首屈一指")]).await;

        let plan = parse("首屈一指\n空穴来风\n全新成语", &store, &catalog);
        assert_eq!(commit(plan.clone(), &mut store, &catalog).await.unwrap(), 2);
        assert_eq!(store.entries().len(), 3);

        let linked = store.get("cy_003").unwrap();
        assert!(!linked.is_custom);
        assert_eq!(linked.pinyin.as_deref(), Some("kōng xué lái fēng"));
        assert!(linked.definition.is_some());

        let custom = store.entries().iter().find(|e| e.word == "全新成语").unwrap();
        assert!(custom.is_custom);
        assert!(custom.id.starts_with("custom_"));
        assert!(custom.pinyin.is_none() && custom.definition.is_none());

        // Replaying the same plan adds nothing
        assert_eq!(commit(plan, &mut store, &catalog).await.unwrap(), 0);
        assert_eq!(store.entries().len(), 3);
        assert_eq!(
            parse("空穴来风\n全新成语", &store, &catalog).duplicate_count(),
            2
        );
    }

    #[tokio::test]
    async fn test_repeated_word_in_one_paste_is_added_once() {
        let catalog = Catalog::bundled().unwrap();
        let mut store = store_with(&[]).await;

        let plan = parse("自创词\n自创词", &store, &catalog);
        assert_eq!(plan.ready_count(), 2);

        assert_eq!(commit(plan, &mut store, &catalog).await.unwrap(), 1);
        assert_eq!(store.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_commit_tolerates_concurrent_add() {
        let catalog = Catalog::bundled().unwrap();
        let mut store = store_with(&[]).await;

        let plan = parse("美轮美奂\n金碧辉煌", &store, &catalog);
        store
            .add(NewEntry::from_catalog(catalog.find_by_word("美轮美奂").unwrap()))
            .await
            .unwrap();

        assert_eq!(commit(plan, &mut store, &catalog).await.unwrap(), 1);
        assert_eq!(store.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_commit_takes_linkage_from_catalog_not_plan() {
        let catalog = Catalog::bundled().unwrap();
        let mut store = store_with(&[]).await;

        // A client-edited plan pointing an unknown word and a known word at the wrong ids
        let plan: ImportPlan = serde_json::from_value(serde_json::json!({
            "lines": [
                { "word": "伪造词", "status": "ready", "source": "linked", "idiomId": "cy_003" },
                { "word": "空穴来风", "status": "ready", "source": "linked", "idiomId": "cy_999" }
            ]
        }))
        .unwrap();

        assert_eq!(commit(plan, &mut store, &catalog).await.unwrap(), 2);

        let forged = store.entries().iter().find(|e| e.word == "伪造词").unwrap();
        assert!(forged.is_custom);
        assert!(forged.id.starts_with("custom_"));
        assert!(forged.pinyin.is_none() && forged.definition.is_none());

        let relinked = store.get("cy_003").unwrap();
        assert_eq!(relinked.word, "空穴来风");
        assert!(!relinked.is_custom);
        assert_eq!(relinked.pinyin.as_deref(), Some("kōng xué lái fēng"));
        assert!(store.get("cy_999").is_none());
    }

    #[tokio::test]
    async fn test_commit_links_word_marked_custom_when_catalog_knows_it() {
        let catalog = Catalog::bundled().unwrap();
        let mut store = store_with(&[]).await;

        let plan = ImportPlan {
            lines: vec![ImportLine {
                word: "空穴来风".to_string(),
                status: LineStatus::Ready(ReadySource::Custom),
            }],
        };

        assert_eq!(commit(plan, &mut store, &catalog).await.unwrap(), 1);
        assert!(!store.get("cy_003").unwrap().is_custom);
    }

    #[test]
    fn test_plan_wire_format() {
        let plan = ImportPlan {
            lines: vec![
                ImportLine {
                    word: "甲".to_string(),
                    status: LineStatus::Duplicate,
                },
                ImportLine {
                    word: "乙".to_string(),
                    status: LineStatus::Ready(ReadySource::Linked {
                        idiom_id: "cy_001".to_string(),
                    }),
                },
                ImportLine {
                    word: "丙".to_string(),
                    status: LineStatus::Ready(ReadySource::Custom),
                },
            ],
        };

        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "lines": [
                    { "word": "甲", "status": "duplicate" },
                    { "word": "乙", "status": "ready", "source": "linked", "idiomId": "cy_001" },
                    { "word": "丙", "status": "ready", "source": "custom" }
                ]
            })
        );
        let back: ImportPlan = serde_json::from_value(value).unwrap();
        assert_eq!(back, plan);
    }
}
