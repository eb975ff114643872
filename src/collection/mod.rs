//! Personal idiom collection.
//!
//! The store is the only owner of the collected entries. Every successful mutation
//! rewrites the full snapshot into the collection slot; the in-memory list is updated
//! first and is never rolled back when the write fails.

use std::sync::Arc;

use chrono::Utc;

use crate::catalog::Catalog;
use crate::db::SlotStorage;
use crate::errors::AppError;
use crate::models::{
    CollectionEntry, CollectionStats, EntryPatch, Familiarity, NewEntry, ResolvedEntry,
};
use crate::notify::{Notice, Notifier};

/// Storage slot holding the serialized collection.
pub const COLLECTION_SLOT: &str = "chengyu_app_collection";

const MSG_ADDED: &str = "已添加到个人库";
const MSG_DUPLICATE: &str = "该成语已在库中";
const MSG_REMOVED: &str = "已移除";
const MSG_SAVE_FAILED: &str = "保存失败，更改将在下次操作时重试";

/// Collected idioms, most recently added first.
pub struct CollectionStore {
    storage: Arc<dyn SlotStorage>,
    notifier: Arc<dyn Notifier>,
    entries: Vec<CollectionEntry>,
    /// Set when the last snapshot write failed
    dirty: bool,
}

impl CollectionStore {
    /// Restore the collection from storage.
    ///
    /// A missing, unreadable or unparseable slot yields an empty collection.
    pub async fn load(storage: Arc<dyn SlotStorage>, notifier: Arc<dyn Notifier>) -> Self {
        let entries = match storage.read_slot(COLLECTION_SLOT).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CollectionEntry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Discarding unparseable collection snapshot: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Collection storage unavailable, starting empty: {}", e);
                Vec::new()
            }
        };

        tracing::info!("Collection loaded with {} entries", entries.len());

        Self {
            storage,
            notifier,
            entries,
            dirty: false,
        }
    }

    pub fn entries(&self) -> &[CollectionEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&CollectionEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn contains_word(&self, word: &str) -> bool {
        self.entries.iter().any(|entry| entry.word == word)
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Whether in-memory state is ahead of the persisted snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Insert a new entry at the front.
    ///
    /// Fails with `Duplicate` and leaves the collection untouched when an entry with
    /// the same id or the same word exists.
    pub async fn add(&mut self, candidate: NewEntry) -> Result<CollectionEntry, AppError> {
        if self
            .entries
            .iter()
            .any(|entry| entry.id == candidate.id || entry.word == candidate.word)
        {
            tracing::debug!("Rejected duplicate entry {} ({})", candidate.word, candidate.id);
            self.notifier.notify(Notice::error(MSG_DUPLICATE));
            return Err(AppError::Duplicate(MSG_DUPLICATE.to_string()));
        }

        let entry = CollectionEntry {
            id: candidate.id,
            word: candidate.word,
            pinyin: candidate.pinyin,
            definition: candidate.definition,
            added_at: candidate
                .added_at
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            familiarity: candidate.familiarity.unwrap_or_default(),
            tags: candidate.tags.unwrap_or_default(),
            is_custom: candidate.is_custom,
        };

        self.entries.insert(0, entry.clone());
        self.persist().await;

        tracing::info!("Collected {} ({})", entry.word, entry.id);
        self.notifier.notify(Notice::success(MSG_ADDED));
        Ok(entry)
    }

    /// Remove the entry with the given id. Returns whether anything was removed.
    pub async fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);

        if self.entries.len() == before {
            tracing::debug!("Remove of unknown entry {} ignored", id);
            return false;
        }

        self.persist().await;
        self.notifier.notify(Notice::success(MSG_REMOVED));
        true
    }

    /// Merge the set fields of `patch` into the entry. Returns whether it was found.
    pub async fn update(&mut self, id: &str, patch: EntryPatch) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            tracing::debug!("Update of unknown entry {} ignored", id);
            return false;
        };

        if let Some(familiarity) = patch.familiarity {
            entry.familiarity = familiarity;
        }
        if let Some(tags) = patch.tags {
            entry.tags = tags;
        }
        if let Some(pinyin) = patch.pinyin {
            entry.pinyin = Some(pinyin);
        }
        if let Some(definition) = patch.definition {
            entry.definition = Some(definition);
        }

        self.persist().await;
        true
    }

    /// Retry a failed snapshot write.
    pub async fn flush(&mut self) -> Result<(), AppError> {
        if !self.dirty {
            return Ok(());
        }
        self.write_snapshot().await?;
        self.dirty = false;
        tracing::info!("Pending collection changes flushed");
        Ok(())
    }

    /// Entries whose word contains `query`, optionally restricted to one familiarity state.
    pub fn filter(&self, query: &str, familiarity: Option<Familiarity>) -> Vec<&CollectionEntry> {
        let query = query.trim();
        self.entries
            .iter()
            .filter(|entry| entry.word.contains(query))
            .filter(|entry| familiarity.map_or(true, |f| entry.familiarity == f))
            .collect()
    }

    pub fn stats(&self) -> CollectionStats {
        self.entries
            .iter()
            .fold(CollectionStats::default(), |mut stats, entry| {
                stats.total += 1;
                match entry.familiarity {
                    Familiarity::Unfamiliar => stats.unfamiliar += 1,
                    Familiarity::Neutral => stats.neutral += 1,
                    Familiarity::Familiar => stats.familiar += 1,
                }
                stats
            })
    }

    /// Attach the catalog record to a non-custom entry whose id still resolves.
    pub fn resolve(entry: &CollectionEntry, catalog: &Catalog) -> ResolvedEntry {
        let idiom = if entry.is_custom {
            None
        } else {
            catalog.find_by_id(&entry.id).cloned()
        };
        ResolvedEntry {
            entry: entry.clone(),
            idiom,
        }
    }

    async fn persist(&mut self) {
        match self.write_snapshot().await {
            Ok(()) => {
                if self.dirty {
                    tracing::info!("Collection snapshot back in sync");
                }
                self.dirty = false;
            }
            Err(e) => {
                tracing::error!("Failed to persist collection: {}", e);
                self.dirty = true;
                self.notifier.notify(Notice::error(MSG_SAVE_FAILED));
            }
        }
    }

    async fn write_snapshot(&self) -> Result<(), AppError> {
        let snapshot = serde_json::to_string(&self.entries)
            .map_err(|e| AppError::Internal(format!("Failed to serialize collection: {}", e)))?;
        self.storage.write_slot(COLLECTION_SLOT, &snapshot).await
    }
}
