//! History repository for QR Nexus.
//!
//! Implements `HistoryManagerTrait` over one of the two history lists
//! (scanned, generated). Each list is stored as a single JSON array under a
//! fixed key of a [`KeyValueStore`]; every mutation reads the whole list,
//! changes it in memory and writes it back in one `set`.
//!
//! There is no locking or versioning: two mutations of the same list that
//! interleave lose the earlier write. The app drives these operations
//! sequentially from a single UI context.

use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::database::KeyValueStore;
use crate::services::payload::classify;
use crate::types::errors::HistoryError;
use crate::types::history::{HistoryList, HistoryRecord, RecordKind, MAX_HISTORY};

/// Trait defining history list operations.
pub trait HistoryManagerTrait {
    fn append(&self, payload: &str, kind: Option<RecordKind>) -> Result<String, HistoryError>;
    fn list(&self) -> Result<Vec<HistoryRecord>, HistoryError>;
    fn list_or_empty(&self) -> Vec<HistoryRecord>;
    fn list_pinned(&self) -> Result<Vec<HistoryRecord>, HistoryError>;
    fn get(&self, id: &str) -> Result<Option<HistoryRecord>, HistoryError>;
    fn remove(&self, id: &str) -> Result<(), HistoryError>;
    fn toggle_favorite(&self, id: &str) -> Result<Option<bool>, HistoryError>;
    fn clear(&self) -> Result<(), HistoryError>;
}

/// Repository for one history list, borrowing the store it persists to.
pub struct HistoryManager<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    list: HistoryList,
}

impl<'a, S: KeyValueStore + ?Sized> HistoryManager<'a, S> {
    /// Creates a repository for `list` backed by `store`.
    pub fn new(store: &'a S, list: HistoryList) -> Self {
        Self { store, list }
    }

    /// Repository over the scanned list.
    pub fn scans(store: &'a S) -> Self {
        Self::new(store, HistoryList::Scanned)
    }

    /// Repository over the generated list.
    pub fn generated(store: &'a S) -> Self {
        Self::new(store, HistoryList::Generated)
    }

    pub fn history_list(&self) -> HistoryList {
        self.list
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Millisecond timestamp followed by a short random suffix.
    fn new_id(created_at: i64) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}{}", created_at, &suffix[..5])
    }

    fn write(&self, records: &[HistoryRecord]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(records)
            .map_err(|e| HistoryError::Serialization(e.to_string()))?;
        self.store.set(self.list.storage_key(), &json)?;
        Ok(())
    }
}

impl<'a, S: KeyValueStore + ?Sized> HistoryManagerTrait for HistoryManager<'a, S> {
    /// Prepends a record and returns its id.
    ///
    /// `kind` of `None` classifies the payload. When `payload` equals the
    /// newest record's payload nothing is written and the existing id is
    /// returned. The list is truncated to the newest `MAX_HISTORY` records;
    /// favorites are evicted like any other record.
    fn append(&self, payload: &str, kind: Option<RecordKind>) -> Result<String, HistoryError> {
        let kind = kind.unwrap_or_else(|| classify(payload));
        if !self.list.accepts(kind) {
            return Err(HistoryError::InvalidKind {
                list: self.list.to_string(),
                kind: kind.to_string(),
            });
        }

        let mut records = self.list()?;
        if let Some(head) = records.first() {
            if head.payload == payload {
                log::debug!("{} history: skipping duplicate of {}", self.list, head.id);
                return Ok(head.id.clone());
            }
        }

        let created_at = Self::now();
        let record = HistoryRecord {
            id: Self::new_id(created_at),
            payload: payload.to_string(),
            kind,
            created_at,
            favorite: false,
        };
        let id = record.id.clone();

        records.insert(0, record);
        records.truncate(MAX_HISTORY);
        self.write(&records)?;

        log::debug!("{} history: appended {} ({})", self.list, id, kind);
        Ok(id)
    }

    /// Reads the whole list, newest first. An absent key is an empty list.
    fn list(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        match self.store.get(self.list.storage_key())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Like `list`, but logs any failure and returns an empty list.
    fn list_or_empty(&self) -> Vec<HistoryRecord> {
        self.list().unwrap_or_else(|e| {
            log::warn!("{} history unreadable, showing empty list: {}", self.list, e);
            Vec::new()
        })
    }

    /// Favorites first, then the rest; stored order within each group.
    fn list_pinned(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let (mut pinned, rest): (Vec<_>, Vec<_>) =
            self.list()?.into_iter().partition(|r| r.favorite);
        pinned.extend(rest);
        Ok(pinned)
    }

    fn get(&self, id: &str) -> Result<Option<HistoryRecord>, HistoryError> {
        Ok(self.list()?.into_iter().find(|r| r.id == id))
    }

    /// Removes the record with `id`. Unknown ids are ignored.
    fn remove(&self, id: &str) -> Result<(), HistoryError> {
        let mut records = self.list()?;
        records.retain(|r| r.id != id);
        self.write(&records)
    }

    /// Flips the favorite flag of `id` and returns the new value.
    ///
    /// For an unknown id the list is written back unchanged and `None` is
    /// returned.
    fn toggle_favorite(&self, id: &str) -> Result<Option<bool>, HistoryError> {
        let mut records = self.list()?;
        let mut flag = None;
        if let Some(record) = records.iter_mut().find(|r| r.id == id) {
            record.favorite = !record.favorite;
            flag = Some(record.favorite);
        }
        self.write(&records)?;
        Ok(flag)
    }

    /// Deletes the whole list.
    fn clear(&self) -> Result<(), HistoryError> {
        self.store.remove(self.list.storage_key())?;
        log::debug!("{} history cleared", self.list);
        Ok(())
    }
}
