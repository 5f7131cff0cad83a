//! Process-local record store.
//!
//! Same contract as the SQLite store, without durability. Used for previews,
//! tests, and callers that do not need records to outlive the process.

use crate::model::record::{
    merge_fields, next_updated_at, now_epoch_ms, strip_reserved, Fields, Record, RecordId,
};
use crate::model::schema::{CheckMode, SchemaRegistry};
use crate::repo::record_store::{BackendError, RecordStore, StoreError, StoreResult};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    next_seq: u64,
    /// Collection name -> (insertion sequence, record).
    records: BTreeMap<String, Vec<(u64, Record)>>,
}

/// Record store held entirely in memory behind a read/write lock.
#[derive(Default)]
pub struct MemoryRecordStore {
    state: RwLock<Collections>,
    schemas: SchemaRegistry,
}

impl MemoryRecordStore {
    pub fn new(schemas: SchemaRegistry) -> Self {
        Self {
            state: RwLock::default(),
            schemas,
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Collections>> {
        self.state
            .read()
            .map_err(|_| BackendError::Poisoned("memory store").into())
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Collections>> {
        self.state
            .write()
            .map_err(|_| BackendError::Poisoned("memory store").into())
    }
}

impl RecordStore for MemoryRecordStore {
    fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        let state = self.read()?;
        let Some(entries) = state.records.get(collection) else {
            return Ok(Vec::new());
        };

        let mut ordered: Vec<&(u64, Record)> = entries.iter().collect();
        ordered.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        Ok(ordered.into_iter().map(|(_, record)| record.clone()).collect())
    }

    fn get(&self, collection: &str, id: RecordId) -> StoreResult<Option<Record>> {
        let state = self.read()?;
        Ok(state.records.get(collection).and_then(|entries| {
            entries
                .iter()
                .find(|(_, record)| record.id == id)
                .map(|(_, record)| record.clone())
        }))
    }

    fn insert(&self, collection: &str, mut fields: Fields) -> StoreResult<Record> {
        strip_reserved(&mut fields);
        self.schemas.check(collection, &fields, CheckMode::Insert)?;

        let now = now_epoch_ms();
        let record = Record {
            id: Uuid::new_v4(),
            collection: collection.to_string(),
            fields,
            created_at: now,
            updated_at: now,
        };

        let mut state = self.write()?;
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .records
            .entry(collection.to_string())
            .or_default()
            .push((seq, record.clone()));
        Ok(record)
    }

    fn update(&self, collection: &str, id: RecordId, mut fields: Fields) -> StoreResult<Record> {
        strip_reserved(&mut fields);
        self.schemas.check(collection, &fields, CheckMode::Patch)?;

        let mut state = self.write()?;
        let record = state
            .records
            .get_mut(collection)
            .and_then(|entries| entries.iter_mut().find(|(_, record)| record.id == id))
            .map(|(_, record)| record)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        record.fields = merge_fields(&record.fields, fields);
        record.updated_at = next_updated_at(record.updated_at);
        Ok(record.clone())
    }

    fn remove(&self, collection: &str, id: RecordId) -> StoreResult<()> {
        let mut state = self.write()?;
        let entries = state
            .records
            .get_mut(collection)
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let before = entries.len();
        entries.retain(|(_, record)| record.id != id);
        if entries.len() == before {
            return Err(StoreError::not_found(collection, id));
        }
        Ok(())
    }
}
