//! SQLite-backed record store.
//!
//! # Responsibility
//! - Persist records as JSON field payloads in the `records` table.
//! - Enforce registered collection shapes before every write.
//!
//! # Invariants
//! - Connections must be fully migrated (`try_new` checks this).
//! - Read-modify-write in `update` runs inside one transaction.
//! - Undecodable rows surface as `BackendError::MalformedRecord`.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::record::{
    merge_fields, next_updated_at, now_epoch_ms, strip_reserved, Fields, Record, RecordId,
};
use crate::model::schema::{CheckMode, SchemaRegistry};
use crate::repo::record_store::{BackendError, RecordStore, StoreError, StoreResult};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    collection,
    fields,
    created_at,
    updated_at
FROM records";

/// Record store over a borrowed, migrated SQLite connection.
pub struct SqliteRecordStore<'conn> {
    conn: &'conn Connection,
    schemas: SchemaRegistry,
}

impl<'conn> SqliteRecordStore<'conn> {
    /// Wraps `conn` after checking it carries the latest schema.
    pub fn try_new(conn: &'conn Connection, schemas: SchemaRegistry) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(DbError::UninitializedConnection {
                expected_version,
                actual_version,
            }
            .into());
        }
        Ok(Self { conn, schemas })
    }

    pub fn schemas(&self) -> &SchemaRegistry {
        &self.schemas
    }

    fn select_one(&self, collection: &str, id: RecordId) -> StoreResult<Option<Record>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{RECORD_SELECT_SQL} WHERE collection = ?1 AND id = ?2;"
        ))?;
        let raw = stmt
            .query_row(params![collection, id.to_string()], RawRecord::from_row)
            .optional()?;
        raw.map(RawRecord::decode).transpose()
    }
}

impl RecordStore for SqliteRecordStore<'_> {
    fn list(&self, collection: &str) -> StoreResult<Vec<Record>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{RECORD_SELECT_SQL}
             WHERE collection = ?1
             ORDER BY created_at DESC, seq DESC;"
        ))?;
        let rows = stmt.query_map([collection], RawRecord::from_row)?;

        let mut records = Vec::new();
        for raw in rows {
            records.push(raw?.decode()?);
        }
        debug!(
            "event=record_list module=store status=ok collection={collection} count={}",
            records.len()
        );
        Ok(records)
    }

    fn get(&self, collection: &str, id: RecordId) -> StoreResult<Option<Record>> {
        self.select_one(collection, id)
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
        let payload = encode_fields(&record.fields)?;

        self.conn
            .execute(
                "INSERT INTO records (collection, id, fields, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    record.collection,
                    record.id.to_string(),
                    payload,
                    record.created_at,
                    record.updated_at,
                ],
            )
            .map_err(|err| log_write_error("record_insert", collection, err))?;

        debug!(
            "event=record_insert module=store status=ok collection={collection} id={}",
            record.id
        );
        Ok(record)
    }

    fn update(&self, collection: &str, id: RecordId, mut fields: Fields) -> StoreResult<Record> {
        strip_reserved(&mut fields);
        self.schemas.check(collection, &fields, CheckMode::Patch)?;

        let tx = self.conn.unchecked_transaction()?;
        let existing = self
            .select_one(collection, id)?
            .ok_or_else(|| StoreError::not_found(collection, id))?;

        let updated = Record {
            fields: merge_fields(&existing.fields, fields),
            updated_at: next_updated_at(existing.updated_at),
            ..existing
        };
        let payload = encode_fields(&updated.fields)?;

        tx.execute(
            "UPDATE records
             SET fields = ?1, updated_at = ?2
             WHERE collection = ?3 AND id = ?4;",
            params![payload, updated.updated_at, collection, id.to_string()],
        )
        .map_err(|err| log_write_error("record_update", collection, err))?;
        tx.commit()?;

        debug!("event=record_update module=store status=ok collection={collection} id={id}");
        Ok(updated)
    }

    fn remove(&self, collection: &str, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2;",
                params![collection, id.to_string()],
            )
            .map_err(|err| log_write_error("record_remove", collection, err))?;

        if changed == 0 {
            return Err(StoreError::not_found(collection, id));
        }
        debug!("event=record_remove module=store status=ok collection={collection} id={id}");
        Ok(())
    }
}

struct RawRecord {
    id: String,
    collection: String,
    fields: String,
    created_at: i64,
    updated_at: i64,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            collection: row.get("collection")?,
            fields: row.get("fields")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn decode(self) -> StoreResult<Record> {
        let id = Uuid::parse_str(&self.id).map_err(|_| {
            BackendError::MalformedRecord(format!("invalid id `{}` in records.id", self.id))
        })?;
        let fields: Fields = serde_json::from_str(&self.fields).map_err(|err| {
            BackendError::MalformedRecord(format!("records.fields of {id} is not an object: {err}"))
        })?;

        Ok(Record {
            id,
            collection: self.collection,
            fields,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_fields(fields: &Fields) -> StoreResult<String> {
    serde_json::to_string(fields)
        .map_err(|err| BackendError::Internal(format!("cannot encode fields: {err}")).into())
}

fn log_write_error(event: &str, collection: &str, err: rusqlite::Error) -> StoreError {
    warn!("event={event} module=store status=error collection={collection} error={err}");
    err.into()
}
