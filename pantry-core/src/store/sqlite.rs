//! SQLite document store
//!
//! Each document is one row of JSON text keyed by (collection, id). Ordering
//! is applied in Rust so both stores share the same query semantics.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};

use super::ordering::ordered_snapshot;
use super::registry::SubscriberRegistry;
use super::subscription::Subscription;
use super::traits::{CollectionSpec, DocumentStore};
use super::{apply_write, generate_id, lock};
use crate::domain::{Document, DocumentId, Snapshot, WriteFields};
use crate::error::{StoreError, StoreResult};

fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            fields TEXT NOT NULL,
            PRIMARY KEY (collection, id)
        )",
        [],
    )
    .map_err(backend)?;
    Ok(())
}

fn load_documents(conn: &Connection, collection: &str) -> StoreResult<Vec<Document>> {
    let mut stmt = conn
        .prepare("SELECT id, fields FROM documents WHERE collection = ?1")
        .map_err(backend)?;
    let rows = stmt
        .query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })
        .map_err(backend)?;

    let mut docs = Vec::new();
    for row in rows {
        let (id, text) = row.map_err(backend)?;
        let fields: Map<String, Value> = serde_json::from_str(&text)?;
        docs.push(Document::new(id, fields));
    }
    Ok(docs)
}

fn load_snapshot(conn: &Connection, spec: &CollectionSpec) -> StoreResult<Snapshot> {
    Ok(ordered_snapshot(load_documents(conn, &spec.name)?, &spec.order_by))
}

/// SQLite-backed store with live queries
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    subscribers: Arc<Mutex<SubscriberRegistry>>,
    next_id: AtomicU64,
}

impl SqliteStore {
    pub fn open(path: &Path) -> StoreResult<Self> {
        Self::from_connection(Connection::open(path).map_err(backend)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory().map_err(backend)?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            subscribers: Arc::new(Mutex::new(SubscriberRegistry::default())),
            next_id: AtomicU64::new(0),
        })
    }

    /// Push fresh snapshots; called with the connection lock held so pushes
    /// follow write order.
    fn notify(&self, conn: &Connection, collection: &str) {
        lock(&self.subscribers).notify(collection, |spec| load_snapshot(conn, spec));
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn subscribe(&self, spec: &CollectionSpec) -> Subscription {
        let conn = lock(&self.conn);
        let initial = match load_snapshot(&conn, spec) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::warn!("[sqlite-store] subscription to {} failed: {}", spec.name, err);
                return Subscription::failed(err);
            }
        };

        let registry = Arc::downgrade(&self.subscribers);
        lock(&self.subscribers).register(spec, initial, move |id| {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).remove(id);
            }
        })
    }

    async fn query(&self, spec: &CollectionSpec) -> StoreResult<Snapshot> {
        let conn = lock(&self.conn);
        load_snapshot(&conn, spec)
    }

    async fn create(&self, collection: &str, fields: WriteFields) -> StoreResult<DocumentId> {
        let conn = lock(&self.conn);
        let id = generate_id(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut doc = Map::new();
        apply_write(&mut doc, fields);

        conn.execute(
            "INSERT INTO documents (collection, id, fields) VALUES (?1, ?2, ?3)",
            params![collection, id.as_str(), Value::Object(doc).to_string()],
        )
        .map_err(backend)?;

        self.notify(&conn, collection);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &DocumentId, fields: WriteFields) -> StoreResult<()> {
        let conn = lock(&self.conn);
        let existing: Option<String> = conn
            .query_row(
                "SELECT fields FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        let text = existing.ok_or_else(|| StoreError::NotFound {
            collection: collection.to_string(),
            id: id.clone(),
        })?;

        let mut doc: Map<String, Value> = serde_json::from_str(&text)?;
        apply_write(&mut doc, fields);
        conn.execute(
            "UPDATE documents SET fields = ?1 WHERE collection = ?2 AND id = ?3",
            params![Value::Object(doc).to_string(), collection, id.as_str()],
        )
        .map_err(backend)?;

        self.notify(&conn, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> StoreResult<()> {
        let conn = lock(&self.conn);
        let changed = conn
            .execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id.as_str()],
            )
            .map_err(backend)?;
        if changed > 0 {
            self.notify(&conn, collection);
        }
        Ok(())
    }
}
