//! Store Layer
//!
//! Document store abstraction, live subscriptions and implementations.

mod memory;
mod ordering;
mod registry;
#[cfg(feature = "sqlite")]
mod sqlite;
mod subscription;
mod traits;


use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};

pub use memory::MemoryStore;
pub use ordering::{compare_values, ordered_snapshot};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use subscription::{SnapshotEvent, SnapshotSender, SnapshotStream, Subscription, SubscriptionHandle};
pub use traits::{CollectionSpec, DocumentStore};

use crate::domain::{DocumentId, FieldValue, Timestamp, WriteFields};

/// Merge written fields into a stored document, resolving server timestamps
/// against the document's previous stamp.
pub(crate) fn apply_write(target: &mut Map<String, Value>, fields: WriteFields) {
    for (name, value) in fields {
        let value = match value {
            FieldValue::Value(v) => v,
            FieldValue::ServerTimestamp => {
                let previous = target.get(&name).and_then(Timestamp::from_value);
                Timestamp::next_after(previous).to_value()
            }
        };
        target.insert(name, value);
    }
}

/// Time-prefixed identifier, unique per store instance
pub(crate) fn generate_id(counter: u64) -> DocumentId {
    let millis = chrono::Utc::now().timestamp_millis();
    DocumentId::new(format!("{:011x}{:05x}", millis, counter & 0xf_ffff))
}

/// Lock a std mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
