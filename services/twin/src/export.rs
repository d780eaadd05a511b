//! services/twin/src/export.rs
//!
//! Snapshots the durable key space as a single JSON document.

use diatwin_core::ports::{KeyValueStore, PortResult};
use serde_json::{Map, Value};
use tracing::warn;

/// Collects every stored key. Values that are not valid JSON are kept as
/// plain strings so nothing is lost.
pub async fn snapshot(storage: &dyn KeyValueStore) -> PortResult<Value> {
    let mut document = Map::new();
    for key in storage.keys().await? {
        let Some(raw) = storage.get(&key).await? else {
            continue;
        };
        let value = match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %key, error = %e, "Exporting unreadable value as a string.");
                Value::String(raw)
            }
        };
        document.insert(key, value);
    }
    Ok(Value::Object(document))
}
