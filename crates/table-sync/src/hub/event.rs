use crate::model::{Table, TableId};
use serde::{Deserialize, Serialize};

/// A change pushed to every connected dashboard.
///
/// On the wire an event is `{"event": "<name>", "data": <payload>}`; the payload is the full
/// table, except for deletions which only carry `{"id": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum TableEvent {
    TableAdded(Table),
    TableUpdated(Table),
    StatusUpdate(Table),
    TableDeleted { id: TableId },
}

impl TableEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TableEvent::TableAdded(_) => "table_added",
            TableEvent::TableUpdated(_) => "table_updated",
            TableEvent::StatusUpdate(_) => "status_update",
            TableEvent::TableDeleted { .. } => "table_deleted",
        }
    }

    pub fn table_id(&self) -> &TableId {
        match self {
            TableEvent::TableAdded(table)
            | TableEvent::TableUpdated(table)
            | TableEvent::StatusUpdate(table) => &table.id,
            TableEvent::TableDeleted { id } => id,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
