use super::{TableId, TableStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical table in the venue and the state of its current order.
///
/// # Actor Store
/// `Table` implements [`ActorEntity`](actor_store::ActorEntity) (see
/// [`crate::table_actor::entity`]): its name is the unique key among active tables and
/// `is_active` decides visibility.
///
/// Serialized with the field names dashboards already consume:
/// `id`, `tableName`, `status`, `isActive`, `createdAt`, `updatedAt`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: TableId,
    #[serde(rename = "tableName")]
    pub name: String,
    pub status: TableStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Table {
    /// A fresh, active, idle table stamped with `now`.
    pub fn new(id: TableId, name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            status: TableStatus::Idle,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial change applied by the store.
///
/// `touched_at` is the wall-clock time of the change; the store never lets `updated_at`
/// go backwards, whatever this value is.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePatch {
    pub name: Option<String>,
    pub status: Option<TableStatus>,
    pub is_active: Option<bool>,
    pub touched_at: DateTime<Utc>,
}

impl TablePatch {
    pub fn at(touched_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            status: None,
            is_active: None,
            touched_at,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn status(mut self, status: TableStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.status.is_none() && self.is_active.is_none()
    }
}

/// Caller-supplied general update. Every field is optional; `status` is raw text and is
/// validated before anything is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdate {
    #[serde(rename = "tableName", alias = "name")]
    pub name: Option<String>,
    pub status: Option<String>,
    pub is_active: Option<bool>,
}
