//! # Table Store
//!
//! The persistence seam of the engine. [`TableStore`] is what the engine and the identifier
//! generator depend on; [`ActorTableStore`] is the production implementation, backed by the
//! table actor.

use crate::model::{Table, TableId, TablePatch};
use crate::table_actor::TableError;
use actor_store::{FrameworkError, ResourceClient, RetirePolicy};
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument};

/// Failures reported by a table store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Table not found: {0}")]
    NotFound(String),

    /// The id is already held by some record, live or retired.
    #[error("Table id already in use: {0}")]
    DuplicateId(String),

    /// An active table already has this name.
    #[error("Table name already in use: {0}")]
    DuplicateName(String),

    /// The record itself refused the change.
    #[error("Rejected by store: {0}")]
    Rejected(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            FrameworkError::DuplicateId(id) => StoreError::DuplicateId(id),
            FrameworkError::DuplicateKey(name) => StoreError::DuplicateName(name),
            FrameworkError::EntityError(inner) => match inner.downcast::<TableError>() {
                Ok(table_error) => match *table_error {
                    TableError::Validation(msg) => StoreError::Rejected(msg),
                    other => StoreError::Rejected(other.to_string()),
                },
                Err(inner) => StoreError::Rejected(inner.to_string()),
            },
            closed @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                StoreError::Unavailable(closed.to_string())
            }
        }
    }
}

/// Persistence operations over table records.
///
/// Reads only ever return active tables. `insert` must reject an id that any record has
/// held and a name held by an active table, atomically with the write.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// The active table with exactly this name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Table>, StoreError>;

    /// The active table with this id.
    async fn find_by_id(&self, id: &TableId) -> Result<Option<Table>, StoreError>;

    /// Lookup by a backend-internal record key, for stores that have one.
    async fn find_by_storage_key(&self, _key: &str) -> Result<Option<Table>, StoreError> {
        Ok(None)
    }

    /// Whether any record, active or not, holds this id.
    async fn id_in_use(&self, id: &TableId) -> Result<bool, StoreError>;

    async fn insert(&self, table: Table) -> Result<Table, StoreError>;

    /// Applies `patch` to the active table `id`. `Ok(None)` when there is no such table.
    async fn update(&self, id: &TableId, patch: TablePatch) -> Result<Option<Table>, StoreError>;

    /// Active tables, oldest first.
    async fn list_active(&self) -> Result<Vec<Table>, StoreError>;

    /// Removes the active table `id`. `Ok(false)` when there was nothing to remove.
    async fn delete(&self, id: &TableId) -> Result<bool, StoreError>;

    /// Whether deleted tables are kept as inactive records.
    fn keeps_inactive(&self) -> bool {
        true
    }
}

/// [`TableStore`] backed by a [`ResourceClient<Table>`].
#[derive(Clone)]
pub struct ActorTableStore {
    inner: ResourceClient<Table>,
    policy: RetirePolicy,
}

impl ActorTableStore {
    pub fn new(inner: ResourceClient<Table>, policy: RetirePolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl TableStore for ActorTableStore {
    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<Table>, StoreError> {
        debug!("Sending request");
        Ok(self.inner.find_by_key(name).await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn find_by_id(&self, id: &TableId) -> Result<Option<Table>, StoreError> {
        debug!("Sending request");
        Ok(self.inner.get(id.clone()).await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn id_in_use(&self, id: &TableId) -> Result<bool, StoreError> {
        Ok(self.inner.contains(id.clone()).await?)
    }

    #[instrument(skip(self, table), fields(id = %table.id, table_name = %table.name))]
    async fn insert(&self, table: Table) -> Result<Table, StoreError> {
        debug!("Sending request");
        Ok(self.inner.insert(table).await?)
    }

    #[instrument(skip(self, patch), fields(id = %id))]
    async fn update(&self, id: &TableId, patch: TablePatch) -> Result<Option<Table>, StoreError> {
        debug!(?patch, "Sending request");
        match self.inner.update(id.clone(), patch).await {
            Ok(table) => Ok(Some(table)),
            Err(FrameworkError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self))]
    async fn list_active(&self) -> Result<Vec<Table>, StoreError> {
        Ok(self.inner.list().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &TableId) -> Result<bool, StoreError> {
        debug!("Sending request");
        match self.inner.delete(id.clone()).await {
            Ok(()) => Ok(true),
            Err(FrameworkError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn keeps_inactive(&self) -> bool {
        self.policy == RetirePolicy::Soft
    }
}
