//! # Synchronization Engine
//!
//! Every table operation goes through [`TableSyncEngine`]. A mutation first validates its
//! input, then writes through the [`TableStore`], and only once the write is durable fans the
//! change out: always to the broadcast hub, and to the device when the status changed.
//!
//! Fan-out never turns a stored change into a failure. A dashboard that misses an event or a
//! device that does not answer is logged; the caller still gets the stored record, with
//! `device_notified` telling whether the device acknowledged.
//!
//! Operations on different tables never wait on one another. Same-table writes are ordered
//! by the store; each one carries the fields it changes, so concurrent writes to one table
//! settle on the last write per field.

use crate::clients::{StoreError, TableStore};
use crate::device::DeviceNotifier;
use crate::hub::{HubClient, TableEvent};
use crate::id_generator::IdGenerator;
use crate::model::{Table, TableId, TablePatch, TableStatus, TableUpdate};
use crate::table_actor::TableError;
use chrono::Utc;
use std::fmt::Display;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// An authenticated caller. Credential checks happen before the engine; the identity is only
/// carried for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(String);

impl Caller {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }

    pub fn identity(&self) -> &str {
        &self.0
    }
}

impl Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a status change.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub table: Table,
    /// `false` when the device was unreachable or refused the signal.
    pub device_notified: bool,
}

/// Result of a general update.
#[derive(Debug, Clone, PartialEq)]
pub struct TableChange {
    pub table: Table,
    /// `None` when the update did not touch the status and the device was not contacted.
    pub device_notified: Option<bool>,
}

pub struct TableSyncEngine {
    store: Arc<dyn TableStore>,
    ids: IdGenerator,
    hub: HubClient,
    device: Arc<dyn DeviceNotifier>,
}

impl TableSyncEngine {
    pub fn new(
        store: Arc<dyn TableStore>,
        ids: IdGenerator,
        hub: HubClient,
        device: Arc<dyn DeviceNotifier>,
    ) -> Self {
        Self {
            store,
            ids,
            hub,
            device,
        }
    }

    /// Creates an active, idle table named `name` under a fresh id.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn create_table(&self, caller: &Caller, name: &str) -> Result<Table, TableError> {
        let name = validate_name(name)?;
        if self.store.find_by_name(&name).await?.is_some() {
            warn!(table_name = %name, "Table name already in use");
            return Err(TableError::DuplicateName(name));
        }

        let table = self.insert_with_fresh_id(&name).await?;
        info!(table_id = %table.id, table_name = %table.name, "Table created");
        self.hub.broadcast(TableEvent::TableAdded(table.clone())).await;
        Ok(table)
    }

    /// Draws an id and inserts; draws once more if a concurrent create took the same id.
    async fn insert_with_fresh_id(&self, name: &str) -> Result<Table, TableError> {
        let mut retried = false;
        loop {
            let id = self.ids.generate(self.store.as_ref()).await?;
            match self.store.insert(Table::new(id, name, Utc::now())).await {
                Err(StoreError::DuplicateId(taken)) if !retried => {
                    warn!(table_id = %taken, "Generated id claimed concurrently, retrying");
                    retried = true;
                }
                result => return result.map_err(TableError::from),
            }
        }
    }

    /// The active table `id`. Falls back to the store's internal record key.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn get_table(&self, caller: &Caller, id: &str) -> Result<Table, TableError> {
        self.find(id).await
    }

    async fn find(&self, id: &str) -> Result<Table, TableError> {
        if let Some(table) = self.store.find_by_id(&TableId::from(id)).await? {
            return Ok(table);
        }
        self.store
            .find_by_storage_key(id)
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))
    }

    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn rename_table(
        &self,
        caller: &Caller,
        id: &str,
        new_name: &str,
    ) -> Result<Table, TableError> {
        let table_id = TableId::from(id);
        let name = validate_name(new_name)?;
        self.ensure_name_free(&name, &table_id).await?;

        let table = self
            .store
            .update(&table_id, TablePatch::at(Utc::now()).name(name))
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;

        info!(table_id = %table.id, table_name = %table.name, "Table renamed");
        self.hub.broadcast(TableEvent::TableUpdated(table.clone())).await;
        Ok(table)
    }

    /// Sets the status of table `id` and signals the device.
    ///
    /// `status` is checked against the known statuses before anything is written.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn update_status(
        &self,
        caller: &Caller,
        id: &str,
        status: &str,
    ) -> Result<StatusChange, TableError> {
        let status = parse_status(status)?;
        let table = self
            .store
            .update(&TableId::from(id), TablePatch::at(Utc::now()).status(status))
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;

        info!(table_id = %table.id, %status, "Table status updated");
        let device_notified = self
            .fan_out_status(&table, status, TableEvent::StatusUpdate(table.clone()))
            .await;
        Ok(StatusChange {
            table,
            device_notified,
        })
    }

    /// Applies any combination of name, status and active flag in one write.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn update_table(
        &self,
        caller: &Caller,
        id: &str,
        update: TableUpdate,
    ) -> Result<TableChange, TableError> {
        let table_id = TableId::from(id);
        let mut patch = TablePatch::at(Utc::now());

        if let Some(status) = update.status.as_deref() {
            patch = patch.status(parse_status(status)?);
        }
        if let Some(is_active) = update.is_active {
            if !is_active && !self.store.keeps_inactive() {
                return Err(TableError::Validation(
                    "tables are removed on delete here; use delete instead of isActive=false"
                        .into(),
                ));
            }
            patch = patch.active(is_active);
        }
        if let Some(name) = update.name.as_deref() {
            let name = validate_name(name)?;
            self.ensure_name_free(&name, &table_id).await?;
            patch = patch.name(name);
        }
        if patch.is_empty() {
            return Err(TableError::Validation("no fields to update".into()));
        }

        let status = patch.status;
        let table = self
            .store
            .update(&table_id, patch)
            .await?
            .ok_or_else(|| TableError::NotFound(id.to_string()))?;
        info!(table_id = %table.id, ?update, "Table updated");

        // Deactivated tables leave every dashboard, whatever else the patch carried.
        let event = if update.is_active == Some(false) {
            TableEvent::TableDeleted {
                id: table.id.clone(),
            }
        } else if status.is_some() {
            TableEvent::StatusUpdate(table.clone())
        } else {
            TableEvent::TableUpdated(table.clone())
        };
        let device_notified = match status {
            Some(status) => Some(self.fan_out_status(&table, status, event).await),
            None => {
                self.hub.broadcast(event).await;
                None
            }
        };
        Ok(TableChange {
            table,
            device_notified,
        })
    }

    /// Removes table `id` from the active set. A second delete reports `NotFound`.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn delete_table(&self, caller: &Caller, id: &str) -> Result<(), TableError> {
        let table_id = TableId::from(id);
        if !self.store.delete(&table_id).await? {
            return Err(TableError::NotFound(id.to_string()));
        }
        info!(%table_id, "Table deleted");
        self.hub
            .broadcast(TableEvent::TableDeleted { id: table_id })
            .await;
        Ok(())
    }

    /// All active tables, oldest first.
    #[instrument(skip(self, caller), fields(caller = caller.identity()))]
    pub async fn list_tables(&self, caller: &Caller) -> Result<Vec<Table>, TableError> {
        Ok(self.store.list_active().await?)
    }

    /// Current status of table `id`, for the device to poll. Needs no caller.
    #[instrument(skip(self))]
    pub async fn table_status(&self, id: &str) -> Result<TableStatus, TableError> {
        Ok(self.find(id).await?.status)
    }

    /// Whether the indicator device answers its health check.
    pub async fn device_online(&self) -> bool {
        self.device.check_connection().await
    }

    /// Notifies the device and broadcasts the new state at the same time.
    async fn fan_out_status(&self, table: &Table, status: TableStatus, event: TableEvent) -> bool {
        let (device_notified, delivered) = tokio::join!(
            self.device.notify(status),
            self.hub.broadcast(event)
        );
        if !device_notified {
            warn!(table_id = %table.id, %status, "Device not notified, stored status kept");
        }
        info!(table_id = %table.id, device_notified, delivered, "Status fanned out");
        device_notified
    }

    async fn ensure_name_free(&self, name: &str, owner: &TableId) -> Result<(), TableError> {
        match self.store.find_by_name(name).await? {
            Some(holder) if &holder.id != owner => {
                warn!(table_name = %name, holder = %holder.id, "Table name already in use");
                Err(TableError::DuplicateName(name.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// Trimmed, non-empty name.
fn validate_name(name: &str) -> Result<String, TableError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TableError::Validation("table name must not be empty".into()));
    }
    Ok(name.to_string())
}

fn parse_status(status: &str) -> Result<TableStatus, TableError> {
    status
        .parse()
        .map_err(|_| TableError::InvalidStatus(status.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_trims() {
        assert_eq!(validate_name("  Window 2 ").unwrap(), "Window 2");
        assert!(matches!(validate_name(" \t "), Err(TableError::Validation(_))));
        assert!(matches!(validate_name(""), Err(TableError::Validation(_))));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("delivered"), Ok(TableStatus::Delivered));
        assert_eq!(
            parse_status("ready"),
            Err(TableError::InvalidStatus("ready".into()))
        );
    }
}
