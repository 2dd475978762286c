//! [`ActorEntity`] implementation for [`Table`].
//!
//! The store keeps every table it ever accepted. A soft-deleted table stays in the map with
//! `is_active == false`, which frees its name for reuse but never its id.

use super::TableError;
use crate::model::{Table, TableId, TablePatch};
use actor_store::ActorEntity;
use chrono::{DateTime, Duration, Utc};

impl ActorEntity for Table {
    type Id = TableId;
    type Update = TablePatch;
    type SortKey = (DateTime<Utc>, TableId);
    type Error = TableError;

    fn id(&self) -> &TableId {
        &self.id
    }

    /// Listings are oldest first.
    fn sort_key(&self) -> Self::SortKey {
        (self.created_at, self.id.clone())
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn is_live(&self) -> bool {
        self.is_active
    }

    fn on_create(&mut self) -> Result<(), TableError> {
        if self.name.trim().is_empty() {
            return Err(TableError::Validation("table name must not be empty".into()));
        }
        Ok(())
    }

    /// # Fields Updated
    /// - `name`, `status`, `is_active` when present in the patch
    /// - `updated_at` always, and always forward
    fn on_update(&mut self, patch: TablePatch) -> Result<(), TableError> {
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(TableError::Validation("table name must not be empty".into()));
            }
            self.name = name;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        self.updated_at = advance(self.updated_at, patch.touched_at);
        Ok(())
    }

    fn on_retire(&mut self) {
        self.is_active = false;
        self.updated_at = advance(self.updated_at, Utc::now());
    }
}

/// `at` if it is later than `previous`, otherwise one microsecond past `previous`.
fn advance(previous: DateTime<Utc>, at: DateTime<Utc>) -> DateTime<Utc> {
    if at > previous {
        at
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableStatus;
    use chrono::TimeZone;

    fn table_at(at: DateTime<Utc>) -> Table {
        Table::new(TableId::from("ABC123"), "Window", at)
    }

    #[test]
    fn test_update_applies_present_fields_only() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let mut table = table_at(created);
        let later = created + Duration::seconds(5);

        table
            .on_update(TablePatch::at(later).status(TableStatus::Placed))
            .unwrap();

        assert_eq!(table.status, TableStatus::Placed);
        assert_eq!(table.name, "Window");
        assert_eq!(table.updated_at, later);
        assert_eq!(table.created_at, created);
    }

    #[test]
    fn test_updated_at_never_goes_backwards() {
        let created = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let mut table = table_at(created);

        // Same instant, then a clock that jumped back.
        table.on_update(TablePatch::at(created).name("Booth")).unwrap();
        let first = table.updated_at;
        assert!(first > created);

        table
            .on_update(TablePatch::at(created - Duration::hours(1)).status(TableStatus::Idle))
            .unwrap();
        assert!(table.updated_at > first);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut table = table_at(Utc::now());
        let result = table.on_update(TablePatch::at(Utc::now()).name("   "));
        assert!(matches!(result, Err(TableError::Validation(_))));
        assert_eq!(table.name, "Window");
    }

    #[test]
    fn test_retire_hides_table_and_frees_name() {
        let mut table = table_at(Utc::now());
        let before = table.updated_at;
        table.on_retire();
        assert!(!table.is_live());
        assert!(table.updated_at > before);
        assert_eq!(table.unique_key(), Some("Window"));
    }
}
