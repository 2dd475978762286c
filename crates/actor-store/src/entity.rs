//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract a record type must implement to be held by the
//! generic `ResourceActor`. It specifies associated types for the id, the partial update DTO,
//! the listing order and the error, plus the hooks the actor calls while it owns the record
//! (`on_create`, `on_update`, `on_retire`).
//!
//! # Uniqueness
//! Two things are unique inside one actor:
//! - the primary id, across every record the actor has ever accepted (ids are never reused,
//!   not even after a hard delete);
//! - the optional [`ActorEntity::unique_key`], across the records that are currently live.
//!
//! Both are checked inside the actor loop, so they hold even when many clients race to insert.
//!
//! # Provided Methods (Hooks)
//! [`ActorEntity::on_create`], [`ActorEntity::unique_key`], [`ActorEntity::is_live`] and
//! [`ActorEntity::on_retire`] have default implementations. A record type that never retires
//! softly and has no secondary key only needs `id`, `sort_key` and `on_update`.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any record type must implement to be managed by `ResourceActor`.
///
/// Hooks run inside the actor task, one message at a time, so an entity can mutate
/// itself without any locking.
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The primary identifier (e.g. a code, a Uuid, a u64).
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The partial update applied by `on_update`.
    type Update: Send + Sync + Debug + 'static;

    /// Key used to order `List` responses (ties are broken by insertion order).
    type SortKey: Ord + Send + 'static;

    /// The error type for this entity.
    ///
    /// One enum for the whole entity rather than one per hook: callers match on a single
    /// type, at the price of every hook being able to return every variant.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The primary id of this record.
    fn id(&self) -> &Self::Id;

    /// Ordering key for listings.
    fn sort_key(&self) -> Self::SortKey;

    /// Secondary key that must be unique among live records (e.g. a display name).
    fn unique_key(&self) -> Option<&str> {
        None
    }

    /// Whether the record is visible to reads, updates and listings.
    fn is_live(&self) -> bool {
        true
    }

    // --- Lifecycle Hooks ---

    /// Called right before the record is accepted by the store.
    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies a partial update to a live record.
    ///
    /// The actor works on a copy and only commits it when this hook succeeds and the
    /// resulting unique key does not collide with another live record.
    fn on_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;

    /// Marks the record as retired under [`RetirePolicy::Soft`](crate::RetirePolicy::Soft).
    ///
    /// After this hook `is_live` must return `false`.
    fn on_retire(&mut self) {}
}
