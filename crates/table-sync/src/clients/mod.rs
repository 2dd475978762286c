//! Clients for the table actor.

pub mod table_store;

pub use table_store::{ActorTableStore, StoreError, TableStore};
