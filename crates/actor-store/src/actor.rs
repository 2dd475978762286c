//! # Generic Store Actor
//!
//! This module defines the `ResourceActor`, the component that owns a collection of records
//! and serializes every read and write against it. It implements the "Server" side of the
//! Actor Model: one Tokio task, one message at a time, exclusive access to the store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What `Delete` does to a live record.
///
/// One deployment uses one policy for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetirePolicy {
    /// Keep the record, call [`ActorEntity::on_retire`] and hide it from reads.
    #[default]
    Soft,
    /// Drop the record. Its id stays reserved.
    Hard,
}

/// The generic actor that manages a collection of records.
///
/// ## Concurrency model
/// Any number of `ResourceClient` clones may send requests at once; the actor handles them
/// one after another. That makes every message atomic with respect to every other message,
/// which is what the uniqueness rules rely on: the id and key checks in `Insert` and the
/// read-modify-write in `Update` cannot interleave with another request.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` to get the `actor` (server) and `client` (interface).
/// 2.  **Run**: Spawn `actor.run()` in a background task.
/// 3.  **Use**: Clone the client freely. Dropping every clone stops the actor.
///
/// ```rust
/// use actor_store::{ActorEntity, ResourceActor, RetirePolicy};
///
/// #[derive(Clone, Debug)]
/// struct Note { id: u32, title: String }
/// #[derive(Debug)] struct NoteUpdate { title: String }
/// #[derive(Debug, thiserror::Error)] #[error("note error")] struct NoteError;
///
/// impl ActorEntity for Note {
///     type Id = u32;
///     type Update = NoteUpdate;
///     type SortKey = u32;
///     type Error = NoteError;
///
///     fn id(&self) -> &u32 { &self.id }
///     fn sort_key(&self) -> u32 { self.id }
///     fn on_update(&mut self, update: NoteUpdate) -> Result<(), NoteError> {
///         self.title = update.title;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Note>::new(10, RetirePolicy::Hard);
///     tokio::spawn(actor.run());
///
///     let note = client.insert(Note { id: 1, title: "draft".into() }).await.unwrap();
///     assert_eq!(note.title, "draft");
/// }
/// ```
///
/// # Implementation Details
///
/// * `store` maps ids to `(sequence, record)`; the sequence breaks `SortKey` ties by insertion order.
/// * `keys` indexes the unique key of every live record.
/// * `removed` remembers ids of hard-deleted records so they are never accepted again.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, (u64, T)>,
    keys: HashMap<String, T::Id>,
    removed: HashSet<T::Id>,
    next_seq: u64,
    policy: RetirePolicy,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `policy` - How `Delete` treats a record.
    pub fn new(buffer_size: usize, policy: RetirePolicy) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            keys: HashMap::new(),
            removed: HashSet::new(),
            next_seq: 1,
            policy,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    pub async fn run(mut self) {
        // Extract just the type name (e.g., "Table" instead of "table_sync::model::table::Table")
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, policy = ?self.policy, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Insert { entity, respond_to } => {
                    debug!(entity_type, ?entity, "Insert");
                    let result = self.insert(entity);
                    match &result {
                        Ok(item) => {
                            info!(entity_type, id = %item.id(), size = self.store.len(), "Inserted")
                        }
                        Err(e) => warn!(entity_type, error = %e, "Insert rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.live(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Contains { id, respond_to } => {
                    let known = self.store.contains_key(&id) || self.removed.contains(&id);
                    debug!(entity_type, %id, known, "Contains");
                    let _ = respond_to.send(Ok(known));
                }
                ResourceRequest::FindByKey { key, respond_to } => {
                    let item = self.keys.get(&key).and_then(|id| self.live(id)).cloned();
                    debug!(entity_type, key, found = item.is_some(), "FindByKey");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = self.update(&id, update);
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Updated"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id);
                    match &result {
                        Ok(()) => info!(entity_type, %id, live = self.live_count(), "Deleted"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    let items = self.list();
                    debug!(entity_type, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    fn live(&self, id: &T::Id) -> Option<&T> {
        self.store
            .get(id)
            .map(|(_, item)| item)
            .filter(|item| item.is_live())
    }

    fn live_count(&self) -> usize {
        self.store.values().filter(|(_, item)| item.is_live()).count()
    }

    fn insert(&mut self, mut entity: T) -> Result<T, FrameworkError> {
        let id = entity.id().clone();
        if self.store.contains_key(&id) || self.removed.contains(&id) {
            return Err(FrameworkError::DuplicateId(id.to_string()));
        }
        entity
            .on_create()
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        let key = entity
            .unique_key()
            .filter(|_| entity.is_live())
            .map(str::to_owned);
        if let Some(key) = &key {
            if self.keys.contains_key(key) {
                return Err(FrameworkError::DuplicateKey(key.clone()));
            }
        }

        if let Some(key) = key {
            self.keys.insert(key, id.clone());
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.store.insert(id, (seq, entity.clone()));
        Ok(entity)
    }

    fn update(&mut self, id: &T::Id, update: T::Update) -> Result<T, FrameworkError> {
        let Some(current) = self.live(id) else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        let old_key = current.unique_key().map(str::to_owned);

        // The hook works on a copy so a failed update leaves the stored record untouched.
        let mut next = current.clone();
        next.on_update(update)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        let new_key = next
            .unique_key()
            .filter(|_| next.is_live())
            .map(str::to_owned);
        if let Some(key) = &new_key {
            if self.keys.get(key).is_some_and(|holder| holder != id) {
                return Err(FrameworkError::DuplicateKey(key.clone()));
            }
        }

        if let Some(key) = old_key {
            self.keys.remove(&key);
        }
        if let Some(key) = new_key {
            self.keys.insert(key, id.clone());
        }
        if let Some((_, slot)) = self.store.get_mut(id) {
            *slot = next.clone();
        }
        Ok(next)
    }

    fn delete(&mut self, id: &T::Id) -> Result<(), FrameworkError> {
        let Some(current) = self.live(id) else {
            return Err(FrameworkError::NotFound(id.to_string()));
        };
        if let Some(key) = current.unique_key().map(str::to_owned) {
            self.keys.remove(&key);
        }

        if self.policy == RetirePolicy::Soft {
            if let Some((_, item)) = self.store.get_mut(id) {
                item.on_retire();
                if !item.is_live() {
                    return Ok(());
                }
                warn!(%id, "on_retire left the record live, removing it instead");
            }
        }

        self.store.remove(id);
        self.removed.insert(id.clone());
        Ok(())
    }

    fn list(&self) -> Vec<T> {
        let mut live: Vec<(T::SortKey, u64, &T)> = self
            .store
            .values()
            .filter(|(_, item)| item.is_live())
            .map(|(seq, item)| (item.sort_key(), *seq, item))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        live.into_iter().map(|(_, _, item)| item.clone()).collect()
    }
}
