//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # Resource-Oriented Architecture
/// Each actor manages one type of record (the [`ActorEntity`]). Instead of ad-hoc messages
/// per use case, the store speaks a small fixed vocabulary that applies to almost any
/// persistent resource.
///
/// - **Insert**: Lifecycle start. The caller supplies the full record, id included. Rejected
///   with `DuplicateId` or `DuplicateKey` when a uniqueness rule would break.
/// - **Get**: Reads a live record by id.
/// - **Contains**: Whether an id has ever been accepted (live, retired or removed).
/// - **FindByKey**: Reads the live record holding a secondary unique key.
/// - **Update**: Applies [`ActorEntity::Update`] to a live record, atomically.
/// - **Delete**: Lifecycle end. Retires or removes a live record per the actor's policy.
/// - **List**: All live records ordered by [`ActorEntity::SortKey`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Insert {
        entity: T,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Contains {
        id: T::Id,
        respond_to: Response<bool>,
    },
    FindByKey {
        key: String,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
}
