//! # Framework Errors
//!
//! This module defines the common error types used throughout the store actor.
//! By centralizing error definitions, every client sees the same failure shapes
//! whatever entity the actor holds.

/// Errors that can occur within the store actor itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// True when the actor could not be reached at all (closed channel or dropped reply).
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::ActorClosed | Self::ActorDropped)
    }
}
