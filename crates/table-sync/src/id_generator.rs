//! # Identifier Generator
//!
//! Produces short public table ids: three random uppercase letters and three random digits,
//! shuffled together. A candidate is only handed out once the store confirms that no record,
//! active or deleted, has ever held it.
//!
//! The check and the later insert are separate store calls, so two concurrent creates can
//! still draw the same fresh id. The store rejects the second insert with a duplicate-id
//! error and the engine draws again.

use crate::clients::TableStore;
use crate::model::TableId;
use crate::table_actor::TableError;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

/// Default number of candidates tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 50;

type CandidateSource = Box<dyn Fn() -> TableId + Send + Sync>;

pub struct IdGenerator {
    next_candidate: CandidateSource,
    max_attempts: usize,
}

impl IdGenerator {
    /// Random candidates, at most `max_attempts` per call.
    pub fn new(max_attempts: usize) -> Self {
        Self::with_source(max_attempts, random_table_id)
    }

    /// Candidates from `source` instead of the random draw.
    pub fn with_source(
        max_attempts: usize,
        source: impl Fn() -> TableId + Send + Sync + 'static,
    ) -> Self {
        Self {
            next_candidate: Box::new(source),
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns an id no record in `store` has ever held.
    pub async fn generate(&self, store: &dyn TableStore) -> Result<TableId, TableError> {
        for attempt in 1..=self.max_attempts {
            let candidate = (self.next_candidate)();
            if !store.id_in_use(&candidate).await? {
                debug!(id = %candidate, attempt, "Generated table id");
                return Ok(candidate);
            }
            debug!(id = %candidate, attempt, "Table id taken, drawing again");
        }
        warn!(attempts = self.max_attempts, "Table id generation exhausted");
        Err(TableError::GenerationExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

/// One random candidate: three `A-Z` letters and three `0-9` digits, shuffled.
pub fn random_table_id() -> TableId {
    let mut rng = rand::rng();
    let mut chars: Vec<char> = Vec::with_capacity(TableId::LEN);
    for _ in 0..3 {
        chars.push(char::from(rng.random_range(b'A'..=b'Z')));
    }
    for _ in 0..3 {
        chars.push(char::from(rng.random_range(b'0'..=b'9')));
    }
    chars.shuffle(&mut rng);
    TableId::new(chars.into_iter().collect::<String>())
}
