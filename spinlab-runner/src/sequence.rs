//! SequenceStore — the append-ordered record of observed outcomes.
//!
//! One document per session, outcomes most-recent-first. The only permitted
//! mutations are a full replace on initialize and a push-front append; the
//! append runs under a compare-and-swap retry loop so two concurrent rounds
//! on the same session cannot drop each other's outcomes.

use crate::store::{self, Expected, Store, StoreError};
use serde::{Deserialize, Serialize};
use spinlab_core::domain::{Outcome, SessionId};
use std::sync::Arc;

const COLLECTION: &str = "sequences";

/// Persisted shape of a session's outcome sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceRecord {
    pub session_id: SessionId,
    /// Most-recent-first.
    pub outcomes: Vec<Outcome>,
}

/// Append-only per-session outcome log.
#[derive(Clone)]
pub struct SequenceStore {
    store: Arc<dyn Store>,
    max_retries: u32,
}

impl SequenceStore {
    pub fn new(store: Arc<dyn Store>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    /// Create or replace the session's sequence.
    pub fn initialize(
        &self,
        session: &SessionId,
        outcomes: Vec<Outcome>,
    ) -> Result<usize, StoreError> {
        let record = SequenceRecord {
            session_id: session.clone(),
            outcomes,
        };
        store::save(
            self.store.as_ref(),
            COLLECTION,
            session.as_str(),
            &record,
            Expected::Any,
        )?;
        Ok(record.outcomes.len())
    }

    /// Insert a new outcome at the front, retrying on version conflicts.
    ///
    /// Returns the updated sequence (most-recent-first), or `None` when the
    /// session was never initialized.
    pub fn append(
        &self,
        session: &SessionId,
        outcome: Outcome,
    ) -> Result<Option<Vec<Outcome>>, StoreError> {
        let mut attempts = 0;
        loop {
            let Some((version, mut record)) = store::load::<SequenceRecord>(
                self.store.as_ref(),
                COLLECTION,
                session.as_str(),
            )?
            else {
                return Ok(None);
            };
            record.outcomes.insert(0, outcome);
            match store::save(
                self.store.as_ref(),
                COLLECTION,
                session.as_str(),
                &record,
                Expected::Version(version),
            ) {
                Ok(_) => return Ok(Some(record.outcomes)),
                Err(err @ StoreError::VersionConflict { .. }) => {
                    if attempts >= self.max_retries {
                        return Err(err);
                    }
                    attempts += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Current sequence, most-recent-first.
    pub fn current(&self, session: &SessionId) -> Result<Option<Vec<Outcome>>, StoreError> {
        Ok(
            store::load::<SequenceRecord>(self.store.as_ref(), COLLECTION, session.as_str())?
                .map(|(_, record)| record.outcomes),
        )
    }
}
