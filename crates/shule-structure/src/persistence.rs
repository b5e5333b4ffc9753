//! Boundary with the persistence collaborator.
//!
//! The engine never talks to storage itself. `commit()` first asks the
//! [`StructurePersistence`] for the latest record stored under the school's
//! name, then hands its own record over and flips to `Committed` only on an
//! acknowledgment.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, PoisonError};

use shule_models::SchoolRecord;

/// Why the backend did not acknowledge a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// The backend answered and refused the record.
    #[error("backend rejected the record ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend could not be reached or answered unintelligibly.
    #[error("backend unavailable: {0}")]
    Transport(String),
}

pub type PersistFuture<'a> = Pin<Box<dyn Future<Output = Result<(), PersistenceError>> + Send + 'a>>;

pub type LatestFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Option<SchoolRecord>, PersistenceError>> + Send + 'a>>;

pub trait StructurePersistence: Send + Sync {
    /// Stores a school record. `Ok(())` is the acknowledgment that commits it.
    fn persist<'a>(&'a self, record: &'a SchoolRecord) -> PersistFuture<'a>;

    /// The most recent record stored for the school called `name`, if any.
    fn latest<'a>(&'a self, name: &'a str) -> LatestFuture<'a>;
}

/// Schools are keyed by name, ignoring case and surrounding whitespace.
pub fn same_school(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Keeps acknowledged records in memory.
///
/// Used for local runs without a backend and as the test double. A failure can
/// be queued to exercise the unacknowledged path.
#[derive(Debug, Default)]
pub struct InMemoryPersistence {
    records: Mutex<Vec<SchoolRecord>>,
    pending_failure: Mutex<Option<PersistenceError>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `persist` call fail with `error`.
    pub fn fail_next(&self, error: PersistenceError) {
        *self
            .pending_failure
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Records acknowledged so far, oldest first.
    pub fn records(&self) -> Vec<SchoolRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl StructurePersistence for InMemoryPersistence {
    fn persist<'a>(&'a self, record: &'a SchoolRecord) -> PersistFuture<'a> {
        Box::pin(async move {
            let failure = self
                .pending_failure
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(error) = failure {
                return Err(error);
            }

            self.records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record.clone());
            Ok(())
        })
    }

    fn latest<'a>(&'a self, name: &'a str) -> LatestFuture<'a> {
        Box::pin(async move {
            Ok(self
                .records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .rev()
                .find(|record| same_school(&record.profile.name, name))
                .cloned())
        })
    }
}
