//! Outgoing operation envelopes.
//!
//! An envelope carries one platform change message end-to-end through the
//! filter, mapping and write stages. Notes accumulate across every stage
//! that touches the envelope; they are append-only and their order is part
//! of the observable contract.

use crate::types::SyncOperation;

/// One in-flight outgoing record.
#[derive(Debug, Clone)]
pub struct OutgoingOperationEnvelope<M, S> {
    /// The original notification message, never mutated.
    pub message: M,
    /// Current classification; may be downgraded to `Skip` mid-pipeline.
    pub operation: SyncOperation,
    /// Progressively populated service payload.
    pub service_object: Option<S>,
    /// Known external id, present only for updates.
    pub service_id: Option<i64>,
    /// Ordered, append-only list of accumulated warnings.
    pub notes: Vec<String>,
}

impl<M, S> OutgoingOperationEnvelope<M, S> {
    /// Create an envelope classified as insert.
    pub fn insert(message: M) -> Self {
        Self {
            message,
            operation: SyncOperation::Insert,
            service_object: None,
            service_id: None,
            notes: Vec::new(),
        }
    }

    /// Create an envelope classified as update, carrying the known id.
    pub fn update(message: M, service_id: i64) -> Self {
        Self {
            message,
            operation: SyncOperation::Update,
            service_object: None,
            service_id: Some(service_id),
            notes: Vec::new(),
        }
    }

    /// Create an envelope classified as skip with initial notes.
    pub fn skip(message: M, notes: Vec<String>) -> Self {
        Self {
            message,
            operation: SyncOperation::Skip,
            service_object: None,
            service_id: None,
            notes,
        }
    }

    /// Append a note, preserving all earlier notes.
    pub fn add_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

/// Partition of a message batch into three disjoint operation lists.
#[derive(Debug, Clone)]
pub struct OutgoingOperationEnvelopesFiltered<M, S> {
    /// Envelopes that should create a new service object.
    pub inserts: Vec<OutgoingOperationEnvelope<M, S>>,
    /// Envelopes that should update an existing service object.
    pub updates: Vec<OutgoingOperationEnvelope<M, S>>,
    /// Envelopes that will not be synchronized.
    pub skips: Vec<OutgoingOperationEnvelope<M, S>>,
}

impl<M, S> OutgoingOperationEnvelopesFiltered<M, S> {
    /// Total number of envelopes across all three lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inserts.len() + self.updates.len() + self.skips.len()
    }

    /// Check whether no envelope is present at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check whether nothing remains to be written to the service.
    #[must_use]
    pub fn has_no_writes(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

impl<M, S> Default for OutgoingOperationEnvelopesFiltered<M, S> {
    fn default() -> Self {
        Self {
            inserts: Vec::new(),
            updates: Vec::new(),
            skips: Vec::new(),
        }
    }
}
