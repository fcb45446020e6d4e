//! In-memory numbering sequences

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use core_kernel::{DomainPort, PortError, SequenceId};
use domain_rental::SequencePort;

#[derive(Debug, Clone)]
struct SequenceState {
    prefix: String,
    padding: usize,
    next: u64,
}

/// Sequences producing `PREFIX0001`-style values
///
/// Values are handed out under their own lock and are not part of any unit
/// of work, so a rolled back transition leaves a gap.
#[derive(Debug, Default)]
pub struct MemorySequence {
    sequences: Mutex<HashMap<SequenceId, SequenceState>>,
}

impl MemorySequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a new sequence and returns its id
    pub fn define(&self, prefix: impl Into<String>, padding: usize) -> SequenceId {
        let id = SequenceId::new();
        self.define_with_id(id, prefix, padding);
        id
    }

    /// Defines (or resets) the sequence `id`
    pub fn define_with_id(&self, id: SequenceId, prefix: impl Into<String>, padding: usize) {
        let state = SequenceState {
            prefix: prefix.into(),
            padding,
            next: 1,
        };
        self.sequences
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, state);
    }
}

impl DomainPort for MemorySequence {}

impl SequencePort for MemorySequence {
    fn next(&self, sequence: SequenceId) -> Result<String, PortError> {
        let mut sequences = self.sequences.lock().unwrap_or_else(PoisonError::into_inner);
        let state = sequences
            .get_mut(&sequence)
            .ok_or_else(|| PortError::not_found("Sequence", sequence))?;

        let value = format!("{}{:0width$}", state.prefix, state.next, width = state.padding);
        state.next += 1;

        debug!(sequence_id = %sequence, %value, "Issued sequence value");
        Ok(value)
    }
}
