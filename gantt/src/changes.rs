#[cfg(test)]
#[path = "changes_test.rs"]
mod changes_test;

use uuid::Uuid;

use crate::wire::ChangeOp;

/// The set of locally-applied changes not yet confirmed by the server.
///
/// Ordering is preserved, but the set holds at most one op per allocation:
/// a second change to the same allocation before the first is confirmed
/// supersedes it (only the final position matters to the solver).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PendingChangeSet {
    ops: Vec<ChangeOp>,
}

impl PendingChangeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a change, replacing any earlier op for the same allocation.
    pub fn record(&mut self, op: ChangeOp) {
        if let Some(existing) = self.position_of(op.allocation_id()) {
            self.ops[existing] = op;
        } else {
            self.ops.push(op);
        }
    }

    /// Drain every pending op, leaving the set empty.
    pub fn take_all(&mut self) -> Vec<ChangeOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    fn position_of(&self, allocation_id: Uuid) -> Option<usize> {
        self.ops.iter().position(|op| op.allocation_id() == allocation_id)
    }
}
