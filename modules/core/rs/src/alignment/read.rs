use derive_getters::Getters;

use super::op::Op;

/// A read already placed on the reference. Only the fields needed to walk the alignment are kept.
///
/// A read without a query sequence or without alignment operations carries no information about
/// the reference and is ignored downstream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Getters)]
pub struct AlignedRead {
    /// Read name, used only in diagnostics
    name: String,
    /// Query bases as stored in the alignment record
    sequence: Option<Vec<u8>>,
    /// 0-based position of the first aligned reference base
    start: i64,
    /// Gapped alignment, consumed left to right
    ops: Option<Vec<Op>>,
}

impl AlignedRead {
    pub fn new(name: String, sequence: Option<Vec<u8>>, start: i64, ops: Option<Vec<Op>>) -> Self {
        Self {
            name,
            sequence,
            start,
            ops,
        }
    }

    /// Both the query sequence and the alignment operations are present.
    pub fn is_informative(&self) -> bool {
        self.sequence.is_some() && self.ops.is_some()
    }

    /// Reset the read in-place keeping allocated buffers for reuse.
    /// Returns the name, sequence and operation buffers to be filled by the caller.
    pub fn recycle(&mut self, start: i64) -> (&mut String, &mut Vec<u8>, &mut Vec<Op>) {
        self.name.clear();
        self.start = start;

        self.sequence.get_or_insert_with(Vec::new).clear();
        self.ops.get_or_insert_with(Vec::new).clear();

        (
            &mut self.name,
            self.sequence.get_or_insert_with(Vec::new),
            self.ops.get_or_insert_with(Vec::new),
        )
    }

    /// Mark the query sequence as absent.
    pub fn drop_sequence(&mut self) {
        self.sequence = None;
    }

    /// Mark the alignment operations as absent.
    pub fn drop_ops(&mut self) {
        self.ops = None;
    }
}
