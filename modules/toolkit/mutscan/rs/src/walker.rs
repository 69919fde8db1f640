use std::slice::Iter;

use mutscan_core_rs::alignment::{AlignedRead, Op, OpKind};

/// Lazily walks the alignment of a single read and yields `(0-based reference position, query base)`
/// pairs for every aligned (M) base that falls inside both the reference and the query sequence.
///
/// Inserted, deleted and clipped bases are never reported. Hard clips advance the query cursor just
/// like soft clips do.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    query: &'a [u8],
    ops: Iter<'a, Op>,
    reflen: usize,
    refpos: i64,
    qpos: usize,
    // Bases left in the current M operation
    pending: usize,
}

impl<'a> Walk<'a> {
    pub fn new(query: &'a [u8], start: i64, ops: &'a [Op], reflen: usize) -> Self {
        Self {
            query,
            ops: ops.iter(),
            reflen,
            refpos: start,
            qpos: 0,
            pending: 0,
        }
    }

    #[inline(always)]
    fn exhausted(&self) -> bool {
        self.qpos >= self.query.len() || (self.refpos >= 0 && self.refpos as usize >= self.reflen)
    }
}

impl Iterator for Walk<'_> {
    type Item = (usize, u8);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pending > 0 {
                // Nothing left to emit in this block, fast-forward the cursors
                if self.exhausted() {
                    self.refpos += self.pending as i64;
                    self.qpos += self.pending;
                    self.pending = 0;
                    continue;
                }

                let (refpos, qpos) = (self.refpos, self.qpos);
                self.refpos += 1;
                self.qpos += 1;
                self.pending -= 1;

                if refpos >= 0 {
                    return Some((refpos as usize, self.query[qpos]));
                }
                continue;
            }

            let op = self.ops.next()?;
            match op.kind() {
                OpKind::Match => self.pending = op.len(),
                OpKind::Insertion | OpKind::SoftClip | OpKind::HardClip => self.qpos += op.len(),
                OpKind::Deletion => self.refpos += op.len() as i64,
            }
        }
    }
}

/// Walk the alignment of the read against a reference of length `reflen`. Reads without a sequence
/// or without alignment operations produce an empty walk.
pub fn walk(read: &AlignedRead, reflen: usize) -> Walk<'_> {
    match (read.sequence(), read.ops()) {
        (Some(query), Some(ops)) => Walk::new(query, *read.start(), ops, reflen),
        _ => Walk::new(&[], *read.start(), &[], reflen),
    }
}
