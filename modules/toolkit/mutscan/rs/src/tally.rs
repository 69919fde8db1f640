use std::ops::AddAssign;

use ahash::AHashMap;
use derive_getters::Getters;
use itertools::Itertools;

use mutscan_core_rs::alignment::AlignedRead;
use mutscan_core_rs::nuc::{Nuc, PerNuc};

use crate::walker;

/// Observations collected at a single reference position.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Getters)]
pub struct PositionTally {
    /// Aligned bases covering the position
    coverage: u64,
    /// Aligned bases that differ from the reference symbol
    mismatches: u64,
    /// Mismatches split by the observed base
    per_base: PerNuc<u64>,
    /// Mismatching bases outside of A/T/C/G (IUPAC codes, lower-case letters, etc)
    other: u64,
}

impl PositionTally {
    #[inline(always)]
    pub fn observe(&mut self, base: u8, template: u8) {
        self.coverage += 1;
        if base == template {
            return;
        }

        self.mismatches += 1;
        match Nuc::try_from(base) {
            Ok(nuc) => self.per_base[nuc] += 1,
            Err(_) => self.other += 1,
        }
    }
}

impl AddAssign<&PositionTally> for PositionTally {
    fn add_assign(&mut self, rhs: &PositionTally) {
        self.coverage += rhs.coverage;
        self.mismatches += rhs.mismatches;
        self.per_base += rhs.per_base;
        self.other += rhs.other;
    }
}

impl AddAssign for PositionTally {
    fn add_assign(&mut self, rhs: PositionTally) {
        *self += &rhs;
    }
}

/// Sparse per-position tally keyed by the 1-based reference position. Only positions with at least
/// one observation are stored.
///
/// The same structure is used for worker-local partial results and for the global tally of a run.
/// Merging is a plain element-wise sum, hence the order of merges doesn't affect the result.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Tally {
    positions: AHashMap<usize, PositionTally>,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a base aligned to the 0-based reference position `pos`.
    #[inline(always)]
    pub fn observe(&mut self, pos: usize, base: u8, template: u8) {
        self.positions
            .entry(pos + 1)
            .or_default()
            .observe(base, template);
    }

    /// Walk the read against the reference and record every aligned base.
    /// Returns false if the read carries no information (no sequence or no alignment).
    pub fn accumulate(&mut self, read: &AlignedRead, reference: &[u8]) -> bool {
        if !read.is_informative() {
            return false;
        }
        for (pos, base) in walker::walk(read, reference.len()) {
            self.observe(pos, base, reference[pos]);
        }
        true
    }

    /// Partial tally for a single read.
    pub fn from_read(read: &AlignedRead, reference: &[u8]) -> Self {
        let mut tally = Self::new();
        tally.accumulate(read, reference);
        tally
    }

    /// Fold another tally into this one.
    pub fn merge(&mut self, other: &Tally) {
        for (pos, cnts) in &other.positions {
            *self.positions.entry(*pos).or_default() += cnts;
        }
    }

    /// Counts at the 1-based `position`, if anything was observed there.
    pub fn get(&self, position: usize) -> Option<&PositionTally> {
        self.positions.get(&position)
    }

    /// Observed positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PositionTally)> {
        self.positions
            .iter()
            .map(|(pos, cnts)| (*pos, cnts))
            .sorted_unstable_by_key(|(pos, _)| *pos)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Drop all observations, keeping the allocated memory.
    pub fn clear(&mut self) {
        self.positions.clear();
    }
}
