use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use crate::tally::Tally;

#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Stats {
    // Total reads pulled from the source
    reads: usize,
    // Reads without a sequence or an alignment
    skipped: usize,
    // Number of processed batches
    batches: usize,
    // Wall time of the run
    time_s: f64,
}

#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Counts {
    tally: Tally,
    stats: Stats,
}
