pub use builder::{EngineBuilder, DEFAULT_BATCH_SIZE};
pub use engine::Engine;
pub use result::{Counts, Stats};
pub use tally::{PositionTally, Tally};

mod builder;
pub mod enrichment;
mod engine;
pub mod frequency;
mod result;
pub mod table;
pub mod tally;
pub mod walker;
mod worker;
