pub use op::{parse_cigar, Op, OpKind};
pub use read::AlignedRead;

mod op;
mod read;
