pub use reader::{Format, Reader};

mod convert;
mod reader;
