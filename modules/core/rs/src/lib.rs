pub mod alignment;
pub mod nuc;
pub mod num;
pub mod parallelism;
