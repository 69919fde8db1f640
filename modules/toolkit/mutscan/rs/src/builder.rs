use eyre::{ensure, Result};
use rayon::ThreadPool;
use thread_local::ThreadLocal;

use mutscan_core_rs::parallelism;

use crate::Engine;

pub const DEFAULT_BATCH_SIZE: usize = 1000;

pub struct EngineBuilder {
    thread_pool: Option<ThreadPool>,
    batch_size: usize,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            thread_pool: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl EngineBuilder {
    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    /// Use a dedicated pool with the given number of threads (see [parallelism::available]).
    pub fn set_threads(self, threads: isize) -> Result<Self> {
        Ok(self.set_thread_pool(parallelism::pool(threads)?))
    }

    pub fn set_batch_size(mut self, batch_size: usize) -> Result<Self> {
        ensure!(batch_size > 0, "Batch size must be positive");
        self.batch_size = batch_size;
        Ok(self)
    }

    pub fn build(self) -> Engine {
        Engine::new(self.thread_pool, self.batch_size, ThreadLocal::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_settings() -> Result<()> {
        let engine = EngineBuilder::default().build();
        assert_eq!(engine.batch_size(), DEFAULT_BATCH_SIZE);

        let engine = EngineBuilder::default()
            .set_batch_size(16)?
            .set_threads(1)?
            .build();
        assert_eq!(engine.batch_size(), 16);
        assert_eq!(engine.threads(), 1);

        assert!(EngineBuilder::default().set_batch_size(0).is_err());
        Ok(())
    }
}
