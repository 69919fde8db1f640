use std::cell::RefCell;

use derive_more::Constructor;
use eyre::{Result, WrapErr};
use rayon::prelude::*;
use rayon::ThreadPool;
use thread_local::ThreadLocal;

use mutscan_core_rs::alignment::AlignedRead;
use mutscan_io_rs::fasta::Reference;
use mutscan_io_rs::ReadRecord;

use crate::result::{Counts, Stats};
use crate::tally::Tally;
use crate::worker::Worker;
use crate::EngineBuilder;

/// Batched mutation counting.
///
/// Reads are pulled from the source in batches of `batch_size`. Reads within a batch are processed
/// in parallel by thread-local workers, then all partial results are folded into the global tally
/// before the next batch is read. At most `batch_size` reads are held in memory at any time.
#[derive(Constructor)]
pub struct Engine {
    thread_pool: Option<ThreadPool>,
    batch_size: usize,
    workers: ThreadLocal<RefCell<Worker>>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn threads(&self) -> usize {
        match &self.thread_pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    pub fn run<Src>(&mut self, reference: &Reference, source: &mut Src) -> Result<Counts>
    where
        Src: ReadRecord<Record = AlignedRead> + Send + ?Sized,
    {
        match self.thread_pool.take() {
            Some(pool) => {
                let result = pool.install(|| self._run(reference, source));
                self.thread_pool = Some(pool);
                result
            }
            None => self._run(reference, source),
        }
    }

    fn _run<Src>(&mut self, reference: &Reference, source: &mut Src) -> Result<Counts>
    where
        Src: ReadRecord<Record = AlignedRead> + Send + ?Sized,
    {
        log::info!(
            "Counting mutations against {} (batch size: {}, threads: {})",
            reference.id(),
            self.batch_size,
            rayon::current_num_threads()
        );
        let launched_at = std::time::Instant::now();

        // Leftovers from a failed run
        for w in self.workers.iter_mut() {
            w.get_mut().reset();
        }

        let template = reference.seq().as_slice();
        let mut batch = vec![AlignedRead::default(); self.batch_size];
        let mut tally = Tally::new();
        let (mut reads, mut skipped, mut batches) = (0, 0, 0);

        loop {
            let filled = source
                .read_records(&mut batch)
                .wrap_err_with(|| format!("Failed to fetch batch #{}", batches + 1))?;
            if filled == 0 {
                break;
            }
            let started_at = std::time::Instant::now();

            let workers = &self.workers;
            batch[..filled].par_iter().for_each(|read| {
                workers.get_or_default().borrow_mut().process(read, template)
            });

            let (processed, empty) =
                Worker::collapse(&mut tally, self.workers.iter_mut().map(|w| w.get_mut()));
            debug_assert_eq!(processed, filled);

            reads += processed;
            skipped += empty;
            batches += 1;
            log::debug!(
                "Batch #{batches}: {filled} reads processed in {:.3}s",
                started_at.elapsed().as_secs_f64()
            );
        }

        let stats = Stats::new(reads, skipped, batches, launched_at.elapsed().as_secs_f64());
        log::info!(
            "Processed {} reads in {} batches ({:.2}s): {} without alignment or sequence, {} positions covered",
            stats.reads(),
            stats.batches(),
            stats.time_s(),
            stats.skipped(),
            tally.len()
        );
        Ok(Counts::new(tally, stats))
    }
}
