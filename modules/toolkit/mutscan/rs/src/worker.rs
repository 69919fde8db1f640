use derive_getters::Dissolve;

use mutscan_core_rs::alignment::AlignedRead;

use crate::tally::Tally;

/// Thread-local accumulator. Reads processed by the same rayon thread within a batch are folded
/// into a single partial tally that is later collapsed into the global one.
#[derive(Debug, Default, Dissolve)]
pub struct Worker {
    tally: Tally,
    reads: usize,
    skipped: usize,
}

impl Worker {
    pub fn process(&mut self, read: &AlignedRead, reference: &[u8]) {
        self.reads += 1;
        if !self.tally.accumulate(read, reference) {
            self.skipped += 1;
        }
    }

    pub fn reset(&mut self) {
        self.tally.clear();
        self.reads = 0;
        self.skipped = 0;
    }

    /// Fold partial results of all workers into the global tally and reset the workers.
    /// Returns the number of processed and skipped reads.
    pub fn collapse<'a>(
        global: &mut Tally,
        workers: impl Iterator<Item = &'a mut Worker>,
    ) -> (usize, usize) {
        let (mut reads, mut skipped) = (0, 0);
        for worker in workers {
            global.merge(&worker.tally);
            reads += worker.reads;
            skipped += worker.skipped;
            worker.reset();
        }
        (reads, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscan_core_rs::alignment::{Op, OpKind};

    #[test]
    fn test_collapse() {
        let reference = b"ACGT";
        let aligned = AlignedRead::new(
            "r1".into(),
            Some(b"AGGT".to_vec()),
            0,
            Some(vec![Op::new(OpKind::Match, 4)]),
        );
        let unmapped = AlignedRead::new("r2".into(), Some(b"AGGT".to_vec()), -1, None);

        let mut workers = vec![Worker::default(), Worker::default()];
        workers[0].process(&aligned, reference);
        workers[0].process(&unmapped, reference);
        workers[1].process(&aligned, reference);

        let mut global = Tally::new();
        let (reads, skipped) = Worker::collapse(&mut global, workers.iter_mut());
        assert_eq!((reads, skipped), (3, 1));
        assert_eq!(*global.get(2).unwrap().coverage(), 2);
        assert_eq!(*global.get(2).unwrap().mismatches(), 2);

        // Workers are ready for the next batch
        for w in workers {
            let (tally, reads, skipped) = w.dissolve();
            assert!(tally.is_empty());
            assert_eq!((reads, skipped), (0, 0));
        }
    }
}
