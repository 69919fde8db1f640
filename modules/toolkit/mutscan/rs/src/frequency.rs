use mutscan_core_rs::nuc::PerNuc;
use mutscan_core_rs::num::{percent, Float};

use crate::table::{Row, Table};
use crate::tally::Tally;

pub type FrequencyTable<F> = Table<F>;

/// Convert the tally into per-position mutation frequencies (in percents) covering every position
/// of the reference. Positions without coverage get zero frequencies.
pub fn calculate<F: Float>(tally: &Tally, reference: &[u8]) -> FrequencyTable<F> {
    let rows = reference
        .iter()
        .enumerate()
        .map(|(ind, &template)| {
            let position = ind + 1;
            match tally.get(position) {
                None => Row::new(position, template, F::zero(), PerNuc::default()),
                Some(cnts) => {
                    let coverage = *cnts.coverage();
                    Row::new(
                        position,
                        template,
                        percent(*cnts.mismatches(), coverage),
                        cnts.per_base().map(|_, x| percent(x, coverage)),
                    )
                }
            }
        })
        .collect();
    Table::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscan_core_rs::alignment::{Op, OpKind};
    use mutscan_core_rs::alignment::AlignedRead;
    use mutscan_core_rs::nuc::Nuc;

    fn read(seq: &str) -> AlignedRead {
        AlignedRead::new(
            "read".into(),
            Some(seq.as_bytes().to_vec()),
            0,
            Some(vec![Op::new(OpKind::Match, seq.len())]),
        )
    }

    #[test]
    fn test_frequencies() {
        let reference = b"ACGTA";
        let mut tally = Tally::new();
        for seq in ["ACGT", "ACCT", "ACTT", "TCCT"] {
            tally.accumulate(&read(seq), reference);
        }

        let table: FrequencyTable<f64> = calculate(&tally, reference);
        assert_eq!(table.len(), 5);

        let first = table.get(1).unwrap();
        assert_eq!(*first.template(), b'A');
        assert_eq!(*first.total(), 25.0);
        assert_eq!(first.per_base().into_inner(), [0.0, 25.0, 0.0, 0.0]);

        let third = table.get(3).unwrap();
        assert_eq!(*third.template(), b'G');
        assert_eq!(*third.total(), 75.0);
        assert_eq!(third.per_base()[Nuc::C], 50.0);
        assert_eq!(third.per_base()[Nuc::T], 25.0);

        // No coverage
        let last = table.get(5).unwrap();
        assert_eq!(*last.template(), b'A');
        assert_eq!(*last.total(), 0.0);
        assert_eq!(last.per_base().into_inner(), [0.0; 4]);
    }

    #[test]
    fn test_empty_tally() {
        let table: FrequencyTable<f32> = calculate(&Tally::new(), b"ACGT");
        let templates = table.iter().map(|row| *row.template()).collect::<Vec<_>>();
        assert_eq!(templates, b"ACGT".to_vec());
        assert!(table.iter().all(|row| *row.total() == 0.0));
    }
}
