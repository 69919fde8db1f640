use eyre::{ensure, Result};

use mutscan_core_rs::num::Float;

use crate::table::{Row, Table};

pub type EnrichmentTable<F> = Table<F>;

/// Position-wise difference `signal - control` of two frequency tables.
///
/// Both tables must be derived from the same reference: they must have the same positions and
/// template bases, otherwise an error is returned.
pub fn calculate<F: Float>(signal: &Table<F>, control: &Table<F>) -> Result<EnrichmentTable<F>> {
    ensure!(
        signal.len() == control.len(),
        "Frequency tables cover different number of positions: {} vs {}",
        signal.len(),
        control.len()
    );

    let mut rows = Vec::with_capacity(signal.len());
    for (s, c) in signal.iter().zip(control.iter()) {
        ensure!(
            s.position() == c.position() && s.template() == c.template(),
            "Frequency tables are derived from different references: position {} ({}) vs position {} ({})",
            s.position(),
            *s.template() as char,
            c.position(),
            *c.template() as char
        );
        rows.push(Row::new(
            *s.position(),
            *s.template(),
            *s.total() - *c.total(),
            s.per_base().zip_with(*c.per_base(), |_, x, y| x - y),
        ));
    }
    Ok(Table::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutscan_core_rs::nuc::PerNuc;

    fn table(rows: &[(u8, f64, [f64; 4])]) -> Table<f64> {
        Table::new(
            rows.iter()
                .enumerate()
                .map(|(ind, (template, total, per_base))| {
                    Row::new(ind + 1, *template, *total, PerNuc::from(*per_base))
                })
                .collect(),
        )
    }

    #[test]
    fn test_enrichment() -> Result<()> {
        let signal = table(&[(b'A', 50.0, [0.0, 25.0, 25.0, 0.0]), (b'C', 0.0, [0.0; 4])]);
        let control = table(&[(b'A', 10.0, [0.0, 10.0, 0.0, 0.0]), (b'C', 20.0, [20.0, 0.0, 0.0, 0.0])]);

        let enrichment = calculate(&signal, &control)?;
        assert_eq!(
            enrichment,
            table(&[(b'A', 40.0, [0.0, 15.0, 25.0, 0.0]), (b'C', -20.0, [-20.0, 0.0, 0.0, 0.0])])
        );
        Ok(())
    }

    #[test]
    fn test_self_enrichment() -> Result<()> {
        let signal = table(&[(b'A', 50.0, [0.0, 25.0, 25.0, 0.0]), (b'G', 12.5, [12.5, 0.0, 0.0, 0.0])]);
        let enrichment = calculate(&signal, &signal)?;

        for (row, original) in enrichment.iter().zip(signal.iter()) {
            assert_eq!(row.template(), original.template());
            assert_eq!(*row.total(), 0.0);
            assert!(row.per_base().values().all(|x| *x == 0.0));
        }
        Ok(())
    }

    #[test]
    fn test_mismatched_domains() {
        let first = table(&[(b'A', 0.0, [0.0; 4]), (b'C', 0.0, [0.0; 4])]);
        let shorter = table(&[(b'A', 0.0, [0.0; 4])]);
        let different = table(&[(b'A', 0.0, [0.0; 4]), (b'G', 0.0, [0.0; 4])]);

        assert!(calculate(&first, &shorter).is_err());
        assert!(calculate(&first, &different).is_err());
    }
}
