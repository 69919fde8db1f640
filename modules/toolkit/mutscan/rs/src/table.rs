use std::fs::File;
use std::io::{Read, Write};
use std::marker::PhantomData;
use std::path::Path;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::{bail, ensure, eyre, OptionExt, Result, WrapErr};

use mutscan_core_rs::nuc::{Nuc, PerNuc};
use mutscan_core_rs::num::Float;
use mutscan_io_rs::compression::{decode, encode};
use mutscan_io_rs::{ReadRecord, WriteRecord};

pub const HEADER: [&str; 7] = ["Position", "Template_Base", "Total", "A", "T", "C", "G"];

/// Per-position percentages. Frequencies are in [0, 100], enrichment rows hold signed differences.
#[derive(Clone, Copy, PartialEq, Debug, Default, Constructor, Getters)]
pub struct Row<F> {
    /// 1-based reference position
    position: usize,
    template: u8,
    total: F,
    per_base: PerNuc<F>,
}

/// Rows ordered by ascending position.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Table<F> {
    rows: Vec<Row<F>>,
}

impl<F> Table<F> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row<F>> {
        self.rows.iter()
    }

    pub fn get(&self, position: usize) -> Option<&Row<F>> {
        self.rows
            .binary_search_by_key(&position, |row| row.position)
            .ok()
            .map(|ind| &self.rows[ind])
    }
}

impl Table<f64> {
    /// Load a table previously saved with the [Writer].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut rows = Vec::new();
        Reader::from_path(path)?
            .read_to_end(&mut rows)
            .wrap_err_with(|| format!("Failed to read table {}", path.display()))?;
        Ok(Self::new(rows))
    }
}

/// CSV sink for frequency and enrichment tables.
pub struct Writer<W: Write, F> {
    inner: csv::Writer<W>,
    phantom: PhantomData<F>,
}

impl<F: Float> Writer<encode::Stream<File>, F> {
    /// Create the file, compression is inferred from the extension.
    /// Call [Writer::finish] once all rows are written.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stream = encode::infer_from_path(path)?;
        Self::new(stream).wrap_err_with(|| format!("Failed to write table {}", path.display()))
    }
}

impl<W: Write + Send + Sync + 'static, F: Float> Writer<encode::Stream<W>, F> {
    /// Flush buffered rows and finalize the compressed stream.
    pub fn finish(self) -> Result<()> {
        self.into_inner()?.finish()?;
        Ok(())
    }
}

impl<W: Write, F: Float> Writer<W, F> {
    pub fn new(inner: W) -> Result<Self> {
        let mut inner = csv::Writer::from_writer(inner);
        inner.write_record(HEADER)?;
        Ok(Self {
            inner,
            phantom: PhantomData,
        })
    }

    pub fn into_inner(self) -> Result<W> {
        self.inner.into_inner().map_err(|err| eyre!(err.error().to_string()))
    }
}

impl<W: Write, F: Float> WriteRecord for Writer<W, F> {
    type Record = Row<F>;

    fn write_record(&mut self, row: &Self::Record) -> Result<()> {
        self.inner.write_field(row.position.to_string())?;
        self.inner.write_field([row.template])?;
        self.inner.write_field(format!("{:?}", row.total))?;
        for value in row.per_base.values() {
            self.inner.write_field(format!("{value:?}"))?;
        }
        self.inner.write_record(None::<&[u8]>)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

pub struct Reader<R: Read> {
    inner: csv::Reader<R>,
    record: csv::StringRecord,
}

impl Reader<Box<dyn Read + Send + Sync + 'static>> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let stream = decode::infer_from_path(path)?.boxed();
        Self::new(stream).wrap_err_with(|| format!("Failed to read table {}", path.display()))
    }
}

impl<R: Read> Reader<R> {
    pub fn new(inner: R) -> Result<Self> {
        let mut inner = csv::ReaderBuilder::new().has_headers(true).from_reader(inner);
        let header = inner.headers()?;
        ensure!(
            header.iter().eq(HEADER),
            "Unexpected table header: {:?}, expected: {:?}",
            header,
            HEADER
        );
        Ok(Self {
            inner,
            record: csv::StringRecord::new(),
        })
    }

    fn parse(&self) -> Result<Row<f64>> {
        ensure!(
            self.record.len() == HEADER.len(),
            "Expected {} columns, got {}",
            HEADER.len(),
            self.record.len()
        );

        let position = self.record[0].parse()?;
        let template = match self.record[1].as_bytes() {
            [symbol] => *symbol,
            _ => bail!("Template base must be a single symbol: {}", &self.record[1]),
        };
        let total = self.record[2].parse()?;

        let mut per_base = PerNuc::<f64>::default();
        for (ind, nuc) in Nuc::ALL.into_iter().enumerate() {
            per_base[nuc] = self
                .record
                .get(3 + ind)
                .ok_or_eyre("Missing per-base column")?
                .parse()?;
        }
        Ok(Row::new(position, template, total, per_base))
    }
}

impl<R: Read> ReadRecord for Reader<R> {
    type Record = Row<f64>;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        if !self.inner.read_record(&mut self.record)? {
            return Ok(false);
        }
        *into = self.parse().wrap_err_with(|| {
            let line = self.record.position().map(|x| x.line()).unwrap_or_default();
            format!("Malformed table row at line {line}")
        })?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table<f64> {
        Table::new(vec![
            Row::new(1, b'A', 0.0, PerNuc::default()),
            Row::new(2, b'C', 50.0, PerNuc::from([25.0, 0.0, 0.0, 25.0])),
            Row::new(3, b'G', -12.5, PerNuc::from([0.0, -12.5, 0.0, 0.0])),
        ])
    }

    #[test]
    fn test_write_table() -> Result<()> {
        let mut writer = Writer::<_, f64>::new(Vec::new())?;
        writer.write_records(table().iter())?;
        let content = String::from_utf8(writer.into_inner()?)?;

        assert_eq!(
            content,
            "Position,Template_Base,Total,A,T,C,G\n\
             1,A,0.0,0.0,0.0,0.0,0.0\n\
             2,C,50.0,25.0,0.0,0.0,25.0\n\
             3,G,-12.5,0.0,-12.5,0.0,0.0\n"
        );
        Ok(())
    }

    #[test]
    fn test_table_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        for name in ["table.csv", "table.csv.gz", "table.csv.bgz"] {
            let path = dir.path().join(name);

            let mut writer = Writer::<_, f64>::from_path(&path)?;
            writer.write_records(table().iter())?;
            writer.finish()?;

            let restored = Table::from_path(&path)?;
            assert_eq!(restored, table(), "File: {name}");
            assert_eq!(restored.get(2).map(|x| *x.total()), Some(50.0));
            assert!(restored.get(4).is_none());
        }
        Ok(())
    }

    #[test]
    fn test_malformed_tables() {
        for content in [
            "Position,Base,Total,A,T,C,G\n1,A,0,0,0,0,0\n",
            "Position,Template_Base,Total,A,T,C,G\n1,AC,0,0,0,0,0\n",
            "Position,Template_Base,Total,A,T,C,G\nfirst,A,0,0,0,0,0\n",
            "Position,Template_Base,Total,A,T,C,G\n1,A,0,0,0,zero,0\n",
        ] {
            let result = Reader::new(content.as_bytes()).and_then(|mut reader| {
                let mut rows = Vec::new();
                reader.read_to_end(&mut rows)
            });
            assert!(result.is_err(), "Content: {content}");
        }
    }
}
