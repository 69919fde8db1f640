use std::path::Path;

use derive_getters::{Dissolve, Getters};
use eyre::{bail, Result, WrapErr};

use super::reader::Reader;
use super::record::Record;
use crate::traits::ReadRecord;

/// The nucleotide sequence mutations are measured against. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters, Dissolve)]
pub struct Reference {
    id: String,
    seq: Vec<u8>,
}

impl Reference {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Result<Self> {
        let (id, seq) = Record::new(id.into(), seq.into())?.dissolve();
        Ok(Self { id, seq })
    }

    /// Load the first record of a FASTA file. Remaining records are ignored.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading reference sequence from {}", path.display());

        let mut reader = Reader::from_path(path)
            .wrap_err_with(|| format!("Failed to open the reference {}", path.display()))?;

        let mut record = Record::default();
        let found = reader
            .read_record(&mut record)
            .wrap_err_with(|| format!("Failed to parse the reference {}", path.display()))?;
        if !found {
            bail!("Reference file {} contains no FASTA records", path.display());
        }

        let (id, seq) = record.dissolve();
        log::info!("Loaded reference {id} ({} bp)", seq.len());
        Ok(Self { id, seq })
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// Reference symbol at the 1-based `position`.
    pub fn template(&self, position: usize) -> Option<u8> {
        position.checked_sub(1).and_then(|x| self.seq.get(x).copied())
    }
}
