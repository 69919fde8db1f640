use derive_getters::{Dissolve, Getters};
use eyre::{ensure, Result};

/// A single FASTA record with the following guarantees:
/// - The ID is non-empty and can't contain any newline characters (CR or LF).
/// - The sequence is non-empty and contains only ASCII alphabetic characters.
///
/// There are no guarantees on the biological meaningfulness of the stored sequence.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Dissolve, Getters)]
pub struct Record {
    id: String,
    seq: Vec<u8>,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            id: "Default ID".to_string(),
            seq: b"ACGT".to_vec(),
        }
    }
}

impl TryFrom<(&str, &str)> for Record {
    type Error = eyre::Report;

    fn try_from((id, seq): (&str, &str)) -> Result<Self> {
        Self::new(id.to_string(), seq.as_bytes().to_vec())
    }
}

impl Record {
    pub fn new(id: String, seq: Vec<u8>) -> Result<Self> {
        Self::validate_id(&id)?;
        Self::validate_seq(&seq)?;
        Ok(Self { id, seq })
    }

    pub fn validate_id(id: &str) -> Result<()> {
        ensure!(!id.is_empty(), "FASTA ID cannot be empty");
        ensure!(
            !id.contains(&['\n', '\r'] as &[char]),
            "Newline characters are not allowed in the FASTA ID: {id}"
        );
        Ok(())
    }

    pub fn validate_seq(seq: &[u8]) -> Result<()> {
        ensure!(!seq.is_empty(), "FASTA sequence cannot be empty");
        if let Some(i) = seq.iter().position(|x| !x.is_ascii_alphabetic()) {
            eyre::bail!("Non-alphabetic character at index {i} = {:?}", seq[i] as char);
        }
        Ok(())
    }

    /// Buffers for in-place parsing. The reader validates both fields before returning the record.
    pub(crate) fn buffers(&mut self) -> (&mut String, &mut Vec<u8>) {
        (&mut self.id, &mut self.seq)
    }
}
