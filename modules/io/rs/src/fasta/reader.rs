use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use derive_getters::Dissolve;
use eyre::{ensure, Result};

use super::record::Record;
use crate::compression::decode;
use crate::traits::ReadRecord;

/// A strict FASTA reader. Carriage returns at the end of lines and empty lines are ignored.
///
/// Returns an error if there are:
/// - Errors while reading from the underlying reader
/// - Extra characters before the first record
/// - Non-alphabetic characters inside the sequence
/// - Empty ID or sequence fields in any record
#[derive(Debug, Clone, Dissolve)]
pub struct Reader<R> {
    reader: R,
}

impl Reader<()> {
    /// Open a FASTA file, decompressing it according to the file extension.
    pub fn from_path(
        path: impl AsRef<Path>,
    ) -> Result<Reader<BufReader<Box<dyn Read + Send + Sync + 'static>>>> {
        let stream = decode::infer_from_path(path)?.boxed();
        Reader::new(BufReader::new(stream))
    }
}

impl<R: BufRead> Reader<R> {
    pub fn new(mut reader: R) -> Result<Self> {
        let buffer = reader.fill_buf()?;
        ensure!(
            buffer.first().map(|x| *x == b'>').unwrap_or(true),
            "Expected '>' at the start of the FASTA file"
        );
        Ok(Self { reader })
    }

    fn read_id(&mut self, id: &mut String) -> Result<()> {
        id.clear();
        let read = self.reader.read_line(id)?;
        ensure!(read > 0, "Unexpected EOF after '>'");
        ensure!(
            id.ends_with('\n'),
            "FASTA ID line is not terminated with a newline: {id}"
        );
        id.pop();
        if id.ends_with('\r') {
            id.pop();
        }
        Record::validate_id(id)
    }

    fn read_seq(&mut self, seq: &mut Vec<u8>) -> Result<()> {
        seq.clear();
        loop {
            let buffer = self.reader.fill_buf()?;
            // EOF or the start of the next record
            if buffer.first().map(|x| *x == b'>').unwrap_or(true) {
                break;
            }

            let (line, consume) = match memchr::memchr(b'\n', buffer) {
                Some(pos) => (&buffer[..pos], pos + 1),
                None => (buffer, buffer.len()),
            };
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            seq.extend_from_slice(line);

            self.reader.consume(consume);
        }
        Record::validate_seq(seq)
    }
}

impl<R: BufRead> ReadRecord for Reader<R> {
    type Record = Record;

    /// Parse the next FASTA record into the given buffer. On error, the buffer is left in an
    /// unspecified state but can be reused.
    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        let buffer = self.reader.fill_buf()?;
        if buffer.is_empty() {
            return Ok(false);
        }
        ensure!(
            buffer[0] == b'>',
            "Expected '>' at the start of the FASTA record"
        );
        self.reader.consume(1);

        let (id, seq) = into.buffers();
        self.read_id(id)?;
        self.read_seq(seq)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eyre::Report;
    use std::io::Cursor;

    fn read_all(content: &str) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        Reader::new(Cursor::new(content))?.read_to_end(&mut records)?;
        Ok(records)
    }

    #[test]
    fn test_empty_fasta_reader() -> Result<()> {
        assert!(read_all("")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_invalid_fasta() {
        for content in [
            " ",
            ">",
            ">id",
            ">id\nAC GT",
            ">id\nACGT\nA1\n",
            ">id\nACGT\n>ID\n",
            "ACGT\n>id\nACGT\n",
        ] {
            let result = read_all(content);
            assert!(result.is_err(), "Content: {:?}", content);

            let result = Reader::new(Cursor::new(content)).and_then(|mut x| {
                let mut record = Record::default();
                while x.read_record(&mut record)? {}
                Ok::<(), Report>(())
            });
            assert!(result.is_err(), "Content: {:?}", content);
        }
    }

    #[test]
    fn test_valid_fasta() -> Result<()> {
        for (content, expected) in [
            (">id\nACGT\n", vec![("id", "ACGT")]),
            (">id\n\nAC\n\nGT\n", vec![("id", "ACGT")]),
            (">id\nACGT", vec![("id", "ACGT")]),
            (
                ">first\r\nAC\r\nGT\r\n>second\nTTTT\n",
                vec![("first", "ACGT"), ("second", "TTTT")],
            ),
        ] {
            let records = read_all(content)?;
            let expected = expected
                .into_iter()
                .map(Record::try_from)
                .collect::<Result<Vec<_>>>()?;
            assert_eq!(records, expected, "Content: {:?}", content);
        }
        Ok(())
    }
}
