use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use derive_getters::Getters;
use eyre::{Result, WrapErr};
use noodles::{bam, sam};

use mutscan_core_rs::alignment::AlignedRead;

use super::convert::{self, Converted};
use crate::compression::decode;
use crate::traits::ReadRecord;

type Stream = Box<dyn Read + Send + Sync + 'static>;

/// Alignment file format. BAM is detected by the `.bam` extension, everything else is read as SAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Sam,
    Bam,
}

impl Format {
    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bam") => Format::Bam,
            _ => Format::Sam,
        }
    }
}

enum Inner {
    Sam {
        reader: sam::io::Reader<BufReader<Stream>>,
        record: sam::Record,
    },
    Bam {
        reader: bam::io::Reader<Stream>,
        record: bam::Record,
    },
}

/// Sequential, single-pass reader of alignment records. Every record in the file is reported,
/// including unmapped ones, which come out as reads without alignment operations.
#[derive(Getters)]
pub struct Reader {
    path: PathBuf,
    #[getter(skip)]
    inner: Inner,
    /// Records read so far
    records: usize,
    /// Records without a sequence or an alignment
    uninformative: usize,
    /// Records with CIGAR operations outside of M/I/D/S/H
    unsupported: usize,
    #[getter(skip)]
    exhausted: bool,
}

impl Reader {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = Format::infer_from_path(path);
        let stream = match format {
            Format::Sam => decode::infer_from_path(path)?.boxed(),
            // BAM is always BGZF-compressed
            Format::Bam => {
                let file = std::fs::File::open(path)
                    .wrap_err_with(|| format!("Failed to open {}", path.display()))?;
                decode::Stream::new(file, &decode::Config::Bgzf).boxed()
            }
        };
        Self::new(path, format, stream)
    }

    pub fn new(path: impl Into<PathBuf>, format: Format, stream: Stream) -> Result<Self> {
        let path = path.into();
        let inner = match format {
            Format::Sam => {
                let mut reader = sam::io::Reader::new(BufReader::new(stream));
                reader
                    .read_header()
                    .wrap_err_with(|| format!("Failed to read SAM header: {}", path.display()))?;
                Inner::Sam {
                    reader,
                    record: sam::Record::default(),
                }
            }
            Format::Bam => {
                let mut reader = bam::io::Reader::from(stream);
                reader
                    .read_header()
                    .wrap_err_with(|| format!("Failed to read BAM header: {}", path.display()))?;
                Inner::Bam {
                    reader,
                    record: bam::Record::default(),
                }
            }
        };
        log::debug!("Opened {:?} alignment file {}", format, path.display());

        Ok(Self {
            path,
            inner,
            records: 0,
            uninformative: 0,
            unsupported: 0,
            exhausted: false,
        })
    }

    fn next(&mut self, into: &mut AlignedRead) -> std::io::Result<Option<Converted>> {
        match &mut self.inner {
            Inner::Sam { reader, record } => {
                if reader.read_record(record)? == 0 {
                    return Ok(None);
                }
                convert::from_sam(record, into).map(Some)
            }
            Inner::Bam { reader, record } => {
                if reader.read_record(record)? == 0 {
                    return Ok(None);
                }
                convert::from_bam(record, into).map(Some)
            }
        }
    }

    fn report(&mut self) {
        if self.exhausted {
            return;
        }
        self.exhausted = true;

        log::debug!(
            "Finished reading {}: {} records, {} without sequence or alignment",
            self.path.display(),
            self.records,
            self.uninformative
        );
        if self.unsupported > 0 {
            log::warn!(
                "{} records in {} were ignored: their CIGAR contains operations other than M/I/D/S/H",
                self.unsupported,
                self.path.display()
            );
        }
    }
}

impl ReadRecord for Reader {
    type Record = AlignedRead;

    fn read_record(&mut self, into: &mut Self::Record) -> Result<bool> {
        let status = self.next(into).wrap_err_with(|| {
            format!(
                "Failed to parse alignment record #{} in {}",
                self.records + 1,
                self.path.display()
            )
        })?;

        match status {
            None => {
                self.report();
                Ok(false)
            }
            Some(status) => {
                self.records += 1;
                match status {
                    Converted::Aligned => {}
                    Converted::Uninformative => self.uninformative += 1,
                    Converted::Unsupported => self.unsupported += 1,
                }
                Ok(true)
            }
        }
    }
}
