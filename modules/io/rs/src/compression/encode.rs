use std::fs::File;
use std::io::Write;
use std::path::Path;

use eyre::{ensure, Result, WrapErr};
use noodles::bgzf;

/// Compression of an output stream. `level` is the DEFLATE level in [0, 9].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Config {
    #[default]
    Uncompressed,
    Gzip { level: u8 },
    Bgzf { level: u8 },
}

impl Config {
    pub const DEFAULT_LEVEL: u8 = 6;

    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext {
                "gz" | "gzip" => Config::Gzip {
                    level: Self::DEFAULT_LEVEL,
                },
                "bgz" | "bgzf" => Config::Bgzf {
                    level: Self::DEFAULT_LEVEL,
                },
                _ => Config::Uncompressed,
            })
            .unwrap_or_default()
    }
}

pub enum Stream<W: Write + Send + Sync + 'static> {
    Raw(W),
    Gzip(flate2::write::GzEncoder<W>),
    Bgzf(bgzf::io::Writer<W>),
}

impl<W: Write + Send + Sync + 'static> Stream<W> {
    pub fn new(inner: W, config: &Config) -> Result<Self> {
        match *config {
            Config::Uncompressed => Ok(Stream::Raw(inner)),
            Config::Gzip { level } => {
                ensure!(level <= 9, "Invalid DEFLATE compression level: {level}");
                let encoder =
                    flate2::write::GzEncoder::new(inner, flate2::Compression::new(level as u32));
                Ok(Stream::Gzip(encoder))
            }
            Config::Bgzf { level } => {
                let level = bgzf::io::writer::CompressionLevel::new(level)
                    .ok_or_else(|| eyre::eyre!("Invalid BGZF compression level: {level}"))?;
                let writer = bgzf::io::writer::Builder::default()
                    .set_compression_level(level)
                    .build_from_writer(inner);
                Ok(Stream::Bgzf(writer))
            }
        }
    }

    /// Write the compression trailer (if any) and return the underlying writer.
    /// Errors that would be silently dropped on `Drop` are reported here.
    pub fn finish(self) -> Result<W> {
        let mut inner = match self {
            Stream::Raw(w) => w,
            Stream::Gzip(w) => w.finish()?,
            Stream::Bgzf(w) => w.finish()?,
        };
        inner.flush()?;
        Ok(inner)
    }

    pub fn boxed(self) -> Box<dyn Write + Send + Sync + 'static> {
        match self {
            Stream::Raw(w) => Box::new(w),
            Stream::Gzip(w) => Box::new(w),
            Stream::Bgzf(w) => Box::new(w),
        }
    }
}

impl<W: Write + Send + Sync + 'static> Write for Stream<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Stream::Raw(w) => w.write(buf),
            Stream::Gzip(w) => w.write(buf),
            Stream::Bgzf(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Stream::Raw(w) => w.flush(),
            Stream::Gzip(w) => w.flush(),
            Stream::Bgzf(w) => w.flush(),
        }
    }
}

/// Create the file and compress the output according to its extension.
pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Stream<File>> {
    let path = path.as_ref();
    let file =
        File::create(path).wrap_err_with(|| format!("Failed to create {}", path.display()))?;
    Stream::new(file, &Config::infer_from_path(path))
}
