use std::fs::File;
use std::io::Read;
use std::path::Path;

use eyre::{Result, WrapErr};
use noodles::bgzf;

/// Compression of an input stream. Inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Config {
    #[default]
    Uncompressed,
    Gzip,
    Bgzf,
}

impl Config {
    pub fn infer_from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| match ext {
                "gz" | "gzip" => Config::Gzip,
                "bgz" | "bgzf" => Config::Bgzf,
                _ => Config::Uncompressed,
            })
            .unwrap_or_default()
    }
}

pub enum Stream<R: Read + Send + Sync + 'static> {
    Raw(R),
    Gzip(flate2::read::MultiGzDecoder<R>),
    Bgzf(bgzf::io::Reader<R>),
}

impl<R: Read + Send + Sync + 'static> Stream<R> {
    pub fn new(inner: R, config: &Config) -> Self {
        match config {
            Config::Uncompressed => Stream::Raw(inner),
            Config::Gzip => Stream::Gzip(flate2::read::MultiGzDecoder::new(inner)),
            Config::Bgzf => Stream::Bgzf(bgzf::io::Reader::new(inner)),
        }
    }

    pub fn boxed(self) -> Box<dyn Read + Send + Sync + 'static> {
        match self {
            Stream::Raw(r) => Box::new(r),
            Stream::Gzip(r) => Box::new(r),
            Stream::Bgzf(r) => Box::new(r),
        }
    }
}

impl<R: Read + Send + Sync + 'static> Read for Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Stream::Raw(r) => r.read(buf),
            Stream::Gzip(r) => r.read(buf),
            Stream::Bgzf(r) => r.read(buf),
        }
    }
}

/// Open the file and decompress it according to its extension.
pub fn infer_from_path(path: impl AsRef<Path>) -> Result<Stream<File>> {
    let path = path.as_ref();
    let file =
        File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    Ok(Stream::new(file, &Config::infer_from_path(path)))
}
