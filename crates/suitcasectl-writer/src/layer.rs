use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::encrypt::Encryptor;
use crate::error::WriterError;

/// One stage of the WriterStack: the stack composes regardless of which
/// layers are present — tar writes through zero or more
/// compression/encryption layers down to a single file sink.
///
/// Finalization walks the stack from the layer the caller holds (the
/// outermost from the code's perspective, even though it is first in the
/// byte-flow) down to the sink, flushing each layer's trailer into the
/// next before moving on. `finish_boxed` returns the next layer down, or
/// `None` once the sink itself has been closed.
pub trait SuitcaseLayer: Write + Send {
    fn finish_boxed(self: Box<Self>) -> io::Result<Option<Box<dyn SuitcaseLayer>>>;
}

/// The innermost layer: a suitcase file on disk.
pub struct FileLayer {
    path: PathBuf,
    file: File,
}

impl FileLayer {
    pub fn create(path: &Path) -> Result<Self, WriterError> {
        let file = File::create(path)
            .map_err(|source| WriterError::Sink { path: path.to_path_buf(), source })?;
        tracing::debug!(path = %path.display(), "opened suitcase sink");
        Ok(Self { path: path.to_path_buf(), file })
    }
}

impl Write for FileLayer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl SuitcaseLayer for FileLayer {
    fn finish_boxed(mut self: Box<Self>) -> io::Result<Option<Box<dyn SuitcaseLayer>>> {
        self.flush()?;
        self.file.sync_all()?;
        Ok(None)
    }
}

/// Gzip compression layer, used for `.tar.gz` and `.tar.gz.gpg`.
pub struct GzLayer {
    inner: flate2::write::GzEncoder<Box<dyn SuitcaseLayer>>,
}

impl GzLayer {
    pub fn wrap(next: Box<dyn SuitcaseLayer>) -> Self {
        Self { inner: flate2::write::GzEncoder::new(next, flate2::Compression::default()) }
    }
}

impl Write for GzLayer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl SuitcaseLayer for GzLayer {
    fn finish_boxed(self: Box<Self>) -> io::Result<Option<Box<dyn SuitcaseLayer>>> {
        let next = self.inner.finish()?;
        Ok(Some(next))
    }
}

/// Zstandard compression layer, used for `.tar.zst` and `.tar.zst.gpg`.
pub struct ZstLayer<'a> {
    inner: zstd::stream::write::Encoder<'a, Box<dyn SuitcaseLayer>>,
}

impl<'a> ZstLayer<'a> {
    pub fn wrap(next: Box<dyn SuitcaseLayer>) -> Result<Self, WriterError> {
        let inner = zstd::stream::write::Encoder::new(next, 0)
            .map_err(|source| WriterError::Layer { path: PathBuf::from("<zstd>"), source })?;
        Ok(Self { inner })
    }
}

impl<'a> Write for ZstLayer<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<'a> SuitcaseLayer for ZstLayer<'a> {
    fn finish_boxed(self: Box<Self>) -> io::Result<Option<Box<dyn SuitcaseLayer>>> {
        let next = self.inner.finish()?;
        Ok(Some(next))
    }
}

/// OpenPGP encryption layer. rPGP's `Message` builder operates on whole
/// plaintexts rather than an incremental byte stream, so this layer
/// buffers everything written to it and performs the actual encryption
/// at `finish_boxed` time. Suitcase sizes are bounded by
/// `max_suitcase_size`, so this trades peak memory for a much simpler,
/// correct implementation instead of a hand-rolled streaming OpenPGP
/// framer.
pub struct EncryptLayer {
    buf: Vec<u8>,
    encryptor: std::sync::Arc<dyn Encryptor>,
    next: Box<dyn SuitcaseLayer>,
}

impl EncryptLayer {
    pub fn wrap(next: Box<dyn SuitcaseLayer>, encryptor: std::sync::Arc<dyn Encryptor>) -> Self {
        Self { buf: Vec::new(), encryptor, next }
    }
}

impl Write for EncryptLayer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SuitcaseLayer for EncryptLayer {
    fn finish_boxed(mut self: Box<Self>) -> io::Result<Option<Box<dyn SuitcaseLayer>>> {
        let ciphertext = self
            .encryptor
            .encrypt(&self.buf)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.next.write_all(&ciphertext)?;
        Ok(Some(self.next))
    }
}

/// Walk the finish chain from `top` down to the sink, finishing each
/// layer in turn. Failure to finalize any layer fails the whole suitcase.
pub fn finish_chain(top: Box<dyn SuitcaseLayer>) -> io::Result<()> {
    let mut current = top;
    loop {
        match current.finish_boxed()? {
            Some(next) => current = next,
            None => return Ok(()),
        }
    }
}
