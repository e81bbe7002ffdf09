use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use suitcasectl_manifest::SuitcaseFormat;

use crate::encrypt::Encryptor;
use crate::error::WriterError;
use crate::layer::{finish_chain, EncryptLayer, FileLayer, GzLayer, SuitcaseLayer, ZstLayer};

/// One suitcase's layered writer: `tar` on top of zero or more
/// compression/encryption layers, down to the suitcase file itself.
pub struct WriterStack {
    archive: tar::Builder<Box<dyn SuitcaseLayer>>,
}

impl WriterStack {
    /// Open `path` and assemble the layer stack for `format`. `encryptor`
    /// must be `Some` whenever `format.is_encrypted()`.
    pub fn open(
        path: &Path,
        format: SuitcaseFormat,
        encryptor: Option<Arc<dyn Encryptor>>,
    ) -> Result<Self, WriterError> {
        let mut layer: Box<dyn SuitcaseLayer> = Box::new(FileLayer::create(path)?);

        if format.is_encrypted() {
            let encryptor = encryptor.ok_or(WriterError::NoRecipients)?;
            layer = Box::new(EncryptLayer::wrap(layer, encryptor));
        }

        layer = match format {
            SuitcaseFormat::TarGz | SuitcaseFormat::TarGzGpg => Box::new(GzLayer::wrap(layer)),
            SuitcaseFormat::TarZst | SuitcaseFormat::TarZstGpg => {
                Box::new(ZstLayer::wrap(layer)?)
            }
            SuitcaseFormat::Tar | SuitcaseFormat::TarGpg => layer,
        };

        Ok(Self { archive: tar::Builder::new(layer) })
    }

    /// Stream `reader`'s contents into the archive under `name`. `size`
    /// must match the number of bytes `reader` yields exactly; tar headers
    /// are fixed-size and cannot be rewritten after the fact.
    pub fn append_file(
        &mut self,
        name: &str,
        mut reader: impl Read,
        size: u64,
        mode: u32,
    ) -> Result<(), WriterError> {
        let mut header = tar::Header::new_gnu();
        header.set_size(size);
        header.set_mode(mode);
        header.set_cksum();
        self.archive
            .append_data(&mut header, name, &mut reader)
            .map_err(|source| WriterError::Layer { path: std::path::PathBuf::from(name), source })
    }

    /// Finalize every layer, outer (the tar framing the caller holds) to
    /// inner (the suitcase file). Failure to finalize any layer fails the
    /// whole suitcase.
    pub fn finish(self) -> Result<(), WriterError> {
        let sink_path = std::path::PathBuf::from("<suitcase>");
        let layer = self
            .archive
            .into_inner()
            .map_err(|source| WriterError::Layer { path: sink_path.clone(), source })?;
        finish_chain(layer).map_err(|source| WriterError::Layer { path: sink_path, source })
    }
}
