//! # suitcasectl-hash
//!
//! The Hasher: streaming content digests and the two on-disk digest-file
//! shapes.
//!
//! ## What belongs here
//! * Streaming digest computation over a reader, algorithm-selectable
//! * The tee reader used for inner (per-file) hashing
//! * The text/binary digest-file writers
//!
//! ## What does NOT belong here
//! * Deciding *which* files get hashed (that's `suitcasectl-exec`/`-porter`)
//! * The suitcase container format itself (use `suitcasectl-writer`)

use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use suitcasectl_manifest::HashAlgorithm;

/// At least one OS page.
const BUF_SIZE: usize = 4096;

/// One `(filename, hex digest)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashEntry {
    pub filename: String,
    pub digest: String,
}

/// An ordered, append-only collection of digests for one run.
#[derive(Debug, Clone, Default)]
pub struct HashSet {
    entries: Vec<HashEntry>,
}

impl HashSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, filename: impl Into<String>, digest: impl Into<String>) {
        self.entries.push(HashEntry { filename: filename.into(), digest: digest.into() });
    }

    pub fn entries(&self) -> &[HashEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute `algorithm`'s digest over every byte produced by `reader`.
///
/// `algorithm == HashAlgorithm::None` is a caller error: nothing should
/// ever ask for a digest when hashing is disabled, so this panics rather
/// than silently returning an empty string.
pub fn digest_reader(algorithm: HashAlgorithm, mut reader: impl Read) -> io::Result<String> {
    let mut buf = [0u8; BUF_SIZE];
    let mut state = DigestState::new(algorithm);
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        state.update(&buf[..n]);
    }
    Ok(state.finalize())
}

enum DigestState {
    Md5(Md5),
    Sha1(Sha1),
    Sha256(Sha256),
    Sha512(Sha512),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => DigestState::Md5(Md5::new()),
            HashAlgorithm::Sha1 => DigestState::Sha1(Sha1::new()),
            HashAlgorithm::Sha256 => DigestState::Sha256(Sha256::new()),
            HashAlgorithm::Sha512 => DigestState::Sha512(Sha512::new()),
            HashAlgorithm::None => {
                panic!("suitcasectl-hash: digest requested with hash algorithm `none`")
            }
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            DigestState::Md5(h) => h.update(bytes),
            DigestState::Sha1(h) => h.update(bytes),
            DigestState::Sha256(h) => h.update(bytes),
            DigestState::Sha512(h) => h.update(bytes),
        }
    }

    fn finalize(self) -> String {
        match self {
            DigestState::Md5(h) => hex::encode(h.finalize()),
            DigestState::Sha1(h) => hex::encode(h.finalize()),
            DigestState::Sha256(h) => hex::encode(h.finalize()),
            DigestState::Sha512(h) => hex::encode(h.finalize()),
        }
    }
}

/// A reader that tees every byte it yields into a running digest, for
/// inner (per-file) hashing during packing.
pub struct TeeReader<R> {
    inner: R,
    state: DigestState,
}

impl<R: Read> TeeReader<R> {
    pub fn new(inner: R, algorithm: HashAlgorithm) -> Self {
        Self { inner, state: DigestState::new(algorithm) }
    }

    /// Consume the reader, returning the finalized hex digest. Only
    /// meaningful once the caller has read the stream to EOF.
    pub fn finalize(self) -> String {
        self.state.finalize()
    }
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.state.update(&buf[..n]);
        }
        Ok(n)
    }
}

/// Write the text digest file: one `<relpath>\t<hexdigest>\n` line per
/// entry.
pub fn write_text_digest_file(path: &Path, entries: &[HashEntry]) -> io::Result<()> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    for entry in entries {
        writeln!(writer, "{}\t{}", entry.filename, entry.digest)?;
    }
    writer.flush()
}

/// Write the binary-form (standard checksum-tool) digest file: one
/// `<hexdigest>  <relpath>\n` line per entry, two spaces.
pub fn write_bin_digest_file(path: &Path, entries: &[HashEntry]) -> io::Result<()> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    for entry in entries {
        writeln!(writer, "{}  {}", entry.digest, entry.filename)?;
    }
    writer.flush()
}
