//! # suitcasectl-archive-toc
//!
//! The ArchiveTOC extractor: a bounded, cycle-safe listing of the inner
//! regular-file entries of an archive-shaped file.
//!
//! ## What belongs here
//! * Format sniffing (by suffix for "shallow" mode, by magic bytes for
//!   "deep" mode)
//! * Depth/entry-count/cycle guards against pathological archives
//! * tar / tar.gz / zip entry extraction
//!
//! ## What does NOT belong here
//! * Directory traversal of the *outer* filesystem (use `suitcasectl-walk`)
//! * Writing archives (use `suitcasectl-writer`)

mod error;

pub use error::TocError;

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Maximum inner path depth (path segments) before a subtree is skipped.
pub const MAX_DEPTH: usize = 1000;
/// Maximum inner entries read before the call fails outright.
pub const MAX_ENTRIES: usize = 100_000;

/// Suffixes that mark a file as "archive-shaped" for shallow TOC mode.
/// Every suffix here is *recognized*; only `tar`, `tar.gz`/`tgz`, and
/// `zip` are actually unpacked — the rest return an empty TOC with a
/// logged warning.
pub const SHALLOW_SUFFIXES: &[&str] = &[
    "tar", "br", "bz2", "zip", "gz", "lz4", "sz", "xz", "zz", "zst", "rar", "7z",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Tar,
    TarGz,
    Zip,
    /// Recognized shallow suffix, but no real decoder is wired up.
    Unsupported,
}

/// Extract the table of contents of `path`.
///
/// In shallow mode (`deep = false`) the file's suffix must be one of
/// [`SHALLOW_SUFFIXES`] or the call fails with [`TocError::NotAnArchive`].
/// In deep mode the file is sniffed by magic bytes regardless of suffix.
pub fn extract_toc(path: &Path, deep: bool) -> Result<Vec<String>, TocError> {
    let kind = if deep {
        sniff_by_magic(path)?
    } else {
        sniff_by_suffix(path).ok_or_else(|| TocError::NotAnArchive { path: path.to_path_buf() })?
    };

    let entries = match kind {
        Kind::Tar => read_tar(path, |f| Ok(Box::new(BufReader::new(f))))?,
        Kind::TarGz => read_tar(path, |f| Ok(Box::new(flate2::read::GzDecoder::new(f))))?,
        Kind::Zip => read_zip(path)?,
        Kind::Unsupported => {
            tracing::warn!(path = %path.display(), "unsupported archive kind, TOC left empty");
            Vec::new()
        }
    };

    if entries.len() == 1 && entries[0] == "." {
        return Err(TocError::NotAnArchive { path: path.to_path_buf() });
    }

    let mut sorted = entries;
    sorted.sort();
    sorted.dedup();
    Ok(sorted)
}

fn sniff_by_suffix(path: &Path) -> Option<Kind> {
    let name = path.file_name()?.to_string_lossy().to_lowercase();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return Some(Kind::TarGz);
    }
    if name.ends_with(".zip") {
        return Some(Kind::Zip);
    }
    if name.ends_with(".tar") {
        return Some(Kind::Tar);
    }
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if SHALLOW_SUFFIXES.contains(&ext.as_str()) {
        Some(Kind::Unsupported)
    } else {
        None
    }
}

fn sniff_by_magic(path: &Path) -> Result<Kind, TocError> {
    let mut file = File::open(path).map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
    let mut header = [0u8; 262];
    let n = file
        .read(&mut header)
        .map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
    let header = &header[..n];

    if header.starts_with(&[0x1f, 0x8b]) {
        return Ok(Kind::TarGz);
    }
    if header.starts_with(b"PK\x03\x04") || header.starts_with(b"PK\x05\x06") {
        return Ok(Kind::Zip);
    }
    if header.len() >= 262 && &header[257..262] == b"ustar" {
        return Ok(Kind::Tar);
    }
    Err(TocError::NotAnArchive { path: path.to_path_buf() })
}

fn read_tar(
    path: &Path,
    open: impl FnOnce(File) -> std::io::Result<Box<dyn Read>>,
) -> Result<Vec<String>, TocError> {
    let file = File::open(path).map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
    let reader = open(file).map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
    let mut archive = tar::Archive::new(reader);
    let raw_entries = archive
        .entries()
        .map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;

    let mut visited = HashSet::new();
    let mut out = Vec::new();
    let mut seen_count = 0usize;

    for entry in raw_entries {
        let entry = entry.map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
        seen_count += 1;
        if seen_count > MAX_ENTRIES {
            return Err(TocError::TooManyEntries { path: path.to_path_buf(), limit: MAX_ENTRIES });
        }
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = entry
            .path()
            .map_err(|source| TocError::Read { path: path.to_path_buf(), source })?
            .to_string_lossy()
            .into_owned();
        if name.split('/').count() > MAX_DEPTH {
            continue;
        }
        if !visited.insert(name.clone()) {
            continue;
        }
        out.push(name);
    }
    Ok(out)
}

fn read_zip(path: &Path) -> Result<Vec<String>, TocError> {
    let file = File::open(path).map_err(|source| TocError::Read { path: path.to_path_buf(), source })?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|_| TocError::NotAnArchive { path: path.to_path_buf() })?;

    if archive.len() > MAX_ENTRIES {
        return Err(TocError::TooManyEntries { path: path.to_path_buf(), limit: MAX_ENTRIES });
    }

    let mut visited = HashSet::new();
    let mut out = Vec::new();
    for i in 0..archive.len() {
        let entry = archive
            .by_index(i)
            .map_err(|source| TocError::Read { path: path.to_path_buf(), source: std::io::Error::new(std::io::ErrorKind::Other, source) })?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();
        if name.split('/').count() > MAX_DEPTH {
            continue;
        }
        if !visited.insert(name.clone()) {
            continue;
        }
        out.push(name);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tar_gz(path: &Path, entries: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let enc = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(enc);
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    /// archive.tar.gz containing a/x.txt, a/b/y.txt, a/z.png -> sorted TOC.
    #[test]
    fn tar_gz_toc_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.tar.gz");
        write_tar_gz(
            &path,
            &[("a/z.png", b"p"), ("a/x.txt", b"x"), ("a/b/y.txt", b"y")],
        );

        let toc = extract_toc(&path, false).unwrap();
        assert_eq!(toc, vec!["a/b/y.txt", "a/x.txt", "a/z.png"]);
    }

    #[test]
    fn unrecognized_suffix_is_not_an_archive_in_shallow_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, b"hello").unwrap();
        let err = extract_toc(&path, false).unwrap_err();
        assert!(matches!(err, TocError::NotAnArchive { .. }));
    }

    #[test]
    fn unsupported_shallow_suffix_yields_empty_toc() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.xz");
        std::fs::write(&path, b"not really xz, just bytes").unwrap();
        let toc = extract_toc(&path, false).unwrap();
        assert!(toc.is_empty());
    }

    #[test]
    fn zip_toc_lists_regular_files_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("archive.zip");
        let file = File::create(&path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.add_directory::<_, ()>("dir/", Default::default()).unwrap();
        zip.start_file::<_, ()>("dir/inner.txt", Default::default()).unwrap();
        zip.write_all(b"hi").unwrap();
        zip.finish().unwrap();

        let toc = extract_toc(&path, false).unwrap();
        assert_eq!(toc, vec!["dir/inner.txt"]);
    }

    #[test]
    fn deep_mode_sniffs_gzip_magic_regardless_of_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        write_tar_gz(&path, &[("only.txt", b"x")]);
        let toc = extract_toc(&path, true).unwrap();
        assert_eq!(toc, vec!["only.txt"]);
    }

    #[test]
    fn deep_mode_rejects_genuinely_non_archive_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just some text, nothing more").unwrap();
        let err = extract_toc(&path, true).unwrap_err();
        assert!(matches!(err, TocError::NotAnArchive { .. }));
    }
}
