//! # suitcasectl-writer
//!
//! The WriterStack: the layered archive/compress/encrypt writer.
//!
//! ## What belongs here
//! * The `SuitcaseLayer` trait and its tar/gzip/zstd/OpenPGP implementations
//! * `WriterStack`, which assembles the right layers for a `SuitcaseFormat`
//!   and exposes `append_file`/`finish`
//! * The `Encryptor` trait and its rPGP-backed implementation, used for
//!   both the outer archive layer and orthogonal inner (per-file)
//!   encryption — callers encrypt a file's bytes with the same
//!   `Encryptor` before handing the ciphertext to `append_file` when
//!   `encrypt_inner` is set
//!
//! ## What does NOT belong here
//! * Deciding which files go in which suitcase (`suitcasectl-pack`)
//! * Concurrency/fan-out across suitcases (`suitcasectl-exec`)

mod encrypt;
mod error;
mod layer;
mod stack;

pub use encrypt::{EncryptError, Encryptor, PgpEncryptor};
pub use error::WriterError;
pub use layer::SuitcaseLayer;
pub use stack::WriterStack;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use suitcasectl_manifest::SuitcaseFormat;

    fn read_tar_entries(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = tar::Archive::new(Cursor::new(bytes));
        archive
            .entries()
            .unwrap()
            .map(|e| {
                let mut e = e.unwrap();
                let name = e.path().unwrap().to_string_lossy().into_owned();
                let mut data = Vec::new();
                std::io::Read::read_to_end(&mut e, &mut data).unwrap();
                (name, data)
            })
            .collect()
    }

    #[test]
    fn plain_tar_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar");
        let mut stack = WriterStack::open(&path, SuitcaseFormat::Tar, None).unwrap();
        stack.append_file("a/hello.txt", Cursor::new(b"hi"), 2, 0o644).unwrap();
        stack.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let entries = read_tar_entries(&bytes);
        assert_eq!(entries, vec![("a/hello.txt".to_string(), b"hi".to_vec())]);
    }

    #[test]
    fn gzip_layer_produces_a_valid_gzip_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gz");
        let mut stack = WriterStack::open(&path, SuitcaseFormat::TarGz, None).unwrap();
        stack.append_file("f.txt", Cursor::new(b"payload"), 7, 0o644).unwrap();
        stack.finish().unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let mut decoder = flate2::read::GzDecoder::new(file);
        let mut decompressed = Vec::new();
        std::io::Read::read_to_end(&mut decoder, &mut decompressed).unwrap();
        let entries = read_tar_entries(&decompressed);
        assert_eq!(entries, vec![("f.txt".to_string(), b"payload".to_vec())]);
    }

    #[test]
    fn zstd_layer_produces_a_valid_zstd_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.zst");
        let mut stack = WriterStack::open(&path, SuitcaseFormat::TarZst, None).unwrap();
        stack.append_file("f.txt", Cursor::new(b"payload"), 7, 0o644).unwrap();
        stack.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let decompressed = zstd::stream::decode_all(Cursor::new(bytes)).unwrap();
        let entries = read_tar_entries(&decompressed);
        assert_eq!(entries, vec![("f.txt".to_string(), b"payload".to_vec())]);
    }

    #[test]
    fn encrypted_format_without_recipients_fails_before_any_file_is_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.tar.gpg");
        let err = WriterStack::open(&path, SuitcaseFormat::TarGpg, None).unwrap_err();
        assert!(matches!(err, WriterError::NoRecipients));
    }

    #[test]
    fn pgp_encryptor_load_rejects_missing_files() {
        let err = PgpEncryptor::load(&["/nonexistent/key.asc"]).unwrap_err();
        assert!(matches!(err, WriterError::BadPublicKey { .. }));
    }

    #[test]
    fn pgp_encryptor_load_rejects_empty_recipient_list() {
        let paths: &[&str] = &[];
        let err = PgpEncryptor::load(paths).unwrap_err();
        assert!(matches!(err, WriterError::NoRecipients));
    }
}
