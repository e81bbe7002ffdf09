use std::fmt;
use std::fs;
use std::path::Path;

use pgp::composed::{Deserializable, Message, SignedPublicKey};
use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::KeyTrait;

use crate::error::WriterError;

/// Encrypts a whole plaintext buffer to a fixed set of recipients.
///
/// Recipient resolution happens once, up front — a missing or invalid
/// recipient fails the run before any file is opened — and the same
/// `Encryptor` is shared by every inner-file and outer-archive layer that
/// needs it.
pub trait Encryptor: Send + Sync {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptError>;

    /// Fingerprints of the resolved recipients, for the manifest and logs.
    fn recipient_fingerprints(&self) -> Vec<String>;
}

#[derive(Debug)]
pub struct EncryptError(pub String);

impl fmt::Display for EncryptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for EncryptError {}

/// An [`Encryptor`] backed by armored OpenPGP public keys, via the pure-Rust
/// `pgp` crate. Deliberately does not vendor a keyring or keyserver client:
/// the only recipients are the certificates named by `--public-key`.
pub struct PgpEncryptor {
    recipients: Vec<SignedPublicKey>,
}

impl PgpEncryptor {
    /// Load and validate every public key file up front. A single bad
    /// key fails the whole load before any file is opened.
    pub fn load(paths: &[impl AsRef<Path>]) -> Result<Self, WriterError> {
        if paths.is_empty() {
            return Err(WriterError::NoRecipients);
        }
        let mut recipients = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let armored = fs::read(path)
                .map_err(|e| WriterError::BadPublicKey { path: path.to_path_buf(), reason: e.to_string() })?;
            let (key, _headers) = SignedPublicKey::from_armor_single(&armored[..])
                .map_err(|e| WriterError::BadPublicKey { path: path.to_path_buf(), reason: e.to_string() })?;
            key.verify()
                .map_err(|e| WriterError::BadPublicKey { path: path.to_path_buf(), reason: e.to_string() })?;
            recipients.push(key);
        }
        Ok(Self { recipients })
    }
}

impl Encryptor for PgpEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncryptError> {
        let message = Message::new_literal_bytes("suitcase", plaintext);
        let recipient_refs: Vec<&SignedPublicKey> = self.recipients.iter().collect();
        let mut rng = rand::thread_rng();
        let encrypted = message
            .encrypt_to_keys(&mut rng, SymmetricKeyAlgorithm::AES256, &recipient_refs[..])
            .map_err(|e| EncryptError(e.to_string()))?;
        encrypted
            .to_bytes()
            .map_err(|e| EncryptError(e.to_string()))
    }

    fn recipient_fingerprints(&self) -> Vec<String> {
        self.recipients.iter().map(|k| hex::encode(k.fingerprint())).collect()
    }
}
