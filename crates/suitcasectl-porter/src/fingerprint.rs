use sha2::{Digest, Sha256};
use suitcasectl_manifest::Inventory;

use crate::error::PorterError;

/// A SHA-256 hex digest of the serialized inventory, used as a unique
/// prefix when talking to a transport so concurrent runs targeting the
/// same backend don't collide.
pub fn inventory_fingerprint(inventory: &Inventory) -> Result<String, PorterError> {
    let bytes = suitcasectl_manifest::to_fingerprint_bytes(inventory)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}
