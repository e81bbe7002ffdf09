use std::io::Read;
use std::path::Path;

const SNIFF_LEN: usize = 8 * 1024;

/// Bounded text/binary sniff: reads at most `SNIFF_LEN` bytes and rejects
/// the file if it contains a NUL byte or is more than 30% non-printable
/// outside valid UTF-8 — the same heuristic used for asset/license
/// detection elsewhere, generalized here to arbitrary metadata files.
pub fn looks_like_text(path: &Path) -> std::io::Result<bool> {
    let mut file = std::fs::File::open(path)?;
    let mut buf = vec![0u8; SNIFF_LEN];
    let mut total = 0usize;
    loop {
        let n = file.read(&mut buf[total..])?;
        if n == 0 {
            break;
        }
        total += n;
        if total == buf.len() {
            break;
        }
    }
    buf.truncate(total);
    Ok(is_text(&buf))
}

fn is_text(bytes: &[u8]) -> bool {
    if bytes.is_empty() {
        return true;
    }
    if bytes.contains(&0) {
        return false;
    }
    let non_printable = bytes
        .iter()
        .filter(|&&b| b < 0x09 || (b > 0x0d && b < 0x20))
        .count();
    (non_printable as f64) / (bytes.len() as f64) < 0.30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes() {
        assert!(is_text(b"hello\nworld\n"));
    }

    #[test]
    fn nul_byte_fails() {
        assert!(!is_text(b"hello\0world"));
    }

    #[test]
    fn mostly_control_bytes_fail() {
        let bytes: Vec<u8> = (0..20).map(|_| 0x01u8).collect();
        assert!(!is_text(&bytes));
    }

    #[test]
    fn empty_is_text() {
        assert!(is_text(b""));
    }
}
