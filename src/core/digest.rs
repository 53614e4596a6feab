//! GE-005: BLAKE3 file digests for copy verification and log fingerprints.

use super::error::{EvalError, EvalResult};
use std::io::Read;
use std::path::Path;

const STREAM_BUF_SIZE: usize = 65536;

/// Hash a file's contents. Returns `"blake3:{hex}"`.
pub fn hash_file(path: &Path) -> EvalResult<String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| EvalError::io(format!("cannot open {}", path.display()), e))?;
    let mut hasher = blake3::Hasher::new();
    let mut buf = [0u8; STREAM_BUF_SIZE];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|e| EvalError::io(format!("read error {}", path.display()), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("blake3:{}", hasher.finalize().to_hex()))
}

/// Hash an in-memory buffer. Returns `"blake3:{hex}"`.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("blake3:{}", blake3::hash(bytes).to_hex())
}

/// Fail unless `copy` has exactly the same contents as `source`.
pub fn verify_copy(source: &Path, copy: &Path) -> EvalResult<String> {
    let expected = hash_file(source)?;
    let actual = hash_file(copy)?;
    if expected != actual {
        return Err(EvalError::io(
            format!("copy of {} is corrupt", source.display()),
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("expected {expected}, found {actual}"),
            ),
        ));
    }
    Ok(actual)
}
