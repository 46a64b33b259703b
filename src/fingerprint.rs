/*!
 * Content fingerprinting for scanned files
 */

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::types::LocalFileRecord;

/// Read size used while hashing; memory use does not grow with file size
const CHUNK_SIZE: usize = 64 * 1024;

/// Result of hashing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    /// Lowercase hex MD5 digest
    pub hash: String,
    /// Number of bytes read
    pub size: u64,
}

/// Hash a file's contents in bounded chunks
pub fn hash_file(path: &Path) -> io::Result<Fingerprint> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut size = 0u64;

    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        context.consume(&buffer[..read]);
        size += read as u64;
    }

    Ok(Fingerprint {
        hash: format!("{:x}", context.compute()),
        size,
    })
}

/// Coarse type tag for a file, taken from its extension
pub fn file_kind(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Build the full local record for a file at an absolute path
pub fn fingerprint(path: &Path) -> io::Result<LocalFileRecord> {
    let Fingerprint { hash, size } = hash_file(path)?;

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let parent_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    Ok(LocalFileRecord {
        name,
        parent_dir,
        full_path: path.to_path_buf(),
        size,
        kind: file_kind(path),
        content_hash: hash,
    })
}
