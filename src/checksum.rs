//! SHA-512 digests over strings and files.
//!
//! File digests are lowercase hex, which is what manifests carry in their
//! `sha` field. String digests are base64 and only used for identifiers.

use crate::core::{UpdaterError, UpdaterResult};
use base64::Engine;
use sha2::{Digest, Sha512};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Base64 SHA-512 of a string. Blank input yields an empty string.
pub fn checksum_str(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    base64::engine::general_purpose::STANDARD.encode(Sha512::digest(input.as_bytes()))
}

/// Hex SHA-512 of an in-memory buffer.
pub fn checksum_bytes(data: &[u8]) -> String {
    hex::encode(Sha512::digest(data))
}

/// Hex SHA-512 of a file's content, or `None` if there is no such file.
pub fn checksum_file(path: &Path) -> UpdaterResult<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }

    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha512::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let read = reader.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(Some(hex::encode(hasher.finalize())))
}

/// [`checksum_file`] on the blocking pool.
pub async fn checksum_file_async(path: PathBuf) -> UpdaterResult<Option<String>> {
    tokio::task::spawn_blocking(move || checksum_file(&path))
        .await
        .map_err(|e| UpdaterError::Io(std::io::Error::other(e)))?
}

/// Compare a computed digest with a manifest checksum.
///
/// An optional `sha512:` prefix on the expected value is ignored, as is hex case.
pub fn matches(actual: &str, expected: &str) -> bool {
    let expected = expected.trim();
    let expected = expected.strip_prefix("sha512:").unwrap_or(expected);
    !expected.is_empty() && actual.eq_ignore_ascii_case(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_checksum_str_blank_is_empty() {
        assert_eq!(checksum_str(""), "");
        assert_eq!(checksum_str("   \t"), "");
    }

    #[test]
    fn test_checksum_str_is_base64_sha512() {
        let digest = checksum_str("abc");
        // 64 bytes encode to 88 base64 characters with padding
        assert_eq!(digest.len(), 88);
        assert!(digest.ends_with("=="));
        assert_eq!(digest, checksum_str("abc"));
        assert_ne!(digest, checksum_str("abd"));
    }

    #[test]
    fn test_checksum_bytes_known_vector() {
        assert_eq!(
            checksum_bytes(b"abc"),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_checksum_file_matches_bytes() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("data.bin");
        // Larger than one read buffer
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&file, &data).unwrap();

        let digest = checksum_file(&file).unwrap().unwrap();
        assert_eq!(digest, checksum_bytes(&data));
    }

    #[test]
    fn test_checksum_file_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(checksum_file(&temp.path().join("missing")).unwrap().is_none());
        // A directory is not a file either
        assert!(checksum_file(temp.path()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_checksum_file_async() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, b"hello").unwrap();

        let digest = checksum_file_async(file).await.unwrap();
        assert_eq!(digest, Some(checksum_bytes(b"hello")));
    }

    #[test]
    fn test_matches() {
        let digest = checksum_bytes(b"abc");
        assert!(matches(&digest, &digest));
        assert!(matches(&digest, &digest.to_uppercase()));
        assert!(matches(&digest, &format!("sha512:{}", digest)));
        assert!(matches(&digest, &format!(" {} ", digest)));
        assert!(!matches(&digest, &checksum_bytes(b"abd")));
        assert!(!matches("", ""));
    }
}
