//! Input resolution: read a user-supplied path and check what it holds.
//!
//! Every operation works on bytes, so the only job here is to turn a path
//! into bytes with a helpful error, and to reject non-PDF input before it
//! reaches a parser that would report something far less readable.

use crate::error::ConverterError;
use std::path::Path;
use tracing::debug;

/// File formats the converter distinguishes by content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Pdf,
    /// A ZIP container, which is what a `.docx` is.
    Zip,
    Jpeg,
    Png,
    Unknown,
}

/// Sniff the format from the leading bytes.
pub fn detect_kind(bytes: &[u8]) -> InputKind {
    match bytes {
        [b'%', b'P', b'D', b'F', ..] => InputKind::Pdf,
        [b'P', b'K', 0x03, 0x04, ..] => InputKind::Zip,
        [0xFF, 0xD8, 0xFF, ..] => InputKind::Jpeg,
        [0x89, b'P', b'N', b'G', ..] => InputKind::Png,
        _ => InputKind::Unknown,
    }
}

/// Fail with [`ConverterError::NotAPdf`] unless the bytes start with `%PDF`.
pub fn check_pdf_magic(bytes: &[u8]) -> Result<(), ConverterError> {
    if detect_kind(bytes) == InputKind::Pdf {
        return Ok(());
    }
    let mut magic = [0u8; 4];
    let n = bytes.len().min(4);
    magic[..n].copy_from_slice(&bytes[..n]);
    Err(ConverterError::NotAPdf { magic })
}

/// Read a local file, mapping I/O failures onto input errors.
pub async fn read_input(path: impl AsRef<Path>) -> Result<Vec<u8>, ConverterError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ConverterError::FileNotFound {
            path: path.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ConverterError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => ConverterError::InvalidInput(format!("Cannot read '{}': {}", path.display(), e)),
    })?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Read a local file and make sure it is a PDF.
pub async fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, ConverterError> {
    let bytes = read_input(path).await?;
    check_pdf_magic(&bytes)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind(b"%PDF-1.7\n"), InputKind::Pdf);
        assert_eq!(detect_kind(b"PK\x03\x04...."), InputKind::Zip);
        assert_eq!(detect_kind(&[0xFF, 0xD8, 0xFF, 0xE0]), InputKind::Jpeg);
        assert_eq!(detect_kind(b"\x89PNG\r\n"), InputKind::Png);
        assert_eq!(detect_kind(b"%P"), InputKind::Unknown);
    }

    #[test]
    fn test_check_pdf_magic() {
        assert!(check_pdf_magic(b"%PDF-1.4").is_ok());
        match check_pdf_magic(b"PK") {
            Err(ConverterError::NotAPdf { magic }) => assert_eq!(magic, [b'P', b'K', 0, 0]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let err = tokio_test::block_on(read_input("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, ConverterError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_pdf_rejects_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        std::fs::write(&path, b"hello").unwrap();
        assert!(matches!(
            read_pdf(&path).await,
            Err(ConverterError::NotAPdf { .. })
        ));
    }
}
