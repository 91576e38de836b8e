//! Content reading: load a whole file into memory as text under a declared encoding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Text encodings the reader can decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Strict UTF-8: invalid byte sequences are an error.
    #[default]
    #[serde(alias = "utf-8")]
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    #[serde(alias = "iso-8859-1", alias = "latin-1")]
    Latin1,
}

#[derive(Debug, Error)]
pub enum ReadError {
    /// The file vanished, is unreadable, or some other I/O failure occurred.
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not valid {encoding:?} text: {source}", path.display())]
    Encoding {
        path: PathBuf,
        encoding: Encoding,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl ReadError {
    pub fn path(&self) -> &Path {
        match self {
            ReadError::Io { path, .. } | ReadError::Encoding { path, .. } => path,
        }
    }
}

/// Read the entire file at `path` and decode it.
pub async fn read_content(path: &Path, encoding: Encoding) -> Result<String, ReadError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), ?encoding, "Read file content");
    decode(path, bytes, encoding)
}

fn decode(path: &Path, bytes: Vec<u8>, encoding: Encoding) -> Result<String, ReadError> {
    match encoding {
        Encoding::Utf8 => String::from_utf8(bytes).map_err(|source| ReadError::Encoding {
            path: path.to_path_buf(),
            encoding,
            source,
        }),
        Encoding::Latin1 => Ok(bytes.into_iter().map(char::from).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn reads_utf8_content_exactly() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("input.txt");
        let text = "A,B,C\nnaïve — ✓\n";
        std::fs::write(&file, text).unwrap();

        let content = read_content(&file, Encoding::Utf8).await.unwrap();
        assert_eq!(content, text);
    }

    #[tokio::test]
    async fn invalid_utf8_is_an_encoding_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("bad.txt");
        std::fs::write(&file, [b'o', b'k', 0xff, 0xfe]).unwrap();

        let err = read_content(&file, Encoding::Utf8).await.unwrap_err();
        assert!(matches!(err, ReadError::Encoding { .. }), "got {err:?}");
        assert_eq!(err.path(), file.as_path());
    }

    #[tokio::test]
    async fn latin1_maps_every_byte() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("latin1.txt");
        std::fs::write(&file, [b'c', b'a', b'f', 0xe9]).unwrap();

        let content = read_content(&file, Encoding::Latin1).await.unwrap();
        assert_eq!(content, "café");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = read_content(&dir.path().join("gone.txt"), Encoding::Utf8)
            .await
            .unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }), "got {err:?}");
    }
}
