//! Blob object implementation.

use super::codec::{ObjectType, RawObject};
use crate::error::{Error, Result};

/// A blob object holding opaque file content.
///
/// Blobs have no internal structure; names and modes live in tree objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// The raw content of the blob.
    content: Vec<u8>,
}

impl Blob {
    /// Creates a blob from raw content bytes.
    pub fn new(content: Vec<u8>) -> Self {
        Blob { content }
    }

    /// Parses a Blob from a decoded object.
    ///
    /// Returns `Error::TypeMismatch` if the object is not a blob.
    pub fn parse(raw: RawObject) -> Result<Self> {
        if raw.object_type != ObjectType::Blob {
            return Err(Error::TypeMismatch {
                expected: "blob",
                actual: raw.object_type.as_str(),
            });
        }

        Ok(Blob {
            content: raw.content,
        })
    }

    /// Returns the payload bytes, identical to what was stored.
    pub fn serialize(&self) -> Vec<u8> {
        self.content.clone()
    }

    /// Returns the raw content of the blob.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Returns the content as a UTF-8 string, if valid.
    pub fn content_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.content).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the size of the blob content in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the content appears to be binary.
    ///
    /// Same heuristic as git: a NUL byte within the first 8000 bytes.
    pub fn is_binary(&self) -> bool {
        let check_len = self.content.len().min(8000);
        self.content[..check_len].contains(&0)
    }
}
