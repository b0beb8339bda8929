//! Loose object storage.
//!
//! Objects live under `objects/` in the repository directory, fanned out by
//! the first two hex characters of the identifier: object `e69de2...` is the
//! file `objects/e6/9de2...`. Each file holds the zlib-compressed envelope.

use std::fs;
use std::path::{Path, PathBuf};

use super::codec::{self, ObjectType, RawObject};
use super::oid::{Oid, OID_HEX_LEN};
use crate::error::{Error, Result};
use crate::infra::{compress, decompress, read_file, write_file_atomic};

/// The shortest identifier prefix the store will search for.
pub const DEFAULT_MIN_PREFIX_LEN: usize = 4;

/// A content-addressable store of loose objects.
#[derive(Debug, Clone)]
pub struct LooseObjectStore {
    /// The `objects/` directory.
    objects_dir: PathBuf,
    /// Minimum accepted prefix length for [`LooseObjectStore::find_by_prefix`].
    min_prefix: usize,
}

impl LooseObjectStore {
    /// Creates a store rooted at `git_dir/objects`.
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        LooseObjectStore {
            objects_dir: git_dir.as_ref().join("objects"),
            min_prefix: DEFAULT_MIN_PREFIX_LEN,
        }
    }

    /// Overrides the minimum prefix length accepted by prefix search.
    pub fn with_min_prefix(mut self, min_prefix: usize) -> Self {
        self.min_prefix = min_prefix;
        self
    }

    /// Returns the file path an identifier maps to.
    ///
    /// The first two hex characters become the fan-out directory, the
    /// remaining 38 the file name.
    pub fn oid_to_path(&self, oid: &Oid) -> PathBuf {
        let hex = oid.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }

    /// Reads and decodes the object with the given identifier.
    ///
    /// Returns `Error::ObjectNotFound` when no such object exists, and the
    /// codec's errors when the stored bytes are damaged.
    pub fn read(&self, oid: &Oid) -> Result<RawObject> {
        let path = self.oid_to_path(oid);
        let compressed = read_file(&path).map_err(|e| match e {
            Error::PathNotFound(_) => Error::ObjectNotFound(oid.to_hex()),
            other => other,
        })?;

        let envelope = decompress(&compressed)?;
        let (object_type, payload) = codec::decode(&envelope)?;

        Ok(RawObject {
            object_type,
            content: payload.to_vec(),
        })
    }

    /// Returns true if an object with the given identifier exists.
    pub fn exists(&self, oid: &Oid) -> bool {
        self.oid_to_path(oid).exists()
    }

    /// Encodes, compresses, and writes a payload, returning its identifier.
    ///
    /// Writing is idempotent: if the object already exists the file is left
    /// untouched, since identical content always hashes to the same
    /// identifier.
    pub fn write(&self, object_type: ObjectType, payload: &[u8]) -> Result<Oid> {
        let (envelope, oid) = codec::encode(object_type, payload);

        let path = self.oid_to_path(&oid);
        if !path.exists() {
            write_file_atomic(&path, &compress(&envelope))?;
        }

        Ok(oid)
    }

    /// Finds every stored identifier starting with the given hex prefix.
    ///
    /// The prefix must be valid lowercase-insensitive hex, at least
    /// `min_prefix` and at most 40 characters long. Returns an empty vector
    /// when nothing matches; disambiguation is the caller's business.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Oid>> {
        if prefix.len() < self.min_prefix
            || prefix.len() > OID_HEX_LEN
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(Error::InvalidOid(prefix.to_string()));
        }

        let prefix = prefix.to_ascii_lowercase();
        let fanout = self.objects_dir.join(&prefix[..2]);
        if !fanout.is_dir() {
            return Ok(Vec::new());
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(&fanout)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(rest) = name.to_str() else {
                continue;
            };

            let hex = format!("{}{}", &prefix[..2], rest);
            if hex.len() == OID_HEX_LEN && hex.starts_with(&prefix) {
                // Stray files (editor droppings, temp files) are not objects.
                if let Ok(oid) = Oid::from_hex(&hex) {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}
