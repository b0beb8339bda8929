//! Tree object codec.
//!
//! A tree payload is a repeated sequence of
//! `<mode> SPACE <path> NUL <20 raw identifier bytes>` with no padding
//! between entries. Paths are raw byte strings (not necessarily UTF-8) and
//! the mode is kept exactly as encoded, so serialization reproduces the
//! input byte for byte.

use super::codec::{ObjectType, RawObject};
use super::oid::{Oid, OID_BYTES};
use crate::error::{Error, Result};

/// An entry in a tree object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// The mode field as encoded: 5 or 6 ASCII decimal digits, no padding.
    mode: String,
    /// The entry path as raw bytes.
    path: Vec<u8>,
    /// The object ID this entry points to.
    oid: Oid,
}

impl TreeEntry {
    /// Creates an entry, validating the mode field.
    pub fn new(mode: &str, path: Vec<u8>, oid: Oid) -> Result<Self> {
        validate_mode(mode.as_bytes())?;
        Ok(TreeEntry {
            mode: mode.to_string(),
            path,
            oid,
        })
    }

    /// Returns the mode exactly as encoded (e.g. `"100644"`, `"40000"`).
    pub fn mode(&self) -> &str {
        &self.mode
    }

    /// Returns the mode zero-padded to width 6, the conventional display
    /// form (`"040000"` for a subtree).
    pub fn mode_display(&self) -> String {
        format!("{:0>6}", self.mode)
    }

    /// Returns the entry path as raw bytes.
    pub fn path(&self) -> &[u8] {
        &self.path
    }

    /// Returns the entry path as UTF-8, if valid.
    pub fn path_str(&self) -> Result<&str> {
        std::str::from_utf8(&self.path).map_err(|_| Error::InvalidUtf8)
    }

    /// Returns the object ID of the entry.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns true if this entry points at a subtree.
    pub fn is_tree(&self) -> bool {
        self.mode == "40000"
    }

    /// Returns true if this entry points at a blob (regular file, exec
    /// file, or symlink).
    pub fn is_blob(&self) -> bool {
        self.mode.starts_with("100") || self.mode == "120000"
    }

    /// The key this entry sorts under in canonical order: subtree paths
    /// compare as if they carried a trailing slash.
    fn sort_key(&self) -> Vec<u8> {
        let mut key = self.path.clone();
        if self.is_tree() {
            key.push(b'/');
        }
        key
    }
}

/// A tree object: an ordered directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tree {
    /// Entries in on-disk encounter order.
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Tree::default()
    }

    /// Creates a tree from a list of entries, kept in the given order.
    pub fn from_entries(entries: Vec<TreeEntry>) -> Self {
        Tree { entries }
    }

    /// Parses a Tree from a decoded object.
    ///
    /// Entries come back in encounter order, which is not necessarily a
    /// sorted order; callers that need one must sort explicitly.
    pub fn parse(raw: RawObject) -> Result<Self> {
        if raw.object_type != ObjectType::Tree {
            return Err(Error::TypeMismatch {
                expected: "tree",
                actual: raw.object_type.as_str(),
            });
        }

        Self::parse_payload(&raw.content)
    }

    /// Parses the raw tree payload.
    pub fn parse_payload(content: &[u8]) -> Result<Self> {
        let mut entries = Vec::new();
        let mut pos = 0;

        while pos < content.len() {
            let space = content[pos..]
                .iter()
                .position(|&b| b == b' ')
                .map(|i| pos + i)
                .ok_or_else(|| {
                    Error::MalformedTree(format!("no space after mode at byte {}", pos))
                })?;

            let mode_bytes = &content[pos..space];
            validate_mode(mode_bytes)?;
            // validate_mode guarantees ASCII digits
            let mode = String::from_utf8_lossy(mode_bytes).into_owned();

            let nul = content[space..]
                .iter()
                .position(|&b| b == 0)
                .map(|i| space + i)
                .ok_or_else(|| {
                    Error::MalformedTree(format!("no NUL after path at byte {}", space))
                })?;

            let path = content[space + 1..nul].to_vec();

            let oid_start = nul + 1;
            if oid_start + OID_BYTES > content.len() {
                return Err(Error::TruncatedTree);
            }
            let mut oid_bytes = [0u8; OID_BYTES];
            oid_bytes.copy_from_slice(&content[oid_start..oid_start + OID_BYTES]);

            entries.push(TreeEntry {
                mode,
                path,
                oid: Oid::from_bytes(oid_bytes),
            });

            pos = oid_start + OID_BYTES;
        }

        Ok(Tree { entries })
    }

    /// Serializes the entries back to the tree payload.
    ///
    /// Entries are emitted in their stored order; the codec does not sort.
    /// Call [`Tree::canonical_sort`] first when a git-identical identifier
    /// is wanted.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for entry in &self.entries {
            out.extend_from_slice(entry.mode.as_bytes());
            out.push(b' ');
            out.extend_from_slice(&entry.path);
            out.push(0);
            out.extend_from_slice(entry.oid.as_bytes());
        }
        out
    }

    /// Sorts entries into canonical order: byte-wise by path, with subtree
    /// paths comparing as if they ended in `/` (so the subtree `foo` sorts
    /// after the blob `foo.c`, matching git's comparator).
    pub fn canonical_sort(&mut self) {
        self.entries.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    }

    /// Returns a slice of all entries.
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Appends an entry, keeping insertion order.
    pub fn push(&mut self, entry: TreeEntry) {
        self.entries.push(entry);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds an entry by path.
    pub fn get(&self, path: &[u8]) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Returns an iterator over the entries.
    pub fn iter(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }
}

/// A mode field is 5 or 6 unpadded ASCII decimal digits.
fn validate_mode(mode: &[u8]) -> Result<()> {
    if !(5..=6).contains(&mode.len()) || !mode.iter().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedTree(format!(
            "bad mode field: {:?}",
            String::from_utf8_lossy(mode)
        )));
    }
    Ok(())
}
