//! Object model: identifiers, the envelope codec, the four object types,
//! and the loose object store.

pub mod blob;
pub mod codec;
pub mod commit;
pub mod kvlm;
pub mod oid;
pub mod store;
pub mod tag_object;
pub mod tree;

pub use blob::Blob;
pub use codec::{ObjectType, RawObject};
pub use commit::{Commit, Signature};
pub use kvlm::Kvlm;
pub use oid::Oid;
pub use store::LooseObjectStore;
pub use tag_object::TagObject;
pub use tree::{Tree, TreeEntry};

use crate::error::Result;

/// Any of the four object types, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// A blob object.
    Blob(Blob),
    /// A tree object.
    Tree(Tree),
    /// A commit object.
    Commit(Commit),
    /// An annotated tag object.
    Tag(TagObject),
}

impl Object {
    /// Parses a decoded object into its typed form.
    pub fn parse(oid: Oid, raw: RawObject) -> Result<Self> {
        match raw.object_type {
            ObjectType::Blob => Ok(Object::Blob(Blob::parse(raw)?)),
            ObjectType::Tree => Ok(Object::Tree(Tree::parse(raw)?)),
            ObjectType::Commit => Ok(Object::Commit(Commit::parse(oid, raw)?)),
            ObjectType::Tag => Ok(Object::Tag(TagObject::parse(oid, raw)?)),
        }
    }

    /// Returns the type of this object.
    pub fn kind(&self) -> ObjectType {
        match self {
            Object::Blob(_) => ObjectType::Blob,
            Object::Tree(_) => ObjectType::Tree,
            Object::Commit(_) => ObjectType::Commit,
            Object::Tag(_) => ObjectType::Tag,
        }
    }

    /// Serializes the object to its payload bytes (without the envelope).
    pub fn serialize(&self) -> Vec<u8> {
        match self {
            Object::Blob(blob) => blob.serialize(),
            Object::Tree(tree) => tree.serialize(),
            Object::Commit(commit) => commit.serialize(),
            Object::Tag(tag) => tag.serialize(),
        }
    }

    /// Returns the blob, if this is one.
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Object::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    /// Returns the tree, if this is one.
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Object::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the commit, if this is one.
    pub fn as_commit(&self) -> Option<&Commit> {
        match self {
            Object::Commit(commit) => Some(commit),
            _ => None,
        }
    }

    /// Returns the tag object, if this is one.
    pub fn as_tag(&self) -> Option<&TagObject> {
        match self {
            Object::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

impl From<Blob> for Object {
    fn from(blob: Blob) -> Self {
        Object::Blob(blob)
    }
}

impl From<Tree> for Object {
    fn from(tree: Tree) -> Self {
        Object::Tree(tree)
    }
}

impl From<Commit> for Object {
    fn from(commit: Commit) -> Self {
        Object::Commit(commit)
    }
}

impl From<TagObject> for Object {
    fn from(tag: TagObject) -> Self {
        Object::Tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // O-001: parse dispatches on the decoded type
    #[test]
    fn test_parse_dispatch() {
        let oid = Oid::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();

        let raw = RawObject {
            object_type: ObjectType::Blob,
            content: b"data".to_vec(),
        };
        let object = Object::parse(oid, raw).unwrap();
        assert_eq!(object.kind(), ObjectType::Blob);
        assert!(object.as_blob().is_some());
        assert!(object.as_tree().is_none());

        let raw = RawObject {
            object_type: ObjectType::Tree,
            content: vec![],
        };
        let object = Object::parse(oid, raw).unwrap();
        assert_eq!(object.kind(), ObjectType::Tree);
        assert!(object.as_tree().is_some());
    }

    // O-002: serialize returns the payload bytes
    #[test]
    fn test_serialize() {
        let object = Object::from(Blob::new(b"payload".to_vec()));
        assert_eq!(object.serialize(), b"payload");
    }
}
