//! Annotated tag object implementation.

use super::codec::{ObjectType, RawObject};
use super::commit::Signature;
use super::kvlm::Kvlm;
use super::oid::Oid;
use crate::error::{Error, Result};

/// An annotated tag object.
///
/// Shares the [`Kvlm`] body format with commits; only the required header
/// keys differ (`object`, `type`, `tag`, `tagger`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagObject {
    /// The identifier of this tag object.
    oid: Oid,
    /// The parsed body.
    body: Kvlm,
}

impl TagObject {
    /// Parses a TagObject from a decoded object and its identifier.
    pub fn parse(oid: Oid, raw: RawObject) -> Result<Self> {
        if raw.object_type != ObjectType::Tag {
            return Err(Error::TypeMismatch {
                expected: "tag",
                actual: raw.object_type.as_str(),
            });
        }

        let body = Kvlm::parse(&raw.content)?;
        Ok(TagObject { oid, body })
    }

    /// Serializes the body back to the tag payload.
    pub fn serialize(&self) -> Vec<u8> {
        self.body.serialize()
    }

    /// Returns the identifier of this tag object.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the underlying key-value body.
    pub fn body(&self) -> &Kvlm {
        &self.body
    }

    /// Returns the identifier of the object this tag points at.
    pub fn object(&self) -> Result<Oid> {
        let value = self
            .body
            .get(b"object")
            .ok_or_else(|| Error::MalformedKvlm("tag has no object field".to_string()))?;
        let hex = std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8)?;
        Oid::from_hex(hex)
    }

    /// Returns the declared type of the target object.
    pub fn target_type(&self) -> Result<ObjectType> {
        let value = self
            .body
            .get(b"type")
            .ok_or_else(|| Error::MalformedKvlm("tag has no type field".to_string()))?;
        let tag = std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8)?;
        ObjectType::parse(tag).ok_or_else(|| Error::UnknownObjectType(tag.to_string()))
    }

    /// Returns the tag name, if present.
    pub fn tag_name(&self) -> Option<&[u8]> {
        self.body.get(b"tag")
    }

    /// Returns the tagger signature, if present.
    ///
    /// Unlike commits, old tags may omit the tagger entirely.
    pub fn tagger(&self) -> Result<Option<Signature>> {
        match self.body.get(b"tagger") {
            Some(value) => Signature::parse(value).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the tag message bytes.
    pub fn message(&self) -> &[u8] {
        self.body.message()
    }

    /// Returns the first line of the tag message, lossily decoded.
    pub fn summary(&self) -> String {
        let message = String::from_utf8_lossy(self.body.message()).into_owned();
        message.lines().next().unwrap_or("").to_string()
    }
}
