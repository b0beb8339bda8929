//! Object envelope codec: `<type> <decimal-length>\0<payload>`.
//!
//! The envelope bytes are what gets hashed to derive an object's
//! identifier, so encoding must be reproduced byte for byte to stay
//! interoperable with stores written by git. Both directions here are pure
//! functions; compression and file placement live in the store.

use super::oid::Oid;
use crate::error::{Error, Result};
use crate::infra::sha1;

/// The type of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    /// A blob (opaque file content).
    Blob,
    /// A tree (directory listing).
    Tree,
    /// A commit.
    Commit,
    /// An annotated tag.
    Tag,
}

impl ObjectType {
    /// Returns the type tag as used in object envelopes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
            ObjectType::Tag => "tag",
        }
    }

    /// Parses a type tag from an envelope header.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectType::Blob),
            "tree" => Some(ObjectType::Tree),
            "commit" => Some(ObjectType::Commit),
            "tag" => Some(ObjectType::Tag),
            _ => None,
        }
    }
}

/// A decoded object: its type and payload, without the envelope header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// The type of the object.
    pub object_type: ObjectType,
    /// The payload bytes.
    pub content: Vec<u8>,
}

/// Encodes a payload into its envelope and derives the identifier.
///
/// The identifier is the SHA-1 of the full envelope bytes, so identical
/// `(type, payload)` inputs always produce the identical identifier.
pub fn encode(object_type: ObjectType, payload: &[u8]) -> (Vec<u8>, Oid) {
    let tag = object_type.as_str();
    let mut envelope = Vec::with_capacity(tag.len() + 16 + payload.len());
    envelope.extend_from_slice(tag.as_bytes());
    envelope.push(b' ');
    envelope.extend_from_slice(payload.len().to_string().as_bytes());
    envelope.push(0);
    envelope.extend_from_slice(payload);

    let oid = Oid::from_bytes(sha1(&envelope));
    (envelope, oid)
}

/// Decodes an envelope into its type tag and payload.
///
/// Fails with `MalformedEnvelope` when the framing is broken (no space, no
/// NUL, non-decimal length field, or a length that does not match the
/// payload exactly) and with `UnknownObjectType` for an unrecognized tag.
pub fn decode(envelope: &[u8]) -> Result<(ObjectType, &[u8])> {
    let space = envelope
        .iter()
        .position(|&b| b == b' ')
        .ok_or_else(|| Error::MalformedEnvelope("no space after type tag".to_string()))?;

    let nul = envelope[space..]
        .iter()
        .position(|&b| b == 0)
        .map(|i| space + i)
        .ok_or_else(|| Error::MalformedEnvelope("no NUL after length field".to_string()))?;

    let tag = std::str::from_utf8(&envelope[..space])
        .map_err(|_| Error::MalformedEnvelope("type tag is not ASCII".to_string()))?;

    let length_field = &envelope[space + 1..nul];
    if length_field.is_empty() || !length_field.iter().all(|b| b.is_ascii_digit()) {
        return Err(Error::MalformedEnvelope(format!(
            "length field is not decimal: {:?}",
            String::from_utf8_lossy(length_field)
        )));
    }
    let length: usize = std::str::from_utf8(length_field)
        .map_err(|_| Error::MalformedEnvelope("length field is not ASCII".to_string()))?
        .parse()
        .map_err(|_| Error::MalformedEnvelope("length field overflows".to_string()))?;

    let object_type =
        ObjectType::parse(tag).ok_or_else(|| Error::UnknownObjectType(tag.to_string()))?;

    let payload = &envelope[nul + 1..];
    if payload.len() != length {
        return Err(Error::MalformedEnvelope(format!(
            "length field says {} but payload is {} bytes",
            length,
            payload.len()
        )));
    }

    Ok((object_type, payload))
}
