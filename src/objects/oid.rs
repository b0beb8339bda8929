//! Object identifier (160-bit content digest) representation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The length of an object identifier in bytes.
pub const OID_BYTES: usize = 20;

/// The length of an object identifier as a hexadecimal string.
pub const OID_HEX_LEN: usize = 40;

/// A 160-bit object identifier.
///
/// Identifiers are the SHA-1 digest of an object's full envelope bytes,
/// conventionally rendered as 40 lowercase hex characters. They are the
/// sole name of an object; two objects with identical envelope bytes have
/// identical identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Oid {
    bytes: [u8; OID_BYTES],
}

impl Oid {
    /// Creates an Oid from a 40-character hexadecimal string.
    ///
    /// Accepts either case; the stored form is binary, so `to_hex` always
    /// renders lowercase. Returns `Error::InvalidOid` for any other input.
    ///
    /// # Examples
    ///
    /// ```
    /// use loosegit::objects::Oid;
    ///
    /// let oid = Oid::from_hex("da39a3ee5e6b4b0d3255bfef95601890afd80709").unwrap();
    /// assert_eq!(oid.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != OID_HEX_LEN || !hex.is_ascii() {
            return Err(Error::InvalidOid(hex.to_string()));
        }

        let mut bytes = [0u8; OID_BYTES];
        for (i, chunk) in hex.as_bytes().chunks_exact(2).enumerate() {
            let high = hex_value(chunk[0]).ok_or_else(|| Error::InvalidOid(hex.to_string()))?;
            let low = hex_value(chunk[1]).ok_or_else(|| Error::InvalidOid(hex.to_string()))?;
            bytes[i] = (high << 4) | low;
        }

        Ok(Oid { bytes })
    }

    /// Creates an Oid from its raw 20-byte form.
    pub fn from_bytes(bytes: [u8; OID_BYTES]) -> Self {
        Oid { bytes }
    }

    /// Returns the 40-character lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(OID_HEX_LEN);
        for byte in &self.bytes {
            hex.push(char::from_digit(u32::from(byte >> 4), 16).unwrap());
            hex.push(char::from_digit(u32::from(byte & 0x0F), 16).unwrap());
        }
        hex
    }

    /// Returns a short (7-character) rendering for display purposes.
    pub fn short(&self) -> String {
        self.to_hex()[..7].to_string()
    }

    /// Returns a reference to the raw 20-byte form.
    pub fn as_bytes(&self) -> &[u8; OID_BYTES] {
        &self.bytes
    }
}

/// Converts one ASCII hex digit to its value.
fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self.short())
    }
}

impl FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Oid::from_hex(s)
    }
}
