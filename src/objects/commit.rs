//! Commit object implementation.

use super::codec::{ObjectType, RawObject};
use super::kvlm::Kvlm;
use super::oid::Oid;
use crate::error::{Error, Result};

/// A signature representing an author, committer, or tagger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// The name of the person.
    name: String,
    /// The email address.
    email: String,
    /// Unix timestamp (seconds since epoch).
    timestamp: i64,
    /// Timezone offset in minutes (e.g., +0900 = 540, -0500 = -300).
    tz_offset: i32,
}

impl Signature {
    /// Creates a new Signature.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        tz_offset: i32,
    ) -> Self {
        Signature {
            name: name.into(),
            email: email.into(),
            timestamp,
            tz_offset,
        }
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the Unix timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timezone offset in minutes.
    pub fn tz_offset(&self) -> i32 {
        self.tz_offset
    }

    /// Parses a signature value.
    ///
    /// Format: `Name <email> timestamp timezone`
    /// Example: `John Doe <john@example.com> 1234567890 +0900`
    pub(crate) fn parse(raw: &[u8]) -> Result<Self> {
        let s = std::str::from_utf8(raw).map_err(|_| Error::InvalidUtf8)?;

        let email_start = s.find('<').ok_or(Error::InvalidUtf8)?;
        let email_end = s.find('>').ok_or(Error::InvalidUtf8)?;
        if email_start >= email_end {
            return Err(Error::InvalidUtf8);
        }

        let name = s[..email_start].trim().to_string();
        let email = s[email_start + 1..email_end].to_string();

        let mut parts = s[email_end + 1..].split_whitespace();
        let timestamp: i64 = parts
            .next()
            .ok_or(Error::InvalidUtf8)?
            .parse()
            .map_err(|_| Error::InvalidUtf8)?;
        let tz_offset = parse_timezone(parts.next().ok_or(Error::InvalidUtf8)?)?;

        Ok(Signature {
            name,
            email,
            timestamp,
            tz_offset,
        })
    }
}

/// Parses a timezone string like "+0900" or "-0500" into minutes offset.
fn parse_timezone(s: &str) -> Result<i32> {
    if s.len() != 5 || !s.is_ascii() {
        return Err(Error::InvalidUtf8);
    }

    let sign = match s.as_bytes()[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return Err(Error::InvalidUtf8),
    };

    let hours: i32 = s[1..3].parse().map_err(|_| Error::InvalidUtf8)?;
    let minutes: i32 = s[3..5].parse().map_err(|_| Error::InvalidUtf8)?;

    Ok(sign * (hours * 60 + minutes))
}

/// A commit object.
///
/// The body is a [`Kvlm`] (the same ordered key-value-with-message format
/// annotated tags use) with typed accessors for the fields a commit is
/// required to carry. Unknown headers (e.g. `gpgsig`) pass through the
/// round trip untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The identifier of this commit.
    oid: Oid,
    /// The parsed body.
    body: Kvlm,
}

impl Commit {
    /// Parses a Commit from a decoded object and its identifier.
    pub fn parse(oid: Oid, raw: RawObject) -> Result<Self> {
        if raw.object_type != ObjectType::Commit {
            return Err(Error::TypeMismatch {
                expected: "commit",
                actual: raw.object_type.as_str(),
            });
        }

        let body = Kvlm::parse(&raw.content)?;
        Ok(Commit { oid, body })
    }

    /// Serializes the body back to the commit payload.
    pub fn serialize(&self) -> Vec<u8> {
        self.body.serialize()
    }

    /// Returns the identifier of this commit.
    pub fn oid(&self) -> &Oid {
        &self.oid
    }

    /// Returns the underlying key-value body.
    pub fn body(&self) -> &Kvlm {
        &self.body
    }

    /// Returns the tree identifier this commit points at.
    pub fn tree(&self) -> Result<Oid> {
        let value = self
            .body
            .get(b"tree")
            .ok_or_else(|| Error::MalformedKvlm("commit has no tree field".to_string()))?;
        let hex = std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8)?;
        Oid::from_hex(hex)
    }

    /// Returns the parent commit identifiers, in order. Empty for a root
    /// commit.
    pub fn parents(&self) -> Result<Vec<Oid>> {
        self.body
            .get_all(b"parent")
            .iter()
            .map(|value| {
                let hex = std::str::from_utf8(value).map_err(|_| Error::InvalidUtf8)?;
                Oid::from_hex(hex)
            })
            .collect()
    }

    /// Returns the author signature.
    pub fn author(&self) -> Result<Signature> {
        let value = self
            .body
            .get(b"author")
            .ok_or_else(|| Error::MalformedKvlm("commit has no author field".to_string()))?;
        Signature::parse(value)
    }

    /// Returns the committer signature.
    pub fn committer(&self) -> Result<Signature> {
        let value = self
            .body
            .get(b"committer")
            .ok_or_else(|| Error::MalformedKvlm("commit has no committer field".to_string()))?;
        Signature::parse(value)
    }

    /// Returns the commit message bytes.
    pub fn message(&self) -> &[u8] {
        self.body.message()
    }

    /// Returns the first line of the commit message, lossily decoded.
    pub fn summary(&self) -> String {
        let message = String::from_utf8_lossy(self.body.message()).into_owned();
        message.lines().next().unwrap_or("").to_string()
    }

    /// Returns true if this is a root commit (no parents).
    pub fn is_root(&self) -> bool {
        self.body.get_all(b"parent").is_empty()
    }

    /// Returns true if this is a merge commit (multiple parents).
    pub fn is_merge(&self) -> bool {
        self.body.get_all(b"parent").len() > 1
    }
}
