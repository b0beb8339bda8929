//! Key-value-list-with-message codec, the body format shared by commits
//! and annotated tags.
//!
//! The format is line oriented: `key SPACE value NEWLINE` header lines
//! (a value may span lines; continuation lines start with a single space),
//! keys may repeat (e.g. `parent`), and a blank line separates the headers
//! from the free-form message that runs to the end of the payload.
//!
//! Field order and repeated keys are preserved exactly across a
//! parse/serialize round trip. The body bytes feed the identifier digest,
//! so re-serialization must be byte-identical.

use crate::error::{Error, Result};

/// An ordered, repeatable-key header map plus a trailing message.
///
/// Repeated keys keep the position of their first occurrence and
/// accumulate values in order, which matches how multiple `parent` lines
/// serialize back contiguously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Kvlm {
    /// Header fields in first-occurrence order.
    fields: Vec<(Vec<u8>, Vec<Vec<u8>>)>,
    /// The free-form message after the blank line.
    message: Vec<u8>,
}

impl Kvlm {
    /// Creates an empty body with no headers and an empty message.
    pub fn new() -> Self {
        Kvlm::default()
    }

    /// Parses a commit/tag body.
    ///
    /// Iterative scan, no recursion: a pathological number of header lines
    /// cannot exhaust the stack.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let mut kvlm = Kvlm::new();
        let mut pos = 0;

        loop {
            let space = find_byte(raw, b' ', pos);
            let newline = find_byte(raw, b'\n', pos);

            // A blank line (newline at the current position), or no space
            // before the next newline, terminates the headers; everything
            // after that newline is the message.
            let header_space = match (space, newline) {
                (Some(s), Some(n)) if s < n => s,
                (_, Some(n)) => {
                    if n != pos {
                        return Err(Error::MalformedKvlm(format!(
                            "header line without separator at byte {}",
                            pos
                        )));
                    }
                    kvlm.message = raw[n + 1..].to_vec();
                    return Ok(kvlm);
                }
                (_, None) => {
                    return Err(Error::MalformedKvlm(
                        "missing blank line before message".to_string(),
                    ));
                }
            };

            let key = raw[pos..header_space].to_vec();

            // The value ends at the first newline not followed by a
            // continuation space.
            let mut end = header_space;
            loop {
                end = match find_byte(raw, b'\n', end + 1) {
                    Some(n) => n,
                    None => {
                        return Err(Error::MalformedKvlm(format!(
                            "unterminated value for key {:?}",
                            String::from_utf8_lossy(&key)
                        )));
                    }
                };
                if raw.get(end + 1) != Some(&b' ') {
                    break;
                }
            }

            let mut value = Vec::with_capacity(end - header_space);
            let mut rest = &raw[header_space + 1..end];
            // Drop the single leading space of each continuation line.
            while let Some(n) = find_byte(rest, b'\n', 0) {
                value.extend_from_slice(&rest[..=n]);
                rest = &rest[n + 2..];
            }
            value.extend_from_slice(rest);

            kvlm.append(key, value);
            pos = end + 1;
        }
    }

    /// Serializes the body back to its wire form.
    ///
    /// Exact inverse of [`Kvlm::parse`]: headers in stored order, repeated
    /// keys as consecutive lines, embedded newlines re-prefixed with the
    /// continuation space, then one blank line and the message.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::new();

        for (key, values) in &self.fields {
            for value in values {
                out.extend_from_slice(key);
                out.push(b' ');
                for &byte in value {
                    out.push(byte);
                    if byte == b'\n' {
                        out.push(b' ');
                    }
                }
                out.push(b'\n');
            }
        }

        out.push(b'\n');
        out.extend_from_slice(&self.message);
        out
    }

    /// Appends a value under `key`, preserving first-occurrence order.
    pub fn append(&mut self, key: Vec<u8>, value: Vec<u8>) {
        if let Some((_, values)) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            values.push(value);
        } else {
            self.fields.push((key, vec![value]));
        }
    }

    /// Returns the first value stored under `key`, if any.
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.first())
            .map(|v| v.as_slice())
    }

    /// Returns every value stored under `key`, in order.
    pub fn get_all(&self, key: &[u8]) -> &[Vec<u8>] {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the message bytes.
    pub fn message(&self) -> &[u8] {
        &self.message
    }

    /// Replaces the message bytes.
    pub fn set_message(&mut self, message: Vec<u8>) {
        self.message = message;
    }

    /// Iterates over `(key, values)` header slots in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[Vec<u8>])> {
        self.fields
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}

/// Finds the next occurrence of `needle` at or after `from`.
fn find_byte(haystack: &[u8], needle: u8, from: usize) -> Option<usize> {
    if from > haystack.len() {
        return None;
    }
    haystack[from..]
        .iter()
        .position(|&b| b == needle)
        .map(|i| from + i)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Built line by line so the continuation lines keep their mandatory
    // leading space (a `\`-continued literal would strip it).
    fn sample_commit() -> Vec<u8> {
        let lines: &[&[u8]] = &[
            b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n",
            b"parent 206941306e8a8af65b66eaaaea388a7ae24d49a0\n",
            b"author Thibault Polge <thibault@thb.lt> 1527025023 +0200\n",
            b"committer Thibault Polge <thibault@thb.lt> 1527025044 +0200\n",
            b"gpgsig -----BEGIN PGP SIGNATURE-----\n",
            b" \n",
            b" iQIzBAABCAAdFiEExwXquOM8bWb4Q2zVGxM2FxoLkGQFAlsEjZQACgkQGxM2FxoL\n",
            b" kGQdcBAAqPP+ln4nGDd2gETXjvOpOxLzIMEw4A9gU6CzWzm+oB8mEIKyaH0UFIPh\n",
            b" =lgTX\n",
            b" -----END PGP SIGNATURE-----\n",
            b"\n",
            b"Create first draft",
        ];
        let raw: Vec<u8> = lines.concat();
        // The fixture must actually contain continuation lines.
        assert!(raw.windows(2).filter(|w| w == b"\n ").count() >= 5);
        raw
    }

    // K-001: parse extracts scalar headers
    #[test]
    fn test_parse_headers() {
        let kvlm = Kvlm::parse(&sample_commit()).unwrap();

        assert_eq!(
            kvlm.get(b"tree").unwrap(),
            b"29ff16c9c14e2652b22f8b78bb08a5a07930c147"
        );
        assert_eq!(
            kvlm.get(b"author").unwrap(),
            b"Thibault Polge <thibault@thb.lt> 1527025023 +0200"
        );
    }

    // K-002: parse extracts the message
    #[test]
    fn test_parse_message() {
        let kvlm = Kvlm::parse(&sample_commit()).unwrap();
        assert_eq!(kvlm.message(), b"Create first draft");
    }

    // K-003: continuation lines are rejoined with plain newlines
    #[test]
    fn test_parse_continuation_lines() {
        let kvlm = Kvlm::parse(&sample_commit()).unwrap();
        let gpgsig = kvlm.get(b"gpgsig").unwrap();

        assert!(gpgsig.starts_with(b"-----BEGIN PGP SIGNATURE-----\n"));
        assert!(gpgsig.ends_with(b"-----END PGP SIGNATURE-----"));
        // The continuation space itself must be gone.
        assert!(!gpgsig.windows(2).any(|w| w == b"\n "));
    }

    // K-004: repeated keys accumulate in order
    #[test]
    fn test_parse_repeated_keys() {
        let raw = b"tree 29ff16c9c14e2652b22f8b78bb08a5a07930c147\n\
parent 1111111111111111111111111111111111111111\n\
parent 2222222222222222222222222222222222222222\n\
\n\
Merge";
        let kvlm = Kvlm::parse(raw).unwrap();

        let parents = kvlm.get_all(b"parent");
        assert_eq!(parents.len(), 2);
        assert_eq!(parents[0], b"1111111111111111111111111111111111111111");
        assert_eq!(parents[1], b"2222222222222222222222222222222222222222");

        // get() returns the first
        assert_eq!(
            kvlm.get(b"parent").unwrap(),
            b"1111111111111111111111111111111111111111"
        );
    }

    // K-005: serialize is the exact inverse of parse
    #[test]
    fn test_roundtrip_bytes() {
        let raw = sample_commit();
        let kvlm = Kvlm::parse(&raw).unwrap();
        assert_eq!(kvlm.serialize(), raw);
    }

    // K-006: parse(serialize(m)) == m for a built-up body
    #[test]
    fn test_roundtrip_value() {
        let mut kvlm = Kvlm::new();
        kvlm.append(b"tree".to_vec(), vec![b'a'; 40]);
        kvlm.append(b"parent".to_vec(), vec![b'b'; 40]);
        kvlm.append(b"parent".to_vec(), vec![b'c'; 40]);
        kvlm.append(
            b"note".to_vec(),
            b"first line\nsecond line\nthird".to_vec(),
        );
        kvlm.set_message(b"subject\n\nbody text\n".to_vec());

        let reparsed = Kvlm::parse(&kvlm.serialize()).unwrap();
        assert_eq!(reparsed, kvlm);
    }

    // K-007: empty message after the blank line
    #[test]
    fn test_empty_message() {
        let raw = b"key value\n\n";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.get(b"key").unwrap(), b"value");
        assert_eq!(kvlm.message(), b"");
        assert_eq!(kvlm.serialize(), raw);
    }

    // K-008: message-only body (blank line first)
    #[test]
    fn test_message_only() {
        let raw = b"\njust a message";
        let kvlm = Kvlm::parse(raw).unwrap();
        assert_eq!(kvlm.iter().count(), 0);
        assert_eq!(kvlm.message(), b"just a message");
        assert_eq!(kvlm.serialize(), raw);
    }

    // K-009: missing message separator is malformed
    #[test]
    fn test_missing_separator() {
        let raw = b"key value\nother thing\n";
        assert!(matches!(Kvlm::parse(raw), Err(Error::MalformedKvlm(_))));

        let raw = b"key value";
        assert!(matches!(Kvlm::parse(raw), Err(Error::MalformedKvlm(_))));
    }

    // K-010: unterminated header value is malformed
    #[test]
    fn test_unterminated_value() {
        let raw = b"key value with no newline at all";
        assert!(matches!(Kvlm::parse(raw), Err(Error::MalformedKvlm(_))));
    }

    // K-011: field order is preserved, not sorted
    #[test]
    fn test_order_preserved() {
        let raw = b"zebra 1\nalpha 2\nmike 3\n\nmsg";
        let kvlm = Kvlm::parse(raw).unwrap();

        let keys: Vec<&[u8]> = kvlm.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&b"zebra"[..], &b"alpha"[..], &b"mike"[..]]);
        assert_eq!(kvlm.serialize(), raw);
    }

    // K-012: a value ending in a newline keeps it through the round trip
    #[test]
    fn test_value_with_trailing_content() {
        let mut kvlm = Kvlm::new();
        kvlm.append(b"k".to_vec(), b"line1\nline2".to_vec());
        kvlm.set_message(b"m".to_vec());

        let raw = kvlm.serialize();
        assert_eq!(raw, b"k line1\n line2\n\nm");
        assert_eq!(Kvlm::parse(&raw).unwrap(), kvlm);
    }
}
