//! Error types for loosegit.

use std::fmt;
use std::path::PathBuf;

/// The main error type for loosegit operations.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred.
    Io(std::io::Error),

    /// The specified path is not inside a repository.
    NotARepository(PathBuf),

    /// A repository already exists at the specified path.
    AlreadyARepository(PathBuf),

    /// The requested object was not found in the store.
    ObjectNotFound(String),

    /// The underlying reference file is absent.
    RefNotFound(String),

    /// A name resolved to zero candidate objects.
    NoSuchReference(String),

    /// A name resolved to more than one candidate object.
    AmbiguousReference {
        /// The name that was being resolved.
        name: String,
        /// Every candidate identifier, in hex.
        candidates: Vec<String>,
    },

    /// A symbolic reference chain loops or exceeds the redirect bound.
    CyclicReference(String),

    /// The specified path was not found.
    PathNotFound(PathBuf),

    /// The provided string is not a valid object ID.
    InvalidOid(String),

    /// The object envelope does not conform to `<type> <len>\0<payload>`.
    MalformedEnvelope(String),

    /// The envelope's type tag is not blob, tree, commit, or tag.
    UnknownObjectType(String),

    /// A tree entry does not conform to `<mode> <path>\0<20 bytes>`.
    MalformedTree(String),

    /// The tree payload ends in the middle of an entry.
    TruncatedTree,

    /// A commit/tag body does not conform to the key-value-with-message format.
    MalformedKvlm(String),

    /// Type mismatch when expecting a specific object type.
    TypeMismatch {
        /// The expected type.
        expected: &'static str,
        /// The actual type.
        actual: &'static str,
    },

    /// Invalid UTF-8 sequence encountered.
    InvalidUtf8,

    /// Zlib decompression failed.
    DecompressionFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::NotARepository(path) => {
                write!(f, "not a repository: {}", path.display())
            }
            Error::AlreadyARepository(path) => {
                write!(f, "repository already exists: {}", path.display())
            }
            Error::ObjectNotFound(oid) => write!(f, "object not found: {}", oid),
            Error::RefNotFound(name) => write!(f, "reference not found: {}", name),
            Error::NoSuchReference(name) => write!(f, "no such reference: {}", name),
            Error::AmbiguousReference { name, candidates } => {
                write!(
                    f,
                    "ambiguous reference {}: candidates are {}",
                    name,
                    candidates.join(", ")
                )
            }
            Error::CyclicReference(name) => {
                write!(f, "cyclic symbolic reference: {}", name)
            }
            Error::PathNotFound(path) => write!(f, "path not found: {}", path.display()),
            Error::InvalidOid(s) => write!(f, "invalid object id: {}", s),
            Error::MalformedEnvelope(reason) => {
                write!(f, "malformed object envelope: {}", reason)
            }
            Error::UnknownObjectType(tag) => write!(f, "unknown object type: {}", tag),
            Error::MalformedTree(reason) => write!(f, "malformed tree entry: {}", reason),
            Error::TruncatedTree => write!(f, "truncated tree payload"),
            Error::MalformedKvlm(reason) => {
                write!(f, "malformed commit/tag body: {}", reason)
            }
            Error::TypeMismatch { expected, actual } => {
                write!(f, "type mismatch: expected {}, got {}", expected, actual)
            }
            Error::InvalidUtf8 => write!(f, "invalid UTF-8 sequence"),
            Error::DecompressionFailed => write!(f, "zlib decompression failed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for loosegit operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as StdError;

    // E-001: Error::Io can be created from std::io::Error
    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("I/O error"));
    }

    // E-002: Error implements Display with human-readable messages
    #[test]
    fn test_error_display() {
        let error = Error::NotARepository(PathBuf::from("/tmp/not-a-repo"));
        assert_eq!(error.to_string(), "not a repository: /tmp/not-a-repo");

        let error = Error::ObjectNotFound("abc123".to_string());
        assert_eq!(error.to_string(), "object not found: abc123");

        let error = Error::NoSuchReference("topic".to_string());
        assert_eq!(error.to_string(), "no such reference: topic");
    }

    // E-003: AmbiguousReference lists every candidate verbatim
    #[test]
    fn test_ambiguous_lists_candidates() {
        let error = Error::AmbiguousReference {
            name: "aaaa".to_string(),
            candidates: vec!["aaaa1111".to_string(), "aaaa2222".to_string()],
        };
        let msg = error.to_string();
        assert!(msg.contains("aaaa1111"));
        assert!(msg.contains("aaaa2222"));
        assert!(msg.contains("ambiguous reference aaaa"));
    }

    // E-004: Error implements std::error::Error
    #[test]
    fn test_error_trait() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let error: Error = io_error.into();

        // source() returns the underlying io::Error
        let source = StdError::source(&error);
        assert!(source.is_some());

        // Non-Io errors return None
        let error = Error::TruncatedTree;
        assert!(StdError::source(&error).is_none());
    }

    // E-005: All error variants can be created and displayed
    #[test]
    fn test_all_error_variants() {
        let errors: Vec<Error> = vec![
            Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "test")),
            Error::NotARepository(PathBuf::from("/test")),
            Error::AlreadyARepository(PathBuf::from("/test")),
            Error::ObjectNotFound("abc".to_string()),
            Error::RefNotFound("refs/heads/main".to_string()),
            Error::NoSuchReference("topic".to_string()),
            Error::AmbiguousReference {
                name: "ab".to_string(),
                candidates: vec!["abcd".to_string()],
            },
            Error::CyclicReference("refs/heads/a".to_string()),
            Error::PathNotFound(PathBuf::from("/test/path")),
            Error::InvalidOid("xyz".to_string()),
            Error::MalformedEnvelope("missing NUL".to_string()),
            Error::UnknownObjectType("blub".to_string()),
            Error::MalformedTree("bad mode".to_string()),
            Error::TruncatedTree,
            Error::MalformedKvlm("missing message separator".to_string()),
            Error::TypeMismatch {
                expected: "commit",
                actual: "blob",
            },
            Error::InvalidUtf8,
            Error::DecompressionFailed,
        ];

        // All variants should implement Display without panicking
        for error in &errors {
            let _ = error.to_string();
            let _ = format!("{:?}", error);
        }
    }
}
