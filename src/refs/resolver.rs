//! Reference files and their resolution to identifiers.
//!
//! A reference is a file under the repository directory whose content is
//! either a 40-character hex identifier or a symbolic redirect of the form
//! `ref: refs/heads/main`. Resolution follows redirects until it reaches an
//! identifier, guarding against both cycles and unbounded chains.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objects::Oid;

/// The maximum number of symbolic redirects a resolution may follow.
const MAX_SYMBOLIC_DEPTH: usize = 10;

/// The content of a single reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// A direct reference to an object.
    Direct(Oid),
    /// A symbolic redirect to another reference, by name.
    Symbolic(String),
}

/// A fully resolved reference: the name it started from and the identifier
/// it ended at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// The reference name, e.g. `refs/heads/main` or `HEAD`.
    pub name: String,
    /// The identifier the reference resolves to.
    pub oid: Oid,
}

/// Reads and writes reference files under a repository directory.
#[derive(Debug, Clone)]
pub struct RefStore {
    /// The repository directory (the one holding `HEAD` and `refs/`).
    git_dir: PathBuf,
}

impl RefStore {
    /// Creates a reference store for the given repository directory.
    pub fn new(git_dir: impl AsRef<Path>) -> Self {
        RefStore {
            git_dir: git_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the file path for a reference name.
    fn ref_path(&self, name: &str) -> PathBuf {
        self.git_dir.join(name)
    }

    /// Returns true if a reference file with this name exists.
    pub fn exists(&self, name: &str) -> bool {
        self.ref_path(name).is_file()
    }

    /// Reads one reference file without following redirects.
    ///
    /// Returns `Error::RefNotFound` when the file does not exist.
    pub fn read(&self, name: &str) -> Result<RefValue> {
        let path = self.ref_path(name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::RefNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let content = content.trim_end_matches('\n');
        if let Some(target) = content.strip_prefix("ref: ") {
            Ok(RefValue::Symbolic(target.to_string()))
        } else {
            Ok(RefValue::Direct(Oid::from_hex(content)?))
        }
    }

    /// Writes one reference file, creating parent directories as needed.
    pub fn write(&self, name: &str, value: &RefValue) -> Result<()> {
        let path = self.ref_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = match value {
            RefValue::Direct(oid) => format!("{}\n", oid.to_hex()),
            RefValue::Symbolic(target) => format!("ref: {}\n", target),
        };
        fs::write(&path, content)?;
        Ok(())
    }

    /// Resolves a reference name to an identifier, following symbolic
    /// redirects.
    ///
    /// Fails with `Error::CyclicReference` when the chain revisits a name
    /// or exceeds the depth bound, and `Error::RefNotFound` when any link
    /// in the chain is missing.
    pub fn resolve(&self, name: &str) -> Result<ResolvedRef> {
        let mut current = name.to_string();
        let mut visited: Vec<String> = Vec::new();

        loop {
            if visited.iter().any(|seen| *seen == current) || visited.len() >= MAX_SYMBOLIC_DEPTH {
                return Err(Error::CyclicReference(name.to_string()));
            }
            visited.push(current.clone());

            match self.read(&current)? {
                RefValue::Direct(oid) => {
                    return Ok(ResolvedRef {
                        name: name.to_string(),
                        oid,
                    });
                }
                RefValue::Symbolic(target) => current = target,
            }
        }
    }

    /// Resolves `HEAD`.
    pub fn head(&self) -> Result<ResolvedRef> {
        self.resolve("HEAD")
    }

    /// Lists every branch under `refs/heads/`, sorted by name.
    pub fn branches(&self) -> Result<Vec<String>> {
        self.list("refs/heads")
    }

    /// Lists every tag under `refs/tags/`, sorted by name.
    pub fn tags(&self) -> Result<Vec<String>> {
        self.list("refs/tags")
    }

    /// Lists reference names under a namespace, relative to it.
    fn list(&self, namespace: &str) -> Result<Vec<String>> {
        let root = self.git_dir.join(namespace);
        let mut names = Vec::new();
        if root.is_dir() {
            collect_refs_recursive(&root, "", &mut names)?;
        }
        names.sort();
        Ok(names)
    }
}

/// Walks a refs directory, accumulating slash-joined relative names.
fn collect_refs_recursive(dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        let name = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", prefix, file_name)
        };

        if entry.path().is_dir() {
            collect_refs_recursive(&entry.path(), &name, names)?;
        } else {
            names.push(name);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHA: &str = "abcdef0123456789abcdef0123456789abcdef01";

    fn make_store() -> (TempDir, RefStore) {
        let tmp = TempDir::new().unwrap();
        let store = RefStore::new(tmp.path());
        (tmp, store)
    }

    fn oid() -> Oid {
        Oid::from_hex(SHA).unwrap()
    }

    // R-001: direct reference round trip
    #[test]
    fn test_direct_roundtrip() {
        let (_tmp, store) = make_store();

        store
            .write("refs/heads/main", &RefValue::Direct(oid()))
            .unwrap();
        assert_eq!(
            store.read("refs/heads/main").unwrap(),
            RefValue::Direct(oid())
        );
    }

    // R-002: symbolic reference round trip
    #[test]
    fn test_symbolic_roundtrip() {
        let (_tmp, store) = make_store();

        store
            .write("HEAD", &RefValue::Symbolic("refs/heads/main".to_string()))
            .unwrap();
        assert_eq!(
            store.read("HEAD").unwrap(),
            RefValue::Symbolic("refs/heads/main".to_string())
        );
    }

    // R-003: the stored file uses the expected wire form
    #[test]
    fn test_file_format() {
        let (tmp, store) = make_store();

        store
            .write("HEAD", &RefValue::Symbolic("refs/heads/main".to_string()))
            .unwrap();
        store
            .write("refs/heads/main", &RefValue::Direct(oid()))
            .unwrap();

        let head = fs::read_to_string(tmp.path().join("HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/main\n");

        let branch = fs::read_to_string(tmp.path().join("refs/heads/main")).unwrap();
        assert_eq!(branch, format!("{}\n", SHA));
    }

    // R-004: resolve follows symbolic redirects to the identifier
    #[test]
    fn test_resolve_symbolic_chain() {
        let (_tmp, store) = make_store();

        store
            .write("HEAD", &RefValue::Symbolic("refs/heads/main".to_string()))
            .unwrap();
        store
            .write("refs/heads/main", &RefValue::Direct(oid()))
            .unwrap();

        let resolved = store.head().unwrap();
        assert_eq!(resolved.name, "HEAD");
        assert_eq!(resolved.oid, oid());
    }

    // R-005: a missing link in the chain is RefNotFound
    #[test]
    fn test_resolve_missing() {
        let (_tmp, store) = make_store();

        match store.resolve("refs/heads/nope") {
            Err(Error::RefNotFound(name)) => assert_eq!(name, "refs/heads/nope"),
            other => panic!("expected RefNotFound, got {:?}", other),
        }

        // HEAD pointing at a branch that was never created
        store
            .write("HEAD", &RefValue::Symbolic("refs/heads/gone".to_string()))
            .unwrap();
        assert!(matches!(store.head(), Err(Error::RefNotFound(_))));
    }

    // R-006: a two-reference cycle is detected
    #[test]
    fn test_resolve_cycle() {
        let (_tmp, store) = make_store();

        store
            .write("refs/heads/a", &RefValue::Symbolic("refs/heads/b".to_string()))
            .unwrap();
        store
            .write("refs/heads/b", &RefValue::Symbolic("refs/heads/a".to_string()))
            .unwrap();

        match store.resolve("refs/heads/a") {
            Err(Error::CyclicReference(name)) => assert_eq!(name, "refs/heads/a"),
            other => panic!("expected CyclicReference, got {:?}", other),
        }
    }

    // R-007: a self-referential reference is detected
    #[test]
    fn test_resolve_self_cycle() {
        let (_tmp, store) = make_store();

        store
            .write("refs/heads/me", &RefValue::Symbolic("refs/heads/me".to_string()))
            .unwrap();
        assert!(matches!(
            store.resolve("refs/heads/me"),
            Err(Error::CyclicReference(_))
        ));
    }

    // R-008: garbage in a reference file is rejected
    #[test]
    fn test_read_garbage() {
        let (tmp, store) = make_store();

        fs::write(tmp.path().join("HEAD"), "not a ref\n").unwrap();
        assert!(matches!(store.read("HEAD"), Err(Error::InvalidOid(_))));
    }

    // R-009: branch and tag listing, recursive and sorted
    #[test]
    fn test_listing() {
        let (_tmp, store) = make_store();

        store
            .write("refs/heads/main", &RefValue::Direct(oid()))
            .unwrap();
        store
            .write("refs/heads/feature/login", &RefValue::Direct(oid()))
            .unwrap();
        store
            .write("refs/tags/v1.0.0", &RefValue::Direct(oid()))
            .unwrap();

        assert_eq!(store.branches().unwrap(), vec!["feature/login", "main"]);
        assert_eq!(store.tags().unwrap(), vec!["v1.0.0"]);
    }

    // R-010: empty namespaces list as empty, not as errors
    #[test]
    fn test_listing_empty() {
        let (_tmp, store) = make_store();
        assert!(store.branches().unwrap().is_empty());
        assert!(store.tags().unwrap().is_empty());
    }
}
