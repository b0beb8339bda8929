//! Repository operations.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::objects::oid::OID_HEX_LEN;
use crate::objects::store::DEFAULT_MIN_PREFIX_LEN;
use crate::objects::{
    Blob, Commit, LooseObjectStore, Object, ObjectType, Oid, TagObject, Tree,
};
use crate::refs::{RefStore, RefValue};

/// A repository.
///
/// This is the main entry point: it locates the `.git` directory and
/// provides access to objects and references, including name resolution
/// (`HEAD`, branch and tag names, full and abbreviated identifiers).
#[derive(Debug)]
pub struct Repository {
    /// The root directory of the working tree.
    work_dir: PathBuf,
    /// The path to the `.git` directory.
    git_dir: PathBuf,
}

impl Repository {
    /// Validates that a directory is a valid Git directory.
    ///
    /// A valid `.git` directory must contain at least:
    /// - `HEAD` file
    /// - `objects/` directory
    /// - `refs/` directory
    fn validate_git_dir(git_dir: &Path) -> Result<()> {
        // Check that .git directory exists and is a directory
        if !git_dir.is_dir() {
            return Err(Error::NotARepository(git_dir.to_path_buf()));
        }

        // Check for HEAD file
        let head_path = git_dir.join("HEAD");
        if !head_path.is_file() {
            return Err(Error::NotARepository(git_dir.to_path_buf()));
        }

        // Check for objects directory
        let objects_path = git_dir.join("objects");
        if !objects_path.is_dir() {
            return Err(Error::NotARepository(git_dir.to_path_buf()));
        }

        // Check for refs directory
        let refs_path = git_dir.join("refs");
        if !refs_path.is_dir() {
            return Err(Error::NotARepository(git_dir.to_path_buf()));
        }

        Ok(())
    }

    /// Creates a new repository at the given path.
    ///
    /// Lays down the minimal `.git` skeleton: `objects/`, `refs/heads/`,
    /// `refs/tags/`, and a `HEAD` pointing at the unborn `main` branch.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the working tree root. Created if missing.
    ///
    /// # Returns
    ///
    /// The freshly initialized `Repository`.
    ///
    /// # Errors
    ///
    /// - `Error::AlreadyARepository` if a `.git` directory already exists there.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::repository::Repository;
    ///
    /// let repo = Repository::init("path/to/new/repo").unwrap();
    /// ```
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self> {
        let work_dir = path.as_ref().to_path_buf();
        let git_dir = work_dir.join(".git");

        if git_dir.exists() {
            return Err(Error::AlreadyARepository(work_dir));
        }

        fs::create_dir_all(git_dir.join("objects"))?;
        fs::create_dir_all(git_dir.join("refs").join("heads"))?;
        fs::create_dir_all(git_dir.join("refs").join("tags"))?;
        fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n")?;

        Ok(Repository { work_dir, git_dir })
    }

    /// Opens an existing repository.
    ///
    /// The path can point to either:
    /// - The repository root (containing `.git/`)
    /// - The `.git` directory itself
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the repository root or `.git` directory.
    ///
    /// # Returns
    ///
    /// A `Repository` instance, or an error if the path is not a valid repository.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::repository::Repository;
    ///
    /// // Open by repository root
    /// let repo = Repository::open("path/to/repo").unwrap();
    ///
    /// // Open by .git directory
    /// let repo = Repository::open("path/to/repo/.git").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Canonicalize the path to resolve any symlinks and get absolute path
        let abs_path = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        // Determine if we're given the .git directory or the work tree
        let (work_dir, git_dir) = if abs_path.ends_with(".git") {
            // Given the .git directory directly
            let git_dir = abs_path.clone();
            let work_dir = abs_path
                .parent()
                .ok_or_else(|| Error::NotARepository(path.to_path_buf()))?
                .to_path_buf();
            (work_dir, git_dir)
        } else {
            // Given the work tree, .git should be a subdirectory
            let git_dir = abs_path.join(".git");
            (abs_path, git_dir)
        };

        // Validate that it's a proper git directory
        Self::validate_git_dir(&git_dir)?;

        Ok(Repository { work_dir, git_dir })
    }

    /// Discovers a repository by searching upward from the given path.
    ///
    /// Starting from `path`, this function walks up the directory tree
    /// looking for a `.git` directory until it finds one or reaches the
    /// filesystem root.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to start searching from.
    ///
    /// # Returns
    ///
    /// A `Repository` instance, or an error if no repository is found.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::repository::Repository;
    ///
    /// // Discover repository from a subdirectory
    /// let repo = Repository::discover("path/to/repo/src/lib").unwrap();
    /// ```
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Canonicalize the starting path
        let mut current = path
            .canonicalize()
            .map_err(|_| Error::NotARepository(path.to_path_buf()))?;

        loop {
            let git_dir = current.join(".git");

            // Check if .git exists and is valid
            if git_dir.is_dir() && Self::validate_git_dir(&git_dir).is_ok() {
                return Ok(Repository {
                    work_dir: current,
                    git_dir,
                });
            }

            // Move to parent directory
            match current.parent() {
                Some(parent) => {
                    current = parent.to_path_buf();
                }
                None => {
                    // Reached filesystem root without finding a repository
                    return Err(Error::NotARepository(path.to_path_buf()));
                }
            }
        }
    }

    /// Returns the path to the repository root (working directory).
    pub fn path(&self) -> &Path {
        &self.work_dir
    }

    /// Returns the path to the `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Returns the loose object store for this repository.
    pub fn object_store(&self) -> LooseObjectStore {
        LooseObjectStore::new(&self.git_dir)
    }

    /// Returns the reference store for this repository.
    pub fn ref_store(&self) -> RefStore {
        RefStore::new(&self.git_dir)
    }

    /// Resolves a name to every identifier it could mean.
    ///
    /// The candidates are gathered from, in order:
    /// - `HEAD` (the literal name only)
    /// - a full 40-character hex identifier, taken at face value
    /// - an abbreviated hex prefix of at least 4 characters, searched in
    ///   the object store
    /// - `refs/heads/<name>`, `refs/tags/<name>`, `refs/remotes/<name>`,
    ///   and `name` itself as a full reference path
    ///
    /// A name like `beef` can legitimately be both an abbreviated
    /// identifier and a branch name; every meaning is returned and
    /// disambiguation is left to [`Repository::find_object`].
    ///
    /// # Arguments
    ///
    /// * `name` - The name to resolve.
    ///
    /// # Returns
    ///
    /// The candidate identifiers, deduplicated, possibly empty.
    pub fn resolve_name(&self, name: &str) -> Result<Vec<Oid>> {
        let name = name.trim();
        let mut candidates: Vec<Oid> = Vec::new();

        if name.is_empty() {
            return Ok(candidates);
        }

        if name == "HEAD" {
            match self.ref_store().head() {
                Ok(resolved) => candidates.push(resolved.oid),
                // An unborn branch: HEAD exists but its target does not.
                Err(Error::RefNotFound(_)) => {}
                Err(e) => return Err(e),
            }
            return Ok(candidates);
        }

        // Hex names longer than a full identifier can only be ref names.
        let is_hex =
            name.len() <= OID_HEX_LEN && name.chars().all(|c| c.is_ascii_hexdigit());
        if is_hex && name.len() == OID_HEX_LEN {
            candidates.push(Oid::from_hex(name)?);
        } else if is_hex && name.len() >= DEFAULT_MIN_PREFIX_LEN {
            candidates.extend(self.object_store().find_by_prefix(name)?);
        }

        let ref_store = self.ref_store();
        let full_paths = [
            format!("refs/heads/{}", name),
            format!("refs/tags/{}", name),
            format!("refs/remotes/{}", name),
            name.to_string(),
        ];
        for full_path in &full_paths {
            if ref_store.exists(full_path) {
                candidates.push(ref_store.resolve(full_path)?.oid);
            }
        }

        // A branch and a tag of the same name may point at the same object;
        // that is one candidate, not an ambiguity.
        let mut unique: Vec<Oid> = Vec::with_capacity(candidates.len());
        for oid in candidates {
            if !unique.contains(&oid) {
                unique.push(oid);
            }
        }
        Ok(unique)
    }

    /// Resolves a name to exactly one identifier, optionally coercing to a
    /// desired object type.
    ///
    /// After [`Repository::resolve_name`] narrows the name to a single
    /// candidate, the coercion walk follows indirections toward `desired`:
    /// an annotated tag is unwrapped to its target, and a commit is
    /// unwrapped to its tree when a tree is wanted. With `follow` false the
    /// candidate's type must match as-is.
    ///
    /// # Arguments
    ///
    /// * `name` - The name to resolve.
    /// * `desired` - The wanted object type, or `None` to accept any.
    /// * `follow` - Whether to walk tag and commit indirections.
    ///
    /// # Returns
    ///
    /// The identifier, or `None` when the object exists but cannot be
    /// coerced to `desired`.
    ///
    /// # Errors
    ///
    /// - `Error::NoSuchReference` if the name matches nothing.
    /// - `Error::AmbiguousReference` if the name matches more than one
    ///   identifier; the error lists every candidate.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::objects::ObjectType;
    /// use loosegit::repository::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    ///
    /// // The tree of the commit the `v1.0.0` tag points at.
    /// let tree = repo.find_object("v1.0.0", Some(ObjectType::Tree), true).unwrap();
    /// ```
    pub fn find_object(
        &self,
        name: &str,
        desired: Option<ObjectType>,
        follow: bool,
    ) -> Result<Option<Oid>> {
        let candidates = self.resolve_name(name)?;

        let mut oid = match candidates.len() {
            0 => return Err(Error::NoSuchReference(name.to_string())),
            1 => candidates[0],
            _ => {
                return Err(Error::AmbiguousReference {
                    name: name.to_string(),
                    candidates: candidates.iter().map(|oid| oid.to_hex()).collect(),
                });
            }
        };

        let desired = match desired {
            Some(desired) => desired,
            None => return Ok(Some(oid)),
        };

        let store = self.object_store();
        loop {
            let raw = store.read(&oid)?;

            if raw.object_type == desired {
                return Ok(Some(oid));
            }
            if !follow {
                return Ok(None);
            }

            match raw.object_type {
                // A tag always unwraps to whatever it points at.
                ObjectType::Tag => {
                    oid = TagObject::parse(oid, raw)?.object()?;
                }
                // A commit unwraps to its tree, but only when a tree is wanted.
                ObjectType::Commit if desired == ObjectType::Tree => {
                    oid = Commit::parse(oid, raw)?.tree()?;
                }
                _ => return Ok(None),
            }
        }
    }

    /// Retrieves a commit by name.
    ///
    /// Tag names are followed to the commit they ultimately point at.
    ///
    /// # Arguments
    ///
    /// * `name` - A name `resolve_name` understands.
    ///
    /// # Errors
    ///
    /// - `Error::NoSuchReference` / `Error::AmbiguousReference` from resolution.
    /// - `Error::ObjectNotFound` if the name resolves to something that is
    ///   not, and does not lead to, a commit.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::repository::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// let commit = repo.commit("HEAD").unwrap();
    /// println!("Author: {}", commit.author().unwrap().name());
    /// ```
    pub fn commit(&self, name: &str) -> Result<Commit> {
        let oid = self
            .find_object(name, Some(ObjectType::Commit), true)?
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        let raw = self.object_store().read(&oid)?;
        Commit::parse(oid, raw)
    }

    /// Retrieves a tree by name.
    ///
    /// Both tag and commit indirections are followed, so a branch name
    /// yields the tree of its tip commit.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::repository::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// let tree = repo.tree("HEAD").unwrap();
    /// for entry in tree.iter() {
    ///     println!("{} {}", entry.mode_display(), entry.path_str().unwrap());
    /// }
    /// ```
    pub fn tree(&self, name: &str) -> Result<Tree> {
        let oid = self
            .find_object(name, Some(ObjectType::Tree), true)?
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        let raw = self.object_store().read(&oid)?;
        Tree::parse(raw)
    }

    /// Retrieves a blob by name.
    pub fn blob(&self, name: &str) -> Result<Blob> {
        let oid = self
            .find_object(name, Some(ObjectType::Blob), true)?
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        let raw = self.object_store().read(&oid)?;
        Blob::parse(raw)
    }

    /// Retrieves an annotated tag object by name, without unwrapping it.
    pub fn tag(&self, name: &str) -> Result<TagObject> {
        let oid = self
            .find_object(name, Some(ObjectType::Tag), false)?
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        let raw = self.object_store().read(&oid)?;
        TagObject::parse(oid, raw)
    }

    /// Retrieves any object by name, as the unified `Object` enum.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use loosegit::objects::Object;
    /// use loosegit::repository::Repository;
    ///
    /// let repo = Repository::open("path/to/repo").unwrap();
    /// match repo.object("HEAD").unwrap() {
    ///     Object::Blob(blob) => println!("Blob: {} bytes", blob.size()),
    ///     Object::Tree(tree) => println!("Tree: {} entries", tree.len()),
    ///     Object::Commit(commit) => println!("Commit: {}", commit.summary()),
    ///     Object::Tag(tag) => println!("Tag: {}", tag.summary()),
    /// }
    /// ```
    pub fn object(&self, name: &str) -> Result<Object> {
        let oid = self
            .find_object(name, None, false)?
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        let raw = self.object_store().read(&oid)?;
        Object::parse(oid, raw)
    }

    /// Writes an object into the store, returning its identifier.
    pub fn write_object(&self, object: &Object) -> Result<Oid> {
        self.object_store().write(object.kind(), &object.serialize())
    }

    /// Resolves `HEAD` to the identifier it points at.
    ///
    /// # Errors
    ///
    /// - `Error::RefNotFound` if HEAD points at an unborn branch.
    pub fn head(&self) -> Result<Oid> {
        Ok(self.ref_store().head()?.oid)
    }

    /// Writes or updates a branch under `refs/heads/`.
    pub fn set_branch(&self, name: &str, oid: Oid) -> Result<()> {
        self.ref_store()
            .write(&format!("refs/heads/{}", name), &RefValue::Direct(oid))
    }

    /// Writes or updates a lightweight tag under `refs/tags/`.
    pub fn set_tag(&self, name: &str, oid: Oid) -> Result<()> {
        self.ref_store()
            .write(&format!("refs/tags/{}", name), &RefValue::Direct(oid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // RP-001: init lays down a valid skeleton that open accepts
    #[test]
    fn test_init_then_open() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repo");

        let repo = Repository::init(&root).unwrap();
        assert!(repo.git_dir().join("objects").is_dir());
        assert!(repo.git_dir().join("refs").join("heads").is_dir());
        assert!(repo.git_dir().join("refs").join("tags").is_dir());

        let head = fs::read_to_string(repo.git_dir().join("HEAD")).unwrap();
        assert_eq!(head, "ref: refs/heads/main\n");

        assert!(Repository::open(&root).is_ok());
    }

    // RP-002: init refuses to clobber an existing repository
    #[test]
    fn test_init_already_exists() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repo");

        Repository::init(&root).unwrap();
        assert!(matches!(
            Repository::init(&root),
            Err(Error::AlreadyARepository(_))
        ));
    }

    // RP-003: open rejects a directory that is not a repository
    #[test]
    fn test_open_not_a_repository() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Repository::open(tmp.path()),
            Err(Error::NotARepository(_))
        ));
    }

    // RP-004: open accepts the .git directory itself
    #[test]
    fn test_open_by_git_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repo");
        Repository::init(&root).unwrap();

        let repo = Repository::open(root.join(".git")).unwrap();
        assert!(repo.path().ends_with("repo"));
    }

    // RP-005: discover walks upward to the enclosing repository
    #[test]
    fn test_discover() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repo");
        Repository::init(&root).unwrap();

        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let repo = Repository::discover(&nested).unwrap();
        assert!(repo.path().ends_with("repo"));
    }

    // RP-006: discover fails when no repository encloses the path
    #[test]
    fn test_discover_none() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Repository::discover(tmp.path()),
            Err(Error::NotARepository(_))
        ));
    }
}
