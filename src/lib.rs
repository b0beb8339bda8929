//! # loosegit
//!
//! A minimal, pure Rust content-addressable object store with git's loose
//! object format and revision model.
//!
//! This crate provides the plumbing layer without external dependencies
//! like libgit2 or the git command-line tool: the object envelope codec,
//! SHA-1 identifiers, the tree and commit/tag body codecs, the loose
//! object store, and name resolution.
//!
//! ## Features
//!
//! - Read and write loose objects (blob, tree, commit, annotated tag)
//! - Byte-exact body codecs, so re-serialized objects keep their identifiers
//! - Resolve names: `HEAD`, branches, tags, full and abbreviated identifiers
//! - Follow tag and commit indirections to a desired object type
//!
//! ## Quick Start
//!
//! ```no_run
//! use loosegit::{Repository, Result};
//!
//! fn main() -> Result<()> {
//!     // Open a repository
//!     let repo = Repository::open("path/to/repo")?;
//!
//!     // Read the commit HEAD points at
//!     let commit = repo.commit("HEAD")?;
//!     println!("Latest commit: {}", commit.summary());
//!
//!     // A short identifier works anywhere a name does
//!     let tree = repo.tree(&commit.oid().short())?;
//!     for entry in tree.iter() {
//!         println!("{} {}", entry.mode_display(), entry.oid());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`error`] - Error types and Result alias
//! - [`repository`] - Main `Repository` type: discovery and name resolution
//! - [`objects`] - Object types, codecs, and the loose object store
//! - [`refs`] - References (HEAD, branches, tags)

pub mod error;
pub mod objects;
pub mod refs;
pub mod repository;

// Internal modules (not part of public API)
pub(crate) mod infra;

// Re-export primary types for convenient access
pub use error::{Error, Result};
pub use repository::Repository;

// Re-export object types
pub use objects::{
    Blob, Commit, Kvlm, LooseObjectStore, Object, ObjectType, Oid, RawObject, Signature,
    TagObject, Tree, TreeEntry,
};

// Re-export reference types
pub use refs::{RefStore, RefValue, ResolvedRef};
