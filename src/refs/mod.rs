//! Reference storage and resolution.

pub mod resolver;

pub use resolver::{RefStore, RefValue, ResolvedRef};
