//! Internal infrastructure: hashing, compression, filesystem helpers.

pub mod compression;
pub mod fs;
pub mod hash;

pub use compression::{compress, decompress};
pub use fs::{read_file, write_file_atomic};
pub use hash::{sha1, Sha1};
