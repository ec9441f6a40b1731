//! Declaration Types
//!
//! This crate contains the core data types for the stringer toolchain.
//! It provides pure data structures describing declared integer constant
//! groups and generation options, without any file I/O or code generation
//! logic.

pub mod integer;
pub mod types;

// Re-export commonly used types at the crate root
pub use integer::*;
pub use types::*;
