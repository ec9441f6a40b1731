//! Declaration File Loading
//!
//! This crate loads declaration files (YAML or JSON) that describe integer
//! constant groups, merges several files of one package, and hands the
//! resulting groups to code generation in discovery order.

pub mod file;
pub mod resolver;

// Re-export commonly used types at the crate root
pub use file::{DeclFile, FileFormat};
pub use resolver::DeclResolver;

// Re-export stringer_types for convenience
pub use stringer_types;
