//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.

pub mod fs;

pub use fs::{normalize_path, resolve_under};
