//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects beyond
//! `canonicalize` lookups.
//!
//! - [`fs`]: Filesystem paths (`normalize_path`, `clean_path`, `relative_to`)
//! - [`route`]: Specifier strings (`is_external_link`, `split_suffix`)

pub mod fs;
pub mod route;

pub use fs::{clean_path, normalize_path, relative_to, to_slash};
pub use route::{is_external_link, split_suffix};
