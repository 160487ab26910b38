//! Shared helpers for the rebasing engine.

pub mod path;
mod plural;

pub use plural::{plural_count, plural_s};
