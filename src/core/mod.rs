//! Core types - pure abstractions shared across the engine.

mod link;

pub use link::LinkKind;
