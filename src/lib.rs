//! Rebase - content-addressed asset rebasing for bundled scripts.
//!
//! Scripts and stylesheets reference images, fonts and other stylesheets by
//! relative path. Rebasing copies every referenced file into the output
//! directory under a name derived from its content, then rewrites each
//! reference to point at the copy:
//!
//! ```text
//! src/index.js   import logo from "./img/logo.png"
//!      │
//!      ▼
//! dist/index.js  import logo from "./static/3f2a9c1e.png"
//! dist/static/3f2a9c1e.png
//! ```
//!
//! Stylesheets are followed recursively: their `url()` and `@import`
//! references are rebased before the stylesheet itself is hashed.

pub mod asset;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use error::{RebaseError, Result};
pub use pipeline::{Build, BuildReport, RewriteResult};
