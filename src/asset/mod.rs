//! Asset discovery, content addressing and rewriting.
//!
//! ```text
//! script ──scan──► AssetReference ──resolve──► path ──emit──► EmittedAsset
//!                                                 │              ▲
//!                                     stylesheet? └──rewrite─────┘ (recursive)
//! ```

mod css;
mod emit;
pub mod hash;
mod kind;
mod place;
mod reference;
mod registry;
mod resolve;
mod rewrite;
mod scan;

// Types
pub use hash::{ContentHash, ResolvedAsset, TOKEN_LEN};
pub use kind::{AssetKind, SourceKind};
pub use place::{NamingPolicy, OutputPlacer};
pub use reference::AssetReference;
pub use registry::{AssetRegistry, EmittedAsset};
pub use resolve::PathResolver;

// Scanning (pure functions)
pub use css::scan_stylesheet;
pub use scan::scan_script;

// Rewriting and emission (side effects)
pub use css::{ImportStack, cycle_group, rewrite_stylesheet};
pub use emit::{Emitter, read_text};
pub use rewrite::{Edit, relative_specifier, splice};
