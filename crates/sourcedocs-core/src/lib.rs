//! SourceDocs Core - Markdown reference documentation for Swift modules
//!
//! This crate turns an inventory of declarations into a tree of Markdown
//! pages:
//! - Inventory: validation of raw declaration records
//! - Merge: folding extensions into the types they extend
//! - Filter: pruning by minimum access level
//! - Categories: grouping into classes, structs, protocols, ...
//! - Rendering: one Markdown document per declaration or per category
//! - Index: cross-reference table and the root `README`
//!
//! Reading the inventory from disk and writing the output tree are left to
//! the caller.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Declaration model
pub mod model;

/// Documentation comment parsing
pub mod doc_comment;

/// Inventory loading and validation
pub mod inventory;

/// Extension merging
pub mod merge;

/// Visibility filtering
pub mod filter;

/// Output categories
pub mod category;

/// Page index and link resolution
pub mod crosslink;

/// Markdown rendering
pub mod markdown;

/// Root index document
pub mod index;

/// Generation pipeline
pub mod generator;

/// Generation options
pub mod config;

/// Error types
pub mod error;

pub use category::{Categorized, Category};
pub use config::{Config, CONFIG_FILE};
pub use doc_comment::{DocComment, ParamDoc};
pub use error::{ConfigError, Error, InventoryError, Result};
pub use generator::{GeneratedDocs, Generator};
pub use inventory::Inventory;
pub use model::{AccessLevel, DeclKind, Declaration, SourceLocation};
