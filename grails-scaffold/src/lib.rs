//! grails-scaffold: incremental CRUD scaffolding for Fiber + GORM projects
//!
//! Each scaffold request describes one entity (a table with typed fields and
//! an optional reference to another entity). The crate renders the entity's
//! own files (model, handlers, views) and merges one fragment per entity into
//! the artifacts every entity shares:
//!
//! - the migrations file (one `AutoMigrate` line per model)
//! - the routes file (one route group per model)
//! - the model index (one entry per model behind a single import)
//! - the entity registry manifest (`models.json`)
//!
//! Shared artifacts are never regenerated from scratch. Merges are
//! idempotent, leave other entities' text untouched and refuse to guess when
//! an artifact has lost the anchor they rely on.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use grails_scaffold::prelude::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = ScaffoldConfig::load_from_dir(".")?;
//! let store = FsStore::new(".");
//!
//! let entity = EntitySpec::new(
//!     "order_item",
//!     vec![FieldSpec::new("quantity", "INT"), FieldSpec::new("price", "DECIMAL")],
//! )
//! .with_reference("order");
//!
//! let report = Scaffolder::new(&config, &store).scaffold(&entity, ScaffoldOptions::default())?;
//! for change in &report.changes {
//!     println!("{} {}", change.action, change.path.display());
//! }
//! # Ok(())
//! # }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod merge;
pub mod observability;
pub mod registry;
pub mod scaffold;
pub mod scaffolder;
pub mod store;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::ScaffoldConfig;
    pub use crate::error::{ScaffoldError, ScaffoldResult};
    pub use crate::merge::{merge, Fragment, InsertionPolicy, MergeOutcome, Merged};
    pub use crate::registry::EntityRegistry;
    pub use crate::scaffold::{classify, EntitySpec, FieldSpec, ScaffoldGenerator, TargetType};
    pub use crate::scaffolder::{FileAction, ScaffoldOptions, ScaffoldReport, Scaffolder};
    pub use crate::store::{ArtifactStore, FsStore, MemoryStore};
}
