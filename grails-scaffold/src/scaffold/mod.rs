//! Fragment generation for CRUD scaffolds
//!
//! Given an entity (table name, optional reference, ordered fields) this
//! module produces the text of every artifact a scaffold touches. Nothing
//! here reads or writes files; see [`crate::scaffolder`] for that.

pub mod entity;
pub mod field_type;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use entity::EntitySpec;
pub use field_type::{classify, FieldSpec, TargetType};
pub use generator::{ArtifactMerge, GeneratedFile, GeneratedScaffold, ScaffoldGenerator};
pub use helpers::TemplateHelpers;
pub use templates::{ScaffoldTemplate, TemplateRegistry};
