//! Entity registry
//!
//! The registry records every scaffolded entity and its submitted fields in a
//! JSON manifest (`models.json` by default):
//!
//! ```json
//! {
//!   "OrderItem": [
//!     { "name": "quantity", "type": "INT" },
//!     { "name": "price", "type": "DECIMAL" }
//!   ]
//! }
//! ```
//!
//! The manifest is written through the keyed-container merge policy and read
//! back here into a typed map. Consumers load it once at startup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ScaffoldError, ScaffoldResult};
use crate::scaffold::{FieldSpec, TemplateHelpers};
use crate::store::ArtifactStore;

/// Mapping from entity identifier to its field list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityRegistry {
    entities: BTreeMap<String, Vec<FieldSpec>>,
}

impl EntityRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the registry manifest from `store`
    ///
    /// A missing or empty manifest yields an empty registry.
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::Io`] if the manifest cannot be read and
    /// [`ScaffoldError::MalformedArtifact`] if it is not a JSON object of
    /// field lists.
    pub fn load(store: &dyn ArtifactStore, path: &Path) -> ScaffoldResult<Self> {
        match store.read_optional(path)? {
            None => Ok(Self::new()),
            Some(text) if text.trim().is_empty() => Ok(Self::new()),
            Some(text) => Self::parse(path, &text),
        }
    }

    /// Parse manifest text
    ///
    /// # Errors
    ///
    /// [`ScaffoldError::MalformedArtifact`] if the text is not a JSON object
    /// of field lists.
    pub fn parse(path: &Path, text: &str) -> ScaffoldResult<Self> {
        serde_json::from_str(text)
            .map_err(|err| ScaffoldError::malformed(path, format!("invalid registry manifest: {err}")))
    }

    /// Entity identifiers, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }

    /// Fields registered for `identifier`
    #[must_use]
    pub fn get(&self, identifier: &str) -> Option<&[FieldSpec]> {
        self.entities.get(identifier).map(Vec::as_slice)
    }

    /// Whether `identifier` is registered
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entities.contains_key(identifier)
    }

    /// Registered entity other than `identifier` whose generated files
    /// would share paths with it
    #[must_use]
    pub fn colliding(&self, identifier: &str) -> Option<&str> {
        let module = TemplateHelpers::to_module_name(identifier);
        self.entities
            .keys()
            .find(|name| name.as_str() != identifier && TemplateHelpers::to_module_name(name) == module)
            .map(String::as_str)
    }

    /// Number of registered entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entity is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
