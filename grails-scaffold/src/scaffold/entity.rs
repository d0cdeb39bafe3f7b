//! Entity definitions submitted for scaffolding

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::field_type::FieldSpec;
use super::helpers::TemplateHelpers;
use crate::error::{ScaffoldError, ScaffoldResult};

/// A table and its field schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpec {
    /// Table name; the identity of the scaffold (e.g., "`order_item`")
    pub table_name: String,
    /// Previously scaffolded entity this one references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_table: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl EntitySpec {
    /// Create an entity without a reference
    pub fn new(table_name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            table_name: table_name.into(),
            reference_table: None,
            fields,
        }
    }

    /// Set the referenced table
    ///
    /// An empty or whitespace-only name means "no reference".
    #[must_use]
    pub fn with_reference(mut self, reference_table: impl Into<String>) -> Self {
        let reference_table = reference_table.into();
        self.reference_table = if reference_table.trim().is_empty() {
            None
        } else {
            Some(reference_table.trim().to_string())
        };
        self
    }

    /// Exported identifier of this entity (e.g., "`OrderItem`")
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidIdentifier`] if the table name cannot
    /// be derived into an identifier.
    pub fn identifier(&self) -> ScaffoldResult<String> {
        TemplateHelpers::to_identifier(&self.table_name)
    }

    /// Identifier of the referenced entity, if any
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidIdentifier`] if the reference name
    /// cannot be derived into an identifier.
    pub fn reference_identifier(&self) -> ScaffoldResult<Option<String>> {
        self.reference_table
            .as_deref()
            .map(TemplateHelpers::to_identifier)
            .transpose()
    }

    /// Check every invariant the generator relies on
    ///
    /// - the table name and reference derive to identifiers
    /// - every field name derives to an identifier
    /// - no two fields derive to the same identifier
    /// - no field collides with the reference-derived fields
    /// - the Go locals derived from the table name are not reserved
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::InvalidIdentifier`] or
    /// [`ScaffoldError::DuplicateField`].
    pub fn validate(&self) -> ScaffoldResult<()> {
        let entity = self.identifier()?;

        let plural = TemplateHelpers::pluralize(&entity);
        for local in [TemplateHelpers::to_camel_case(&entity), TemplateHelpers::to_camel_case(&plural)] {
            if TemplateHelpers::is_reserved_local(&local) {
                return Err(ScaffoldError::invalid_identifier(
                    &self.table_name,
                    format!("'{local}' is reserved in generated Go code"),
                ));
            }
        }

        let mut reserved = HashSet::new();
        if let Some(reference) = self.reference_identifier()? {
            reserved.insert(TemplateHelpers::to_foreign_key(&reference));
            reserved.insert(reference);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let identifier = TemplateHelpers::to_identifier(&field.name)?;
            if reserved.contains(&identifier) || !seen.insert(identifier) {
                return Err(ScaffoldError::DuplicateField {
                    entity,
                    field: field.name.clone(),
                });
            }
        }

        Ok(())
    }
}
