//! CRUD scaffold generator
//!
//! Turns an [`EntitySpec`] into everything one scaffold request writes:
//!
//! - Model file (`models/{entity}.go`), overwritten
//! - Handler file (`handlers/{entity}_handlers.go`), overwritten
//! - View files (`views/{entities}/*.html`), overwritten
//! - Migration registration, merged into the migrations file
//! - Route group, merged into the routes file
//! - Model index entry, merged into the model index
//! - Registry entry, merged into the entity registry manifest
//!
//! Generation is pure: nothing is read or written here.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use super::entity::EntitySpec;
use super::helpers::TemplateHelpers;
use super::templates::{ScaffoldTemplate, TemplateRegistry};
use crate::config::ScaffoldConfig;
use crate::error::ScaffoldResult;
use crate::merge::{Fragment, InsertionPolicy};

/// Terminator closing the function body of the migrations and routes files
pub const FUNCTION_TERMINATOR: &str = "}\n";

/// Represents a generated file that replaces whatever is on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

/// Represents a fragment destined for a shared artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMerge {
    /// Relative path of the artifact
    pub path: PathBuf,
    /// Fragment to merge into it
    pub fragment: Fragment,
    /// Artifact description for user feedback
    pub description: String,
}

/// Everything generated for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScaffold {
    /// Exported identifier of the entity (e.g., "`OrderItem`")
    pub identifier: String,
    /// Model file
    pub model: GeneratedFile,
    /// Handler file
    pub handler: GeneratedFile,
    /// View files
    pub views: Vec<GeneratedFile>,
    /// Migration registration line
    pub migration: ArtifactMerge,
    /// Route group block
    pub route_block: ArtifactMerge,
    /// Model index entry
    pub model_index_entry: ArtifactMerge,
    /// Registry entry (submitted fields only)
    pub registry_entry: ArtifactMerge,
}

impl GeneratedScaffold {
    /// Files that are written whole
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        [&self.model, &self.handler].into_iter().chain(&self.views)
    }

    /// Fragments merged into shared artifacts
    #[must_use]
    pub fn merges(&self) -> [&ArtifactMerge; 4] {
        [
            &self.migration,
            &self.route_block,
            &self.model_index_entry,
            &self.registry_entry,
        ]
    }
}

/// CRUD scaffold generator
pub struct ScaffoldGenerator<'a> {
    /// Project configuration (module path and artifact locations)
    config: &'a ScaffoldConfig,
    /// Template registry
    templates: TemplateRegistry,
}

impl<'a> ScaffoldGenerator<'a> {
    /// Create a new scaffold generator
    #[must_use]
    pub fn new(config: &'a ScaffoldConfig) -> Self {
        Self {
            config,
            templates: TemplateRegistry::new(),
        }
    }

    /// Generate every file and fragment for `entity`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entity fails validation (invalid identifiers, duplicate fields)
    /// - Template rendering fails
    pub fn generate(&self, entity: &EntitySpec) -> ScaffoldResult<GeneratedScaffold> {
        entity.validate()?;

        let metadata = self.model_metadata(entity)?;
        let identifier = entity.identifier()?;

        Ok(GeneratedScaffold {
            model: self.generate_model(&identifier, &metadata)?,
            handler: self.generate_handler(&identifier, &metadata)?,
            views: self.generate_views(&identifier, &metadata)?,
            migration: self.generate_migration(&identifier, &metadata)?,
            route_block: self.generate_route_block(&identifier, &metadata)?,
            model_index_entry: self.generate_model_index_entry(&identifier),
            registry_entry: self.generate_registry_entry(entity, &identifier)?,
            identifier,
        })
    }

    /// Get model metadata for templates
    ///
    /// This generates all the template variables needed for code generation
    fn model_metadata(&self, entity: &EntitySpec) -> ScaffoldResult<Value> {
        let model_name = entity.identifier()?;
        let model_plural = TemplateHelpers::pluralize(&model_name);
        let var_name = TemplateHelpers::to_camel_case(&model_name);
        let module_name = TemplateHelpers::to_module_name(&model_name);
        let view_dir = TemplateHelpers::to_view_dir(&model_name);

        let mut struct_lines = vec!["\tgorm.Model".to_string()];
        let mut fields = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            let go_name = TemplateHelpers::to_identifier(&field.name)?;
            let target = field.target_type();
            struct_lines.push(format!("\t{go_name} {}", target.go_type()));
            fields.push(json!({
                "name": field.name,
                "label": field.name,
                "go_name": go_name,
                "go_type": target.go_type(),
                "input_type": target.html_input_type(),
                "row_ref": format!("{{{{.{go_name}}}}}"),
                "record_ref": format!("{{{{.{var_name}.{go_name}}}}}"),
            }));
        }

        let has_time = entity
            .fields
            .iter()
            .any(|field| field.target_type().needs_time_import());

        if let Some(name) = entity.reference_identifier()? {
            let foreign_key = TemplateHelpers::to_foreign_key(&name);
            struct_lines.push(format!("\t{foreign_key} int"));
            struct_lines.push(format!(
                "\t{name} {name} `gorm:\"foreignKey:{foreign_key};references:ID\"`"
            ));
        }

        Ok(json!({
            "project_name": self.config.project_name,
            "model_name": model_name,
            "model_plural": model_plural,
            "var_name": var_name,
            "var_plural": TemplateHelpers::to_camel_case(&model_plural),
            "view_dir": view_dir,
            "route_path": TemplateHelpers::to_route_path(&model_name),
            "title": TemplateHelpers::to_title(&module_name),
            "plural_title": TemplateHelpers::to_title(&view_dir),
            "fields": fields,
            "has_time": has_time,
            "struct_body": struct_lines.join("\n"),
            "go": {
                "range_records": "{{range .Records}}",
                "end": "{{end}}",
                "row_id": "{{.ID}}",
                "row_created_at": "{{.CreatedAt}}",
                "record_id": format!("{{{{.{var_name}.ID}}}}"),
            },
        }))
    }

    /// Generate GORM model file
    fn generate_model(
        &self,
        identifier: &str,
        metadata: &Value,
    ) -> ScaffoldResult<GeneratedFile> {
        let content = self.templates.render(ScaffoldTemplate::Model, metadata)?;
        let module_name = TemplateHelpers::to_module_name(identifier);

        Ok(GeneratedFile {
            path: self.config.model_path(&module_name),
            content,
            description: format!("GORM model for {identifier}"),
        })
    }

    /// Generate handler file with all CRUD operations
    fn generate_handler(
        &self,
        identifier: &str,
        metadata: &Value,
    ) -> ScaffoldResult<GeneratedFile> {
        let content = self.templates.render(ScaffoldTemplate::Handler, metadata)?;
        let module_name = TemplateHelpers::to_module_name(identifier);

        Ok(GeneratedFile {
            path: self.config.handler_path(&module_name),
            content,
            description: format!("Fiber handlers for {identifier}"),
        })
    }

    /// Generate all HTML views
    fn generate_views(
        &self,
        identifier: &str,
        metadata: &Value,
    ) -> ScaffoldResult<Vec<GeneratedFile>> {
        let view_dir = self
            .config
            .view_dir(&TemplateHelpers::to_view_dir(identifier));

        ScaffoldTemplate::VIEWS
            .iter()
            .map(|(template, file_name)| {
                Ok(GeneratedFile {
                    path: view_dir.join(file_name),
                    content: self.templates.render(*template, metadata)?,
                    description: format!("{file_name} view for {identifier}"),
                })
            })
            .collect()
    }

    /// Generate the migration registration line
    fn generate_migration(&self, identifier: &str, metadata: &Value) -> ScaffoldResult<ArtifactMerge> {
        let path = &self.config.paths.migrations;
        let preamble = self.templates.render(
            ScaffoldTemplate::MigrationsPreamble,
            &with_package(metadata, path),
        )?;

        Ok(ArtifactMerge {
            path: path.clone(),
            fragment: Fragment::new(
                format!("\tdb.AutoMigrate(&models.{identifier}{{}})\n"),
                InsertionPolicy::AppendBeforeTerminator {
                    preamble,
                    terminator: FUNCTION_TERMINATOR.to_string(),
                },
            ),
            description: format!("Migration registration for {identifier}"),
        })
    }

    /// Generate the route group block
    fn generate_route_block(&self, identifier: &str, metadata: &Value) -> ScaffoldResult<ArtifactMerge> {
        let path = &self.config.paths.routes;
        let preamble = self
            .templates
            .render(ScaffoldTemplate::RoutesPreamble, &with_package(metadata, path))?;
        let block = self.templates.render(ScaffoldTemplate::RouteBlock, metadata)?;

        Ok(ArtifactMerge {
            path: path.clone(),
            fragment: Fragment::new(
                block,
                InsertionPolicy::AppendBeforeTerminator {
                    preamble,
                    terminator: FUNCTION_TERMINATOR.to_string(),
                },
            ),
            description: format!("Routes for {identifier}"),
        })
    }

    /// Generate the model index entry
    fn generate_model_index_entry(&self, identifier: &str) -> ArtifactMerge {
        let path = &self.config.paths.model_index;
        let project_name = &self.config.project_name;

        ArtifactMerge {
            path: path.clone(),
            fragment: Fragment::new(
                format!("\t&models.{identifier}{{}},\n"),
                InsertionPolicy::AppendWithDeclarationHeader {
                    anchor: format!("package {}", go_package(path)),
                    declaration: format!("import \"{project_name}/models\""),
                    block_open: "var Models = []interface{}{".to_string(),
                    block_close: "}".to_string(),
                },
            ),
            description: format!("Model index entry for {identifier}"),
        }
    }

    /// Generate the registry entry
    ///
    /// Only the submitted fields are recorded; reference-derived fields are not.
    fn generate_registry_entry(
        &self,
        entity: &EntitySpec,
        identifier: &str,
    ) -> ScaffoldResult<ArtifactMerge> {
        Ok(ArtifactMerge {
            path: self.config.paths.registry.clone(),
            fragment: Fragment::new(
                serde_json::to_string(&entity.fields)?,
                InsertionPolicy::AppendToKeyedContainer {
                    key: identifier.to_string(),
                },
            ),
            description: format!("Registry entry for {identifier}"),
        })
    }
}

/// Go package name for a file: its directory name, or `main` at the root
fn go_package(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .map_or_else(|| "main".to_string(), str::to_string)
}

fn with_package(metadata: &Value, path: &Path) -> Value {
    let mut metadata = metadata.clone();
    metadata["package"] = Value::String(go_package(path));
    metadata
}
