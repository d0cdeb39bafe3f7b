//! Scaffold pipeline
//!
//! Ties generation, merging and storage together for one entity:
//!
//! 1. Validate the entity
//! 2. Reject already registered entities unless replacement was requested
//! 3. Generate every file and fragment
//! 4. Compute every new artifact text in memory
//! 5. Write whatever changed
//!
//! A malformed artifact aborts in step 4, before anything is written.
//! Writes in step 5 are not transactional across files: an I/O failure
//! leaves earlier writes in place.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ScaffoldConfig;
use crate::error::{ScaffoldError, ScaffoldResult};
use crate::merge::{merge, MergeOutcome};
use crate::registry::EntityRegistry;
use crate::scaffold::{EntitySpec, GeneratedScaffold, ScaffoldGenerator};
use crate::store::ArtifactStore;

/// Options for one scaffold run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaffoldOptions {
    /// Regenerate an entity that is already registered
    pub replace: bool,
    /// Compute the report without writing anything
    pub dry_run: bool,
}

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    /// Did not exist before
    Created,
    /// Shared artifact that gained or replaced content
    Updated,
    /// Already up to date
    Unchanged,
    /// Per-entity file replaced wholesale
    Overwritten,
}

impl FileAction {
    /// Whether the artifact is written
    #[must_use]
    pub const fn is_write(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl From<MergeOutcome> for FileAction {
    fn from(outcome: MergeOutcome) -> Self {
        match outcome {
            MergeOutcome::Created => Self::Created,
            MergeOutcome::Updated => Self::Updated,
            MergeOutcome::Unchanged => Self::Unchanged,
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Overwritten => "overwritten",
        };
        f.write_str(label)
    }
}

/// One artifact touched by a scaffold run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactChange {
    /// Path relative to the project root
    pub path: PathBuf,
    /// What happened to it
    pub action: FileAction,
    /// Human readable description
    pub description: String,
}

/// Outcome of a scaffold run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldReport {
    /// Table name as submitted
    pub table_name: String,
    /// Exported identifier of the entity
    pub identifier: String,
    /// Every artifact in generation order
    pub changes: Vec<ArtifactChange>,
    /// Whether writes were skipped
    pub dry_run: bool,
}

impl ScaffoldReport {
    /// Action recorded for `path`, if it was part of the run
    #[must_use]
    pub fn action(&self, path: &Path) -> Option<FileAction> {
        self.changes
            .iter()
            .find(|change| change.path == path)
            .map(|change| change.action)
    }

    /// Number of artifacts written (or that would be written on a dry run)
    #[must_use]
    pub fn written(&self) -> usize {
        self.changes
            .iter()
            .filter(|change| change.action.is_write())
            .count()
    }
}

struct PlannedWrite {
    change: ArtifactChange,
    text: String,
}

/// Runs the scaffold pipeline against an [`ArtifactStore`]
pub struct Scaffolder<'a> {
    config: &'a ScaffoldConfig,
    store: &'a dyn ArtifactStore,
}

impl<'a> Scaffolder<'a> {
    /// Create a scaffolder writing through `store`
    #[must_use]
    pub fn new(config: &'a ScaffoldConfig, store: &'a dyn ArtifactStore) -> Self {
        Self { config, store }
    }

    /// Load the entity registry this scaffolder maintains
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or parsed.
    pub fn registry(&self) -> ScaffoldResult<EntityRegistry> {
        EntityRegistry::load(self.store, &self.config.paths.registry)
    }

    /// Scaffold `entity`
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::InvalidIdentifier`] / [`ScaffoldError::DuplicateField`]
    ///   for an invalid entity, or one whose files clash with another
    ///   registered entity
    /// - [`ScaffoldError::DuplicateEntity`] if it is registered and
    ///   `options.replace` is false
    /// - [`ScaffoldError::MalformedArtifact`] if an existing artifact cannot
    ///   be merged into; nothing is written in that case
    /// - [`ScaffoldError::Io`] if the store fails
    #[tracing::instrument(skip(self, entity), fields(table = %entity.table_name))]
    pub fn scaffold(&self, entity: &EntitySpec, options: ScaffoldOptions) -> ScaffoldResult<ScaffoldReport> {
        entity.validate()?;
        let identifier = entity.identifier()?;

        let registry = self.registry()?;
        if registry.contains(&identifier) && !options.replace {
            return Err(ScaffoldError::DuplicateEntity(identifier));
        }
        if let Some(other) = registry.colliding(&identifier) {
            return Err(ScaffoldError::invalid_identifier(
                &entity.table_name,
                format!("generated files would overwrite those of entity '{other}'"),
            ));
        }

        if let Some(reference) = entity.reference_identifier()? {
            if !registry.contains(&reference) {
                tracing::warn!(
                    entity = %identifier,
                    reference = %reference,
                    "referenced entity is not scaffolded yet"
                );
            }
        }

        let generated = ScaffoldGenerator::new(self.config).generate(entity)?;
        let plan = self.plan(&generated)?;

        if options.dry_run {
            tracing::info!(entity = %identifier, "dry run, nothing written");
        } else {
            for write in plan.iter().filter(|write| write.change.action.is_write()) {
                self.store.write(&write.change.path, &write.text)?;
            }
        }

        let report = ScaffoldReport {
            table_name: entity.table_name.clone(),
            identifier,
            changes: plan.into_iter().map(|write| write.change).collect(),
            dry_run: options.dry_run,
        };

        tracing::info!(
            entity = %report.identifier,
            written = report.written(),
            "scaffold complete"
        );

        Ok(report)
    }

    /// Compute every artifact's new text without writing
    fn plan(&self, generated: &GeneratedScaffold) -> ScaffoldResult<Vec<PlannedWrite>> {
        let mut plan: Vec<PlannedWrite> = Vec::new();

        for file in generated.files() {
            let action = match self.current_text(&plan, &file.path)? {
                None => FileAction::Created,
                Some(existing) if existing == file.content => FileAction::Unchanged,
                Some(_) => FileAction::Overwritten,
            };
            plan.push(PlannedWrite {
                change: ArtifactChange {
                    path: file.path.clone(),
                    action,
                    description: file.description.clone(),
                },
                text: file.content.clone(),
            });
        }

        for artifact in generated.merges() {
            let existing = self.current_text(&plan, &artifact.path)?;
            let merged = merge(&artifact.path, existing.as_deref(), &artifact.fragment)?;
            plan.push(PlannedWrite {
                change: ArtifactChange {
                    path: artifact.path.clone(),
                    action: merged.outcome.into(),
                    description: artifact.description.clone(),
                },
                text: merged.text,
            });
        }

        Ok(plan)
    }

    /// Text of `path` as the plan so far would leave it
    fn current_text(&self, plan: &[PlannedWrite], path: &Path) -> ScaffoldResult<Option<String>> {
        if let Some(write) = plan.iter().rev().find(|write| write.change.path == path) {
            return Ok(Some(write.text.clone()));
        }
        self.store.read_optional(path)
    }
}
