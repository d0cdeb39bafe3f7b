//! CRUD scaffold command
//!
//! Generates the model, handlers and views of one entity and merges it into
//! the project's migrations, routes, model index and entity registry.
//!
//! # Example
//!
//! ```bash
//! grails scaffold order_item \
//!   quantity:INT \
//!   price:DECIMAL \
//!   --ref order
//! ```

use anyhow::{Context, Result};
use console::style;
use grails_scaffold::config::ScaffoldConfig;
use grails_scaffold::scaffold::{EntitySpec, FieldSpec};
use grails_scaffold::scaffolder::{FileAction, ScaffoldOptions, Scaffolder};
use grails_scaffold::store::FsStore;
use std::path::Path;

pub struct ScaffoldCommand {
    table: String,
    fields: Vec<String>,
    reference: Option<String>,
    options: ScaffoldOptions,
}

impl ScaffoldCommand {
    pub const fn new(
        table: String,
        fields: Vec<String>,
        reference: Option<String>,
        replace: bool,
        dry_run: bool,
    ) -> Self {
        Self {
            table,
            fields,
            reference,
            options: ScaffoldOptions { replace, dry_run },
        }
    }

    fn entity(&self) -> Result<EntitySpec> {
        let fields = self
            .fields
            .iter()
            .map(|field| FieldSpec::parse(field))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid field definition")?;

        let entity = EntitySpec::new(self.table.clone(), fields);
        Ok(match &self.reference {
            Some(reference) => entity.with_reference(reference.clone()),
            None => entity,
        })
    }

    pub fn execute(&self, project_root: &Path) -> Result<()> {
        println!(
            "\n{} {} {}",
            style("Scaffolding CRUD for").cyan().bold(),
            style(&self.table).green().bold(),
            style("...").cyan().bold()
        );

        let config = ScaffoldConfig::load_from_dir(project_root)
            .context("Failed to load grails.toml")?;
        let entity = self.entity()?;
        let store = FsStore::new(project_root);

        let report = Scaffolder::new(&config, &store)
            .scaffold(&entity, self.options)
            .with_context(|| format!("Failed to scaffold {}", self.table))?;

        let heading = if report.dry_run { "Would write" } else { "Wrote" };
        println!(
            "\n{} {} files:",
            style(heading).green().bold(),
            report.written()
        );

        for change in &report.changes {
            let action = match change.action {
                FileAction::Created => style(change.action.to_string()).green(),
                FileAction::Updated => style(change.action.to_string()).cyan(),
                FileAction::Overwritten => style(change.action.to_string()).yellow(),
                FileAction::Unchanged => style(change.action.to_string()).dim(),
            };
            println!(
                "  {:>11} {} ({})",
                action,
                style(change.path.display()).dim(),
                style(&change.description).dim()
            );
        }

        if report.dry_run {
            return Ok(());
        }

        println!(
            "\n{} CRUD scaffold for {} is ready!",
            style("✨").green().bold(),
            style(&report.identifier).green().bold()
        );

        println!("\n{}", style("Next steps:").cyan().bold());
        println!(
            "  1. Run the migration for {}: {}",
            style(&report.table_name).green(),
            style("go run . migrate").yellow()
        );
        println!("  2. Start your app: {}", style("go run .").yellow());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_from_arguments() {
        let cmd = ScaffoldCommand::new(
            "order_item".to_string(),
            vec!["quantity:INT".to_string(), "price:DECIMAL(10,2)".to_string()],
            Some("order".to_string()),
            false,
            false,
        );

        let entity = cmd.entity().unwrap();
        assert_eq!(entity.table_name, "order_item");
        assert_eq!(entity.reference_table.as_deref(), Some("order"));
        assert_eq!(entity.fields[1], FieldSpec::new("price", "DECIMAL(10,2)"));
    }

    #[test]
    fn test_entity_rejects_bad_field() {
        let cmd = ScaffoldCommand::new(
            "post".to_string(),
            vec!["title".to_string()],
            None,
            false,
            false,
        );
        assert!(cmd.entity().is_err());
    }
}
