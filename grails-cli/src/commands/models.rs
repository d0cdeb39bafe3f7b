//! List scaffolded entities

use anyhow::{Context, Result};
use console::style;
use grails_scaffold::config::ScaffoldConfig;
use grails_scaffold::registry::EntityRegistry;
use grails_scaffold::store::FsStore;
use std::path::Path;

pub struct ModelsCommand;

impl ModelsCommand {
    pub fn execute(project_root: &Path) -> Result<()> {
        let config = ScaffoldConfig::load_from_dir(project_root)
            .context("Failed to load grails.toml")?;
        let store = FsStore::new(project_root);
        let registry = EntityRegistry::load(&store, &config.paths.registry)
            .with_context(|| format!("Failed to read {}", config.paths.registry.display()))?;

        if registry.is_empty() {
            println!("{}", style("No entities scaffolded yet.").dim());
            return Ok(());
        }

        for name in registry.names() {
            let fields = registry.get(&name).map_or(0, <[_]>::len);
            println!(
                "{} {}",
                style(&name).green().bold(),
                style(format!("({fields} fields)")).dim()
            );
        }

        Ok(())
    }
}
