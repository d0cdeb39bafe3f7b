//! Configuration management for grails-scaffold
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. `PROJECT_NAME` environment variable (highest priority, project module path only)
//! 2. Environment variables with the `GRAILS_` prefix (`__` separates nested keys)
//! 3. `./grails.toml` in the project root
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! # grails.toml
//! project_name = "github.com/acme/shop"
//!
//! [paths]
//! registry = "models.json"
//! migrations = "helpers/migrations.go"
//! routes = "internals/routes.go"
//! model_index = "internals/models.go"
//! models_dir = "models"
//! handlers_dir = "handlers"
//! views_dir = "views"
//!
//! [server]
//! addr = "127.0.0.1:3000"
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use grails_scaffold::config::ScaffoldConfig;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ScaffoldConfig::load_from_dir(".")?;
//! println!("{}", config.paths.routes.display());
//! # Ok(())
//! # }
//! ```

use crate::error::ScaffoldResult;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project-level configuration file
pub const CONFIG_FILE: &str = "grails.toml";

/// Artifact locations, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    /// Entity registry manifest (JSON)
    pub registry: PathBuf,

    /// Migration registration file
    pub migrations: PathBuf,

    /// Route registration file
    pub routes: PathBuf,

    /// Model index listing every scaffolded model
    pub model_index: PathBuf,

    /// Directory holding one model file per entity
    pub models_dir: PathBuf,

    /// Directory holding one handler file per entity
    pub handlers_dir: PathBuf,

    /// Directory holding one view directory per entity
    pub views_dir: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("models.json"),
            migrations: PathBuf::from("helpers/migrations.go"),
            routes: PathBuf::from("internals/routes.go"),
            model_index: PathBuf::from("internals/models.go"),
            models_dir: PathBuf::from("models"),
            handlers_dir: PathBuf::from("handlers"),
            views_dir: PathBuf::from("views"),
        }
    }
}

/// Dev server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Socket address the dev server binds to
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Complete scaffold configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Go module path of the target project, interpolated verbatim into
    /// generated imports
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Artifact locations
    #[serde(default)]
    pub paths: ArtifactPaths,

    /// Dev server settings
    #[serde(default)]
    pub server: ServerSettings,
}

fn default_project_name() -> String {
    "app".to_string()
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            paths: ArtifactPaths::default(),
            server: ServerSettings::default(),
        }
    }
}

impl ScaffoldConfig {
    /// Build the layered figment for a project directory
    ///
    /// Exposed so callers can add their own providers on top.
    #[must_use]
    pub fn figment(project_root: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(project_root.as_ref().join(CONFIG_FILE)))
            .merge(Env::prefixed("GRAILS_").split("__"))
            .merge(Env::raw().only(&["PROJECT_NAME"]))
    }

    /// Load configuration for the project rooted at `project_root`
    ///
    /// A missing `grails.toml` is not an error; defaults apply.
    pub fn load_from_dir(project_root: impl AsRef<Path>) -> ScaffoldResult<Self> {
        Ok(Self::figment(project_root).extract()?)
    }

    /// Model file path for an entity
    #[must_use]
    pub fn model_path(&self, module_name: &str) -> PathBuf {
        self.paths.models_dir.join(format!("{module_name}.go"))
    }

    /// Handler file path for an entity
    #[must_use]
    pub fn handler_path(&self, module_name: &str) -> PathBuf {
        self.paths
            .handlers_dir
            .join(format!("{module_name}_handlers.go"))
    }

    /// View directory for an entity
    #[must_use]
    pub fn view_dir(&self, plural: &str) -> PathBuf {
        self.paths.views_dir.join(plural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.project_name, "app");
        assert_eq!(config.paths.registry, PathBuf::from("models.json"));
        assert_eq!(config.paths.routes, PathBuf::from("internals/routes.go"));
        assert_eq!(config.server.addr, "127.0.0.1:3000");
    }

    #[test]
    fn test_entity_paths() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.model_path("order_item"), PathBuf::from("models/order_item.go"));
        assert_eq!(
            config.handler_path("order_item"),
            PathBuf::from("handlers/order_item_handlers.go")
        );
        assert_eq!(config.view_dir("order_items"), PathBuf::from("views/order_items"));
    }

    #[test]
    fn test_layered_loading() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                project_name = "github.com/acme/shop"

                [paths]
                routes = "app/routes.go"
                "#,
            )?;
            jail.set_env("GRAILS_SERVER__ADDR", "0.0.0.0:8080");

            let config: ScaffoldConfig = ScaffoldConfig::figment(jail.directory()).extract()?;
            assert_eq!(config.project_name, "github.com/acme/shop");
            assert_eq!(config.paths.routes, PathBuf::from("app/routes.go"));
            assert_eq!(config.paths.migrations, PathBuf::from("helpers/migrations.go"));
            assert_eq!(config.server.addr, "0.0.0.0:8080");
            Ok(())
        });
    }

    #[test]
    fn test_project_name_env_wins() {
        Jail::expect_with(|jail| {
            jail.create_file(CONFIG_FILE, r#"project_name = "from-file""#)?;
            jail.set_env("PROJECT_NAME", "github.com/acme/env");

            let config: ScaffoldConfig = ScaffoldConfig::figment(jail.directory()).extract()?;
            assert_eq!(config.project_name, "github.com/acme/env");
            Ok(())
        });
    }
}
