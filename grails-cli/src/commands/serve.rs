//! Development scaffolding server command

use anyhow::{Context, Result};
use console::style;
use grails_scaffold::config::ScaffoldConfig;
use grails_scaffold::handlers::{serve, DevState};
use grails_scaffold::store::FsStore;
use std::path::Path;
use std::sync::Arc;

pub struct ServeCommand {
    addr: Option<String>,
}

impl ServeCommand {
    pub const fn new(addr: Option<String>) -> Self {
        Self { addr }
    }

    pub fn execute(self, project_root: &Path) -> Result<()> {
        let config = ScaffoldConfig::load_from_dir(project_root)
            .context("Failed to load grails.toml")?;
        let addr = self.addr.unwrap_or_else(|| config.server.addr.clone());

        println!(
            "{} {} {}",
            style("Starting").green().bold(),
            style("dev server on").bold(),
            style(format!("http://{addr}")).cyan()
        );

        let state = DevState::new(config, Arc::new(FsStore::new(project_root)));
        let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
        runtime.block_on(serve(state, &addr))
    }
}
