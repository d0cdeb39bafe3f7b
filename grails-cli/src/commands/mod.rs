//! CLI command implementations

pub mod models;
pub mod scaffold;
pub mod serve;

pub use models::ModelsCommand;
pub use scaffold::ScaffoldCommand;
pub use serve::ServeCommand;
