//! Error types and error handling

use std::path::PathBuf;
use thiserror::Error;

/// Convenience result alias for scaffold operations
pub type ScaffoldResult<T> = Result<T, ScaffoldError>;

/// Scaffold error type
///
/// Every variant is fatal to the scaffold operation that produced it.
/// Nothing is retried.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    /// A table, reference or field name cannot be turned into an identifier
    #[error("Invalid identifier '{name}': {reason}")]
    InvalidIdentifier {
        /// The rejected input
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// The same field name appears twice in one entity
    #[error("Duplicate field '{field}' in entity '{entity}'")]
    DuplicateField {
        /// Entity identifier
        entity: String,
        /// Repeated field name
        field: String,
    },

    /// The entity is already registered and replacement was not requested
    #[error("Entity '{0}' is already scaffolded (pass replace to overwrite it)")]
    DuplicateEntity(String),

    /// An existing artifact lacks the structural anchor a merge depends on
    #[error("Malformed artifact {}: {reason}", path.display())]
    MalformedArtifact {
        /// Artifact path relative to the project root
        path: PathBuf,
        /// Which anchor is missing or broken
        reason: String,
    },

    /// Artifact does not exist
    #[error("Artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Read or write failure at the artifact store boundary
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Artifact path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Registry manifest could not be encoded or decoded
    #[error("Registry error: {0}")]
    Registry(#[from] serde_json::Error),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl ScaffoldError {
    /// Build an [`ScaffoldError::InvalidIdentifier`]
    pub fn invalid_identifier(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ScaffoldError::MalformedArtifact`]
    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error was caused by the submitted input rather than by
    /// the project on disk
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidIdentifier { .. } | Self::DuplicateField { .. } | Self::DuplicateEntity(_)
        )
    }

    /// HTTP status code used by the dev server for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier { .. } | Self::DuplicateField { .. } => 400,
            Self::DuplicateEntity(_) => 409,
            Self::NotFound(_) => 404,
            Self::MalformedArtifact { .. }
            | Self::Io { .. }
            | Self::Registry(_)
            | Self::Template(_)
            | Self::Config(_) => 500,
        }
    }
}

impl From<figment::Error> for ScaffoldError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
