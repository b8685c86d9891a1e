use civiq_core::error::CoreError;
use civiq_model::error::ModelError;

/// Error type for all service-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Validation failed: {0}")]
    InvalidInput(#[from] validator::ValidationErrors),
}
