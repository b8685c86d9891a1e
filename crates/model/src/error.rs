#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A frozen artifact is missing or corrupt. Raised at load time only;
    /// the process must not start serving inference without all artifacts.
    #[error("Failed to load model artifact {path}: {reason}")]
    Startup { path: String, reason: String },

    /// A shape or value problem at predict time.
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl ModelError {
    pub fn startup(path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Startup {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
