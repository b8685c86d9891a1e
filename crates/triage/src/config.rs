use std::path::PathBuf;

/// Service configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Directory holding the frozen model artifacts (default: `./artifacts`).
    pub model_dir: PathBuf,
    /// Page size used when the caller does not specify one (default: `5`).
    pub default_page_size: i64,
    /// Upper bound on requested page sizes (default: `100`).
    pub max_page_size: i64,
}

impl TriageConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default       |
    /// |--------------------------|---------------|
    /// | `CIVIQ_MODEL_DIR`        | `./artifacts` |
    /// | `CIVIQ_DEFAULT_PAGE_SIZE`| `5`           |
    /// | `CIVIQ_MAX_PAGE_SIZE`    | `100`         |
    pub fn from_env() -> Self {
        let model_dir = std::env::var("CIVIQ_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./artifacts"));

        let default_page_size: i64 = std::env::var("CIVIQ_DEFAULT_PAGE_SIZE")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("CIVIQ_DEFAULT_PAGE_SIZE must be a valid i64");

        let max_page_size: i64 = std::env::var("CIVIQ_MAX_PAGE_SIZE")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("CIVIQ_MAX_PAGE_SIZE must be a valid i64");

        Self {
            model_dir,
            default_page_size,
            max_page_size,
        }
    }

    /// Resolve a requested page size: default when absent, clamped to
    /// `[1, max_page_size]` otherwise.
    pub fn resolve_page_size(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("./artifacts"),
            default_page_size: 5,
            max_page_size: 100,
        }
    }
}
