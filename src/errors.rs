use thiserror::Error;

/// Errors that can occur while loading or displaying a usage graph.
#[derive(Error, Debug)]
pub enum UsageGraphError {
    #[error("fetch error: {message} (path: {path})")]
    Fetch { message: String, path: String },

    #[error("parse error: {message} (path: {path})")]
    Parse { message: String, path: String },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("invalid colour '{value}': expected #RRGGBB")]
    InvalidColor { value: String },

    #[error("a graph load is already in progress")]
    LoadInProgress,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `UsageGraphError`.
pub type Result<T> = std::result::Result<T, UsageGraphError>;
