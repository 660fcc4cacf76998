//! Error types for tabkit.

use std::io;

/// Errors produced by the tabkit engine.
#[derive(Debug, thiserror::Error)]
pub enum TabsError {
    /// A required structural element is missing or malformed. Fatal to one
    /// tab set only.
    #[error("construction error: {0}")]
    Construction(String),

    /// An activation targeted an index outside the panel range.
    #[error("activation error: index {index} out of range for {len} panels")]
    Activation { index: usize, len: usize },

    /// A remote collection or fragment could not be fetched.
    #[error("adapter fetch error: {0}")]
    AdapterFetch(String),

    /// Geometry was requested before the nodes it reads exist.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// No live tab set has the requested id.
    #[error("unknown tab set: {0}")]
    UnknownTabSet(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("selector error: {0}")]
    Selector(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TabsError>;
