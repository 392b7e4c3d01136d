use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum EtherError {
    #[error("invalid colour {0:?}: expected #RGB, #RRGGBB or #RRGGBBAA")]
    InvalidColor(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, EtherError>;
