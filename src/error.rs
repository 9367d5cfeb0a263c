use thiserror::Error;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("no URL provided")]
    EmptyUrl,

    #[error("extraction engine not found: {0}")]
    EngineNotFound(String),

    #[error("failed to start the extraction engine: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("extraction failed (code={code:?}): {message}")]
    EngineFailed { code: Option<i32>, message: String },

    #[error("the engine finished without reporting metadata")]
    MissingMetadata,

    #[error("invalid metadata from the engine: {0}")]
    Metadata(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DownloadError>;
