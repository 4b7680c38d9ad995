use thiserror::Error;

/// Domain errors for the catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unsupported video host: {0}")]
    UnsupportedVideoHost(String),

    #[error("Could not find a video id in: {0}")]
    MalformedVideoUrl(String),
}
