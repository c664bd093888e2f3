use thiserror::Error;

#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("Configuration error for product '{product}': {message}")]
    Configuration { product: String, message: String },

    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Malformed version '{version}': {source}")]
    MalformedVersion {
        version: String,
        #[source]
        source: semver::Error,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
