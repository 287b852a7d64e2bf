use thiserror::Error;

/// Failures raised by a [`DocumentStore`](crate::database::DocumentStore).
///
/// These are surfaced verbatim to whoever opened the query or issued the
/// write; nothing in the crate interprets or retries them.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Failed to open database: {0}")]
    Open(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication required: {0}")]
    Auth(String),

    #[error("{0}")]
    Validation(String),

    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Write failed: {0}")]
    Write(#[source] StoreError),

    #[error("Load failed: {0}")]
    Load(#[source] StoreError),

    #[error("Local cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Page-level banner text shown to the user for this failure.
    pub fn banner(&self, subject: &str) -> String {
        match self {
            AppError::Auth(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Subscription(_) | AppError::Load(_) => {
                format!("Failed to load {}.", subject)
            }
            AppError::Write(_) => format!("Failed to save {}.", subject),
            AppError::Cache(_) => "Local settings cache is unavailable.".to_string(),
            AppError::Config(msg) => format!("Misconfigured: {}", msg),
        }
    }
}
