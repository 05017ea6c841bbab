use thiserror::Error;

/// Request-level failure taxonomy. Each variant maps to a stable
/// machine-readable category on the HTTP surface; everything recoverable
/// (optional collections, generation faults in degraded mode, unparseable
/// record values) never reaches this type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("table store request for '{table}' failed: {detail}")]
    TableStore { table: String, detail: String },

    #[error("generation backend is rate limited, try again shortly")]
    RateLimited,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn table_store(table: impl Into<String>, detail: impl ToString) -> Self {
        Error::TableStore {
            table: table.into(),
            detail: detail.to_string(),
        }
    }

    /// Stable category string reported alongside the human-readable message.
    pub fn category(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::TableStore { .. } => "upstream_dependency",
            Error::RateLimited => "rate_limit",
            Error::Internal(_) => "internal",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
