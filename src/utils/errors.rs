use thiserror::Error;

/// Failure reported by a price data source
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("{context}: {source}")]
    Query {
        context: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("unable to decode stored price: {0}")]
    Decode(String),

    #[error("no price observations recorded")]
    NoRows,

    /// Free-form failure from a non-database source
    #[error("{0}")]
    Other(String),
}

impl RetrievalError {
    pub fn query(context: &'static str) -> impl FnOnce(sqlx::Error) -> RetrievalError {
        move |source| RetrievalError::Query { context, source }
    }

    pub fn other(message: impl Into<String>) -> RetrievalError {
        RetrievalError::Other(message.into())
    }
}

/// Errors returned by the price increase calculation
#[derive(Error, Debug)]
pub enum PriceIncreaseError {
    /// Passed through from the data source untouched
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Fewer than two observations exist for today
    #[error("not enough data")]
    InsufficientData,
}

/// Missing or malformed configuration value
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Extract clean error message from database error strings
///
/// Removes technical error codes and prefixes like:
/// "unable to query table: error returned from database: relation \"stockprices\" does not exist"
///
/// Returns only the meaningful error message:
/// "relation \"stockprices\" does not exist"
pub fn extract_clean_error(error_msg: &str) -> String {
    const DB_PREFIX: &str = "error returned from database:";

    match error_msg.find(DB_PREFIX) {
        Some(idx) => error_msg[idx + DB_PREFIX.len()..].trim().to_string(),
        None => error_msg.to_string(),
    }
}
