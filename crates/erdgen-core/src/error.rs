use thiserror::Error;

/// Core error type shared across erdgen crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The input does not deserialize into a valid schema shape at all.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A dependency cycle was found and the caller asked for a hard failure.
    #[error("cyclic schema: tables stuck in a foreign-key cycle: {0:?}")]
    CyclicSchema(Vec<String>),
}

/// Convenience alias for results returned by erdgen crates.
pub type Result<T> = std::result::Result<T, Error>;
