use thiserror::Error;

/// Errors from persisting synthesized datasets. Synthesis itself is
/// best-effort and does not fail; only the I/O boundary can.
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
