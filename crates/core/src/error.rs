#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The caller sent an incomplete or malformed request.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required environment setting, named by the payload, is unset.
    #[error("{0} not configured")]
    MissingConfig(&'static str),
}
