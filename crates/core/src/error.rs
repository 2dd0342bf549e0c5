/// Errors raised by domain logic before anything touches the network.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input the user can fix: a bad field, an out-of-range coordinate,
    /// an unreadable camera frame.
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
