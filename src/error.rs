#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Transient fetch failures (timeouts, aborted connections, DNS or socket
    /// trouble) are retried; anything else, including bad HTTP statuses, is
    /// terminal for the source.
    pub fn is_transient_fetch(&self) -> bool {
        match self {
            AppError::Fetch(msg) => {
                let msg = msg.to_lowercase();
                ["timed out", "timeout", "abort", "network", "connection", "dns"]
                    .iter()
                    .any(|needle| msg.contains(needle))
            }
            _ => false,
        }
    }
}
