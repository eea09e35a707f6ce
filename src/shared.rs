use thiserror::Error;

/// Label substituted when a player or game lookup fails. Statistics are
/// best-effort summaries, so missing references degrade instead of failing.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
