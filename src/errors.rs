use sea_orm::error::DbErr;

/// Process-level failures: configuration and database connectivity.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Failures surfaced by the query engine and the order services.
///
/// Validation errors are raised before any storage access and are never
/// partially applied; database errors propagate the underlying storage
/// failure unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ServiceError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::ValidationError(_) | ServiceError::InvalidInput(_)
        )
    }
}
