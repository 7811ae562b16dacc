use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors surfaced by the repository layer
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A single-result query matched more than one row. This is a fatal
    /// condition; the repository never silently picks one of the rows.
    #[error("query matched more than one row")]
    NonUniqueResult,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
