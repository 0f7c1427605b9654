use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Insufficient stock for product {0}")]
    InsufficientStock(String),

    #[error("{step} failed: {source}")]
    Transaction {
        step: &'static str,
        #[source]
        source: Box<RepositoryError>,
    },

    #[error("Custom: {0}")]
    Custom(String),
}

impl RepositoryError {
    /// Tags the error with the transaction step it came from.
    pub fn in_step(self, step: &'static str) -> Self {
        RepositoryError::Transaction {
            step,
            source: Box::new(self),
        }
    }

    /// The innermost error, with every step wrapper peeled off.
    pub fn root(&self) -> &RepositoryError {
        match self {
            RepositoryError::Transaction { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn step(&self) -> Option<&'static str> {
        match self {
            RepositoryError::Transaction { step, .. } => Some(step),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), RepositoryError::NotFound)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self.root(), RepositoryError::AlreadyExists(_))
    }
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        if let SqlxError::RowNotFound = err {
            return RepositoryError::NotFound;
        }

        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return RepositoryError::AlreadyExists(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return RepositoryError::ForeignKey(db_err.message().to_string());
            }
        }

        RepositoryError::Sqlx(err)
    }
}
