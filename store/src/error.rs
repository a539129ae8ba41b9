use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("No {entity} with id {id}")]
    RowNotFound { entity: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
