use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Failed to acquire a database connection: {0}")]
    Acquire(#[source] sqlx::Error),

    #[error("Query execution failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Expected a single aggregate row but the query returned none.")]
    EmptyAggregate,
}
