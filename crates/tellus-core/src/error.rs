use thiserror::Error;

#[derive(Debug, Error)]
pub enum TellusError {
    #[error("Math error: {0}")]
    Math(String),

    #[error("Singular matrix (determinant below tolerance)")]
    SingularMatrix,

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, TellusError>;
