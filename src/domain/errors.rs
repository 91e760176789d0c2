use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Imagen inválida: {0}")]
    InvalidImage(String),
    #[error("Error de inferencia: {0}")]
    Inference(String),
    #[error("Error de codificación: {0}")]
    Encoding(String),
    #[error("Error de operación: {0}")]
    OperationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
