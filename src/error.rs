//! Application error types

use std::fmt;

/// Errors raised by the remote-content and export paths. Each variant
/// carries the underlying cause, which is only ever logged; `Display`
/// renders the message shown to the user.
#[derive(Debug)]
pub enum AppError {
    /// Fetching the AI-generated recipe content failed (network, service
    /// error, or a reply that does not match the requested schema)
    ContentFetch(String),
    /// Answering a chat question failed
    ChatFetch(String),
    /// Assembling or saving a PDF guide failed
    Export(String),
}

impl AppError {
    /// Underlying cause, for the log
    pub fn cause(&self) -> &str {
        match self {
            AppError::ContentFetch(cause)
            | AppError::ChatFetch(cause)
            | AppError::Export(cause) => cause,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ContentFetch(_) => write!(
                f,
                "No se pudieron cargar los detalles de la conserva. Por favor, inténtelo de nuevo más tarde."
            ),
            AppError::ChatFetch(_) => write!(f, "No se pudo obtener una respuesta del asistente."),
            AppError::Export(_) => write!(
                f,
                "Hubo un error al generar el PDF. Por favor, intenta de nuevo."
            ),
        }
    }
}

impl std::error::Error for AppError {}

/// Result alias used across the application
pub type Result<T> = std::result::Result<T, AppError>;
