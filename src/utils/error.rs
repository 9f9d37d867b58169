// utils/error.rs
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Erreurs de transport
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        payload: Option<Value>,
    },

    #[error("Network error: {0}")]
    Network(String),

    // Erreurs de structure des réponses
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid data structure: {0}")]
    InvalidStructure(String),

    // Erreurs de données
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    // Erreurs de configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Construit une erreur HTTP à partir du statut et du corps renvoyé par l'API
    pub fn from_response(status: u16, payload: Option<Value>) -> Self {
        let message = payload
            .as_ref()
            .and_then(|body| {
                body.get("message")
                    .or_else(|| body.get("error"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string)
            .unwrap_or_else(|| {
                reqwest::StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("Request failed")
                    .to_string()
            });

        AppError::Http {
            status,
            message,
            payload,
        }
    }

    /// Code HTTP si l'erreur provient d'une réponse de l'API
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Corps JSON renvoyé par le backend, pour la journalisation
    pub fn payload(&self) -> Option<&Value> {
        match self {
            AppError::Http { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_)) || self.status() == Some(404)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::from_response(status.as_u16(), None),
            None if err.is_decode() => AppError::ParseError(err.to_string()),
            None => AppError::Network(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializeError(err.to_string())
    }
}

impl From<std::env::VarError> for AppError {
    fn from(err: std::env::VarError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_messages: Vec<String> = errors
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect();
        messages.sort();

        AppError::Validation(messages.join("; "))
    }
}

// Type de résultat standard
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_error_uses_backend_message() {
        let err = AppError::from_response(422, Some(json!({ "message": "Titre requis" })));

        assert_eq!(err.to_string(), "Titre requis");
        assert_eq!(err.status(), Some(422));
        assert_eq!(err.payload().unwrap()["message"], "Titre requis");
    }

    #[test]
    fn test_http_error_falls_back_to_reason() {
        let err = AppError::from_response(404, None);

        assert_eq!(err.to_string(), "Not Found");
        assert!(err.is_not_found());
        assert!(err.payload().is_none());
    }
}
