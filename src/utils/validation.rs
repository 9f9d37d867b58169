// utils/validation.rs
use crate::utils::error::{AppError, Result};

/// Valider un UUID
pub fn validate_uuid(uuid_str: &str) -> Result<uuid::Uuid> {
    uuid::Uuid::parse_str(uuid_str)
        .map_err(|_| AppError::Validation("Invalid UUID format".to_string()))
}

/// Valider une URL
pub fn validate_url(url: &str) -> Result<()> {
    if !validator::validate_url(url) {
        return Err(AppError::Validation("Invalid URL format".to_string()));
    }
    Ok(())
}

/// Valider un nombre strictement positif
pub fn validate_positive_number(value: f64, field_name: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::Validation(
            format!("{} doit être un nombre positif", field_name)
        ));
    }
    Ok(())
}

/// Valider un pourcentage (0-100)
pub fn validate_percentage(value: f64, field_name: &str) -> Result<()> {
    if !(0.0..=100.0).contains(&value) {
        return Err(AppError::Validation(
            format!("{} doit être compris entre 0 et 100", field_name)
        ));
    }
    Ok(())
}

/// Valider une chaîne non vide
pub fn validate_non_empty_string(value: &str, field_name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(
            format!("{} est obligatoire", field_name)
        ));
    }
    Ok(())
}

/// Valider une liste non vide
pub fn validate_non_empty_list<T>(list: &[T], field_name: &str) -> Result<()> {
    if list.is_empty() {
        return Err(AppError::Validation(
            format!("{} ne peut pas être vide", field_name)
        ));
    }
    Ok(())
}

/// Extraire le message d'une erreur de validation
pub fn validation_message(err: AppError) -> String {
    match err {
        AppError::Validation(message) => message,
        other => other.to_string(),
    }
}
