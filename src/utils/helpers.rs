// utils/helpers.rs
use crate::utils::error::{AppError, Result};
use chrono::{DateTime, Duration, Utc};

/// Calculer un pourcentage
pub fn calculate_percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64) * 100.0
}

/// Arrondir à l'entier le plus proche
pub fn round_to_i64(value: f64) -> i64 {
    if value.is_finite() {
        value.round() as i64
    } else {
        0
    }
}

/// Limiter une chaîne de caractères (en caractères, pas en octets)
pub fn truncate_string(s: &str, max_length: usize) -> String {
    if s.chars().count() <= max_length {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn out_of_range(days: i64) -> AppError {
    AppError::Validation(format!("Décalage de {} jours hors limites", days))
}

/// Date située `days` jours dans le futur
pub fn date_in_days(days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .ok_or_else(|| out_of_range(days))
}

/// Date située `days` jours dans le passé
pub fn date_days_ago(days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|delta| Utc::now().checked_sub_signed(delta))
        .ok_or_else(|| out_of_range(days))
}

/// Nombre de caractères visibles d'un texte
pub fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}
