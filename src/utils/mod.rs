// utils/mod.rs
pub mod error;
pub mod config;
pub mod telemetry;
pub mod validation;
pub mod helpers;

// Ré-exports pour faciliter l'import
pub use error::{AppError, Result};
pub use config::ClientConfig;
pub use telemetry::setup_tracing;
pub use validation::{
    validate_uuid, validate_url,
    validate_positive_number, validate_percentage,
    validate_non_empty_string, validate_non_empty_list,
};
pub use helpers::{
    calculate_percentage, round_to_i64, truncate_string,
    date_in_days, date_days_ago, char_len,
};
