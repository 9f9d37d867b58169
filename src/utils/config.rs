// utils/config.rs
use crate::utils::error::{AppError, Result};
use crate::utils::validation::validate_url;
use dotenv::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    // Environnement
    pub run_mode: String,
    pub log_level: String,
    pub logging_format: String,

    // API
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout_seconds: u64,
    pub default_page_size: u32,
    pub user_agent: String,
}

impl ClientConfig {
    /// Configuration minimale pointant vers `api_base_url`
    pub fn new(api_base_url: &str) -> Self {
        Self {
            run_mode: "development".to_string(),
            log_level: "info".to_string(),
            logging_format: "compact".to_string(),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_token: None,
            request_timeout_seconds: 30,
            default_page_size: 20,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }

    /// Charger la configuration depuis les variables d'environnement
    pub fn from_env() -> Result<Self> {
        // Charger le fichier .env si présent
        let _ = dotenv().ok();

        let api_base_url = env::var("API_BASE_URL").map_err(|_| {
            AppError::Config("Variable d'environnement requise manquante: API_BASE_URL".to_string())
        })?;
        validate_url(&api_base_url)?;

        let config = ClientConfig {
            run_mode: env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            logging_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),

            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_token: env::var("API_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            request_timeout_seconds: env::var("API_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| AppError::Validation("API_TIMEOUT_SECONDS must be a number".to_string()))?,
            default_page_size: env::var("API_DEFAULT_PAGE_SIZE")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| AppError::Validation("API_DEFAULT_PAGE_SIZE must be a number".to_string()))?,
            user_agent: env::var("API_USER_AGENT")
                .unwrap_or_else(|_| format!("{}/{}", crate::NAME, crate::VERSION)),
        };

        Ok(config)
    }

    /// Avec un jeton d'accès
    pub fn with_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    /// Vérifier si on est en production
    pub fn is_production(&self) -> bool {
        self.run_mode == "production"
    }

    /// Vérifier si on est en développement
    pub fn is_development(&self) -> bool {
        self.run_mode == "development"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ClientConfig::new("http://localhost:8080/api/");

        assert_eq!(config.api_base_url, "http://localhost:8080/api");
        assert_eq!(config.default_page_size, 20);
        assert!(config.is_development());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_with_token() {
        let config = ClientConfig::new("http://localhost").with_token("abc");
        assert_eq!(config.api_token.as_deref(), Some("abc"));
    }
}
