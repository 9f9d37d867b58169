use annonces_client::core::Pagination;
use annonces_client::models::{AnnonceFilters, PromotionFilters, ReceptionFilters, ArticleFilters};
use annonces_client::services::{
    AnnonceService, ApiClient, ArticleService, HttpTransport, PromotionService, ReceptionService,
};
use annonces_client::utils::{setup_tracing, AppError, ClientConfig, Result};
use serde::Serialize;
use std::env;
use std::sync::Arc;
use tracing::{error, info, warn};

const USAGE: &str = "Usage: annonces-client <annonces|stats|prix|articles|promotions|receptions>";

#[tokio::main]
async fn main() {
    let commande = env::args().nth(1).unwrap_or_default();

    // Chargement de la configuration
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Impossible de charger la configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialisation du logging
    setup_tracing(&config);
    info!("🚀 {} {} ({})", annonces_client::NAME, annonces_client::VERSION, config.run_mode);
    info!("🔧 API: {}", config.api_base_url);
    if config.is_production() && config.api_token.is_none() {
        warn!("⚠️ API_TOKEN absent en production");
    }

    if let Err(e) = run(&commande, &config).await {
        error!("❌ {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(commande: &str, config: &ClientConfig) -> Result<()> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ApiClient::new(config)?);
    let pagination = Pagination::page(1, config.default_page_size);

    match commande {
        "annonces" => {
            let filters = AnnonceFilters {
                pagination,
                ..Default::default()
            };
            print_json(&AnnonceService::new(transport).list(&filters).await?)
        }
        "stats" => {
            let filters = AnnonceFilters {
                pagination,
                ..Default::default()
            };
            print_json(&AnnonceService::new(transport).stats(&filters).await?)
        }
        "prix" => {
            let filters = AnnonceFilters {
                pagination,
                ..Default::default()
            };
            print_json(&AnnonceService::new(transport).price_analysis(&filters).await?)
        }
        "articles" => {
            let filters = ArticleFilters {
                pagination,
                ..Default::default()
            };
            print_json(&ArticleService::new(transport).list(&filters).await?)
        }
        "promotions" => {
            let filters = PromotionFilters {
                pagination,
                ..Default::default()
            };
            print_json(&PromotionService::new(transport).list(&filters).await?)
        }
        "receptions" => {
            let filters = ReceptionFilters {
                pagination,
                ..Default::default()
            };
            print_json(&ReceptionService::new(transport).list(&filters).await?)
        }
        _ => Err(AppError::Validation(USAGE.to_string())),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
