// src/lib.rs
// Modules principaux
pub mod models;
pub mod core;
pub mod services;
pub mod utils;

// Ré-exports pour faciliter l'utilisation
pub use models::{
    Annonce, AnnonceFilters, AnnonceStatut, Article, ArticleFilters, GroupCount,
    NewAnnonce, NewArticle, NewPromotion, NewReception, PaginatedResponse,
    PriceAnalysis, Promotion, PromotionFilters, Reception, ReceptionFilters,
    Resource, SimilarItem, ValidationReport,
};
pub use crate::core::{Pagination, QueryString, SortOrder, ToQuery};
pub use crate::core::{validate_annonce, validate_article, validate_promotion};
pub use services::{
    AnnonceService, ApiClient, ArticleService, EntityClient, HttpTransport,
    PromotionService, ReceptionService,
};
pub use utils::{setup_tracing, AppError, ClientConfig, Result};

// Version du client
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "annonces-client";

// Types communs
pub use uuid::Uuid;
pub use chrono::{DateTime, Utc};
