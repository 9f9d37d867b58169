// services/mod.rs
pub mod http;
pub mod endpoints;
pub mod entity;
pub mod annonce;
pub mod article;
pub mod promotion;
pub mod reception;

// Ré-exports pour faciliter l'import
pub use http::{HttpTransport, ApiClient};
pub use entity::EntityClient;
pub use annonce::AnnonceService;
pub use article::ArticleService;
pub use promotion::PromotionService;
pub use reception::ReceptionService;
