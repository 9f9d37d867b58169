// core/mod.rs
pub mod query;
pub mod envelope;
pub mod analytics;
pub mod stats;
pub mod validation;

// Ré-exports pour faciliter l'import
pub use query::{QueryString, ToQuery, Pagination, SortOrder};
pub use envelope::{decode_entity, normalize_list};
pub use analytics::{count_by, price_distribution, rank_similar, similarity_score, Comparable};
pub use stats::{annonce_stats, article_stats, promotion_stats, reception_stats};
pub use validation::{validate_annonce, validate_article, validate_promotion};
