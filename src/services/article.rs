// services/article.rs
use crate::core::analytics::{price_distribution, rank_similar};
use crate::core::query::{Pagination, QueryString, ToQuery};
use crate::core::stats::article_stats;
use crate::models::{
    Article, ArticleFilters, ArticleStats, ArticleStatut, Motif, NewArticle,
    PaginatedResponse, PriceAnalysis, SimilarItem, UpdateArticle,
};
use crate::services::endpoints::articles;
use crate::services::entity::EntityClient;
use crate::services::http::HttpTransport;
use crate::utils::error::Result;
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const SIMILAR_POOL_SIZE: u32 = 50;

/// Service des articles
#[derive(Clone)]
pub struct ArticleService {
    client: EntityClient<Article>,
}

impl ArticleService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: EntityClient::new(transport, articles::COLLECTION, articles::detail),
        }
    }

    pub async fn list(&self, filters: &ArticleFilters) -> Result<PaginatedResponse<Article>> {
        self.client.list(filters).await
    }

    pub async fn get(&self, uuid: Uuid) -> Result<Article> {
        self.client.get(uuid).await
    }

    pub async fn create(&self, article: &NewArticle) -> Result<Article> {
        self.client.create(article).await
    }

    pub async fn update(&self, uuid: Uuid, changes: &UpdateArticle) -> Result<Article> {
        self.client.update(uuid, changes).await
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<()> {
        self.client.delete(uuid).await
    }

    pub async fn publish(&self, uuid: Uuid) -> Result<Article> {
        self.transition(uuid, "publish").await
    }

    pub async fn unpublish(&self, uuid: Uuid) -> Result<Article> {
        self.transition(uuid, "unpublish").await
    }

    pub async fn block(&self, uuid: Uuid, motif: &str) -> Result<Article> {
        let body = serde_json::to_value(Motif::new(motif))?;
        self.client.action(&articles::action(uuid, "block"), Some(body)).await
    }

    pub async fn unblock(&self, uuid: Uuid) -> Result<Article> {
        self.transition(uuid, "unblock").await
    }

    pub async fn archive(&self, uuid: Uuid) -> Result<Article> {
        self.transition(uuid, "archive").await
    }

    pub async fn restore(&self, uuid: Uuid) -> Result<Article> {
        self.transition(uuid, "restore").await
    }

    pub async fn toggle_featured(&self, uuid: Uuid) -> Result<Article> {
        self.client.put_action(&articles::action(uuid, "featured"), None).await
    }

    /// Fixe la quantité en stock (valeur absolue, pas un delta)
    pub async fn update_stock(&self, uuid: Uuid, quantite: i64) -> Result<Article> {
        let article = self
            .client
            .put_action(&articles::action(uuid, "stock"), Some(json!({ "quantite_stock": quantite })))
            .await?;

        info!("📦 Stock de l'article {}: {}", uuid, article.quantite_stock);
        Ok(article)
    }

    async fn transition(&self, uuid: Uuid, action: &str) -> Result<Article> {
        self.client.action(&articles::action(uuid, action), None).await
    }

    pub async fn by_vendeur(&self, vendeur: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Article>> {
        self.client.list_at(&articles::by_vendeur(vendeur), pagination).await
    }

    pub async fn by_categorie(&self, categorie: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Article>> {
        self.client.list_at(&articles::by_categorie(categorie), pagination).await
    }

    pub async fn published(&self, filters: &ArticleFilters) -> Result<PaginatedResponse<Article>> {
        self.client.list_at(articles::PUBLISHED, filters).await
    }

    pub async fn featured(&self, pagination: &Pagination) -> Result<PaginatedResponse<Article>> {
        self.client.list_at(articles::FEATURED, pagination).await
    }

    pub async fn popular(&self, limit: u32) -> Result<PaginatedResponse<Article>> {
        self.client
            .list_at(articles::POPULAR, &Pagination::default().with_limit(limit))
            .await
    }

    /// Articles dont le stock est au plus `seuil`
    pub async fn low_stock(&self, seuil: i64, pagination: &Pagination) -> Result<PaginatedResponse<Article>> {
        let mut query = pagination.to_query();
        query.push("seuil", Some(seuil));
        self.client.list_at(articles::LOW_STOCK, &query).await
    }

    pub async fn search(&self, text: &str, filters: &ArticleFilters) -> Result<PaginatedResponse<Article>> {
        let mut filters = filters.clone();
        filters.pagination.search = Some(text.to_string());
        self.client.list_at(articles::SEARCH, &filters).await
    }

    pub async fn increment_views(&self, uuid: Uuid) {
        self.client.fire_and_forget(&articles::action(uuid, "vues")).await
    }

    pub async fn batch_update(&self, updates: &[(Uuid, UpdateArticle)]) -> Result<Vec<Article>> {
        self.client.batch_update(updates).await
    }

    /// Articles publiés proches de `uuid`, même catégorie en priorité
    pub async fn similar(&self, uuid: Uuid, limit: usize) -> Result<Vec<SimilarItem<Article>>> {
        let reference = self.client.get(uuid).await?;
        let filters = ArticleFilters {
            pagination: Pagination::default().with_limit(SIMILAR_POOL_SIZE),
            statut: Some(ArticleStatut::Publie),
            categorie_uuid: reference.categorie_id(),
            ..Default::default()
        };
        let pool = self.client.list(&filters).await?;

        Ok(rank_similar(&reference, pool.items, limit))
    }

    pub async fn stats(&self, filters: &ArticleFilters) -> Result<ArticleStats> {
        let page = self.client.list(filters).await?;
        Ok(article_stats(&page.items))
    }

    pub async fn price_analysis(&self, filters: &ArticleFilters) -> Result<PriceAnalysis> {
        let page = self.client.list(filters).await?;
        let prix: Vec<f64> = page.items.iter().map(|a| a.prix).collect();
        Ok(price_distribution(&prix))
    }

    pub async fn export_csv(&self, filters: &ArticleFilters) -> Result<Vec<u8>> {
        self.client.export(articles::EXPORT_CSV, filters).await
    }
}
