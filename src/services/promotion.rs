// services/promotion.rs
use crate::core::query::Pagination;
use crate::core::stats::promotion_stats;
use crate::models::{
    NewPromotion, PaginatedResponse, Promotion, PromotionFilters, PromotionStats,
    PromotionStatut, UpdatePromotion,
};
use crate::services::endpoints::promotions;
use crate::services::entity::EntityClient;
use crate::services::http::HttpTransport;
use crate::utils::error::Result;
use crate::utils::helpers::date_in_days;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Service des promotions
#[derive(Clone)]
pub struct PromotionService {
    client: EntityClient<Promotion>,
}

impl PromotionService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: EntityClient::new(transport, promotions::COLLECTION, promotions::detail),
        }
    }

    pub async fn list(&self, filters: &PromotionFilters) -> Result<PaginatedResponse<Promotion>> {
        self.client.list(filters).await
    }

    pub async fn get(&self, uuid: Uuid) -> Result<Promotion> {
        self.client.get(uuid).await
    }

    pub async fn create(&self, promotion: &NewPromotion) -> Result<Promotion> {
        self.client.create(promotion).await
    }

    pub async fn update(&self, uuid: Uuid, changes: &UpdatePromotion) -> Result<Promotion> {
        self.client.update(uuid, changes).await
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<()> {
        self.client.delete(uuid).await
    }

    pub async fn activate(&self, uuid: Uuid) -> Result<Promotion> {
        self.client.action(&promotions::action(uuid, "activate"), None).await
    }

    pub async fn suspend(&self, uuid: Uuid) -> Result<Promotion> {
        self.client.action(&promotions::action(uuid, "suspend"), None).await
    }

    /// Bascule active/suspendue côté serveur
    pub async fn toggle_status(&self, uuid: Uuid) -> Result<Promotion> {
        self.client.put_action(&promotions::action(uuid, "toggle-status"), None).await
    }

    pub async fn restore(&self, uuid: Uuid) -> Result<Promotion> {
        self.client.action(&promotions::action(uuid, "restore"), None).await
    }

    /// Copie une promotion; la copie a son propre UUID
    pub async fn duplicate(&self, uuid: Uuid) -> Result<Promotion> {
        let copie = self.client.action(&promotions::action(uuid, "duplicate"), None).await?;
        info!("📋 Promotion {} dupliquée: {}", uuid, copie.uuid);
        Ok(copie)
    }

    pub async fn active(&self, pagination: &Pagination) -> Result<PaginatedResponse<Promotion>> {
        self.client.list_at(promotions::ACTIVE, pagination).await
    }

    pub async fn by_article(&self, article: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Promotion>> {
        self.client.list_at(&promotions::by_article(article), pagination).await
    }

    /// Promotions actives qui se terminent dans les `days` prochains jours
    pub async fn expiring_soon(&self, days: i64) -> Result<PaginatedResponse<Promotion>> {
        let filters = PromotionFilters {
            statut: Some(PromotionStatut::Active),
            expire_avant: Some(date_in_days(days)?),
            ..Default::default()
        };
        self.client.list(&filters).await
    }

    pub async fn search(&self, text: &str, filters: &PromotionFilters) -> Result<PaginatedResponse<Promotion>> {
        let mut filters = filters.clone();
        filters.pagination.search = Some(text.to_string());
        self.client.list_at(promotions::SEARCH, &filters).await
    }

    /// Recherche par code; un code inconnu donne `None`
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>> {
        match self.client.get_at(&promotions::by_code(code)).await {
            Ok(promotion) => Ok(Some(promotion)),
            Err(e) if e.is_not_found() => {
                debug!(code, "Code promo inconnu");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn batch_update(&self, updates: &[(Uuid, UpdatePromotion)]) -> Result<Vec<Promotion>> {
        self.client.batch_update(updates).await
    }

    pub async fn stats(&self, filters: &PromotionFilters) -> Result<PromotionStats> {
        let page = self.client.list(filters).await?;
        Ok(promotion_stats(&page.items))
    }
}
