// services/reception.rs
use crate::core::query::{Pagination, QueryString};
use crate::core::stats::reception_stats;
use crate::models::{
    Motif, NewReception, PaginatedResponse, Reception, ReceptionFilters,
    ReceptionStats, ReceptionStatut, UpdateReception,
};
use crate::services::endpoints::receptions;
use crate::services::entity::EntityClient;
use crate::services::http::HttpTransport;
use crate::utils::error::{AppError, Result};
use crate::utils::helpers::date_days_ago;
use crate::utils::validation::{validate_non_empty_list, validate_non_empty_string};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Service des réceptions de marchandises
#[derive(Clone)]
pub struct ReceptionService {
    client: EntityClient<Reception>,
}

impl ReceptionService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: EntityClient::new(transport, receptions::COLLECTION, receptions::detail),
        }
    }

    pub async fn list(&self, filters: &ReceptionFilters) -> Result<PaginatedResponse<Reception>> {
        self.client.list(filters).await
    }

    pub async fn get(&self, uuid: Uuid) -> Result<Reception> {
        self.client.get(uuid).await
    }

    pub async fn create(&self, reception: &NewReception) -> Result<Reception> {
        validate_non_empty_string(&reception.reference, "La référence")?;
        validate_non_empty_list(&reception.lignes, "La liste des lignes")?;
        self.client.create(reception).await
    }

    pub async fn update(&self, uuid: Uuid, changes: &UpdateReception) -> Result<Reception> {
        self.client.update(uuid, changes).await
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<()> {
        self.client.delete(uuid).await
    }

    /// Valide la réception: les quantités reçues entrent en stock
    pub async fn approve(&self, uuid: Uuid) -> Result<Reception> {
        let reception = self.client.action(&receptions::action(uuid, "approve"), None).await?;
        info!("✅ Réception {} validée ({} unités)", reception.reference, reception.quantite_recue());
        Ok(reception)
    }

    pub async fn reject(&self, uuid: Uuid, motif: &str) -> Result<Reception> {
        let body = serde_json::to_value(Motif::new(motif))?;
        self.client.action(&receptions::action(uuid, "reject"), Some(body)).await
    }

    pub async fn cancel(&self, uuid: Uuid) -> Result<Reception> {
        self.client.action(&receptions::action(uuid, "cancel"), None).await
    }

    pub async fn restore(&self, uuid: Uuid) -> Result<Reception> {
        self.client.action(&receptions::action(uuid, "restore"), None).await
    }

    pub async fn pending(&self, pagination: &Pagination) -> Result<PaginatedResponse<Reception>> {
        self.client.list_at(receptions::PENDING, pagination).await
    }

    pub async fn by_fournisseur(&self, fournisseur: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Reception>> {
        self.client.list_at(&receptions::by_fournisseur(fournisseur), pagination).await
    }

    pub async fn by_entrepot(&self, entrepot: &str, pagination: &Pagination) -> Result<PaginatedResponse<Reception>> {
        let filters = ReceptionFilters {
            pagination: pagination.clone(),
            entrepot: Some(entrepot.to_string()),
            ..Default::default()
        };
        self.client.list(&filters).await
    }

    /// Réceptions datées dans `[debut, fin]`
    pub async fn between(&self, debut: DateTime<Utc>, fin: DateTime<Utc>) -> Result<PaginatedResponse<Reception>> {
        if fin < debut {
            return Err(AppError::Validation(
                "La date de fin doit être postérieure à la date de début".to_string(),
            ));
        }

        let filters = ReceptionFilters {
            date_debut: Some(debut),
            date_fin: Some(fin),
            ..Default::default()
        };
        self.client.list(&filters).await
    }

    pub async fn batch_update(&self, updates: &[(Uuid, UpdateReception)]) -> Result<Vec<Reception>> {
        self.client.batch_update(updates).await
    }

    pub async fn stats(&self, filters: &ReceptionFilters) -> Result<ReceptionStats> {
        let page = self.client.list(filters).await?;
        Ok(reception_stats(&page.items))
    }

    /// Réceptions en attente depuis plus de `jours` jours
    pub async fn overdue(&self, jours: i64) -> Result<Vec<Reception>> {
        let limite = date_days_ago(jours)?;
        let page = self.client.list_at(receptions::PENDING, &Pagination::default()).await?;

        Ok(page
            .items
            .into_iter()
            .filter(|r| r.statut == ReceptionStatut::EnAttente)
            .filter(|r| r.date_reception.map(|d| d < limite).unwrap_or(false))
            .collect())
    }

    pub async fn export_pdf(&self, uuid: Uuid) -> Result<Vec<u8>> {
        self.client.export(&receptions::export_pdf(uuid), &QueryString::new()).await
    }

    pub async fn export_csv(&self, filters: &ReceptionFilters) -> Result<Vec<u8>> {
        self.client.export(receptions::EXPORT_CSV, filters).await
    }
}
