// services/entity.rs
use crate::core::envelope::{decode_entity, normalize_list};
use crate::core::query::ToQuery;
use crate::models::{PaginatedResponse, Resource};
use crate::services::http::HttpTransport;
use crate::utils::error::Result;
use futures_util::future::try_join_all;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Client générique d'une ressource de l'API
///
/// Compose le transport, les routes, le constructeur de requêtes et le
/// décodage des réponses. Aucune mutation n'est appliquée localement:
/// chaque opération renvoie l'entité telle que le backend la retourne.
pub struct EntityClient<T> {
    transport: Arc<dyn HttpTransport>,
    collection: &'static str,
    detail: fn(Uuid) -> String,
    _resource: PhantomData<fn() -> T>,
}

impl<T> Clone for EntityClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            collection: self.collection,
            detail: self.detail,
            _resource: PhantomData,
        }
    }
}

impl<T: Resource> EntityClient<T> {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        collection: &'static str,
        detail: fn(Uuid) -> String,
    ) -> Self {
        Self {
            transport,
            collection,
            detail,
            _resource: PhantomData,
        }
    }

    /// Liste paginée de la collection
    pub async fn list(&self, filters: &impl ToQuery) -> Result<PaginatedResponse<T>> {
        self.list_at(self.collection, filters).await
    }

    /// Liste paginée sur une route spécialisée
    ///
    /// Une réponse de forme inattendue donne une liste vide; seules les
    /// erreurs de transport sont propagées.
    pub async fn list_at(&self, path: &str, filters: &impl ToQuery) -> Result<PaginatedResponse<T>> {
        let url = filters.to_query().append_to(path);
        debug!(resource = T::NAME, url = %url, "Liste demandée");
        let body = self.transport.get(&url).await?;

        Ok(normalize_list(body, T::COLLECTION_KEY))
    }

    pub async fn get(&self, uuid: Uuid) -> Result<T> {
        self.get_at(&(self.detail)(uuid)).await
    }

    /// Entité seule sur une route spécialisée
    pub async fn get_at(&self, path: &str) -> Result<T> {
        let body = self.transport.get(path).await?;
        decode_entity(body)
    }

    pub async fn create<P: Serialize + ?Sized>(&self, payload: &P) -> Result<T> {
        let body = serde_json::to_value(payload)?;
        let response = self.transport.post(self.collection, Some(body)).await?;
        let entity: T = decode_entity(response)?;

        info!("✅ {} créé(e): {}", T::NAME, entity.uuid());
        Ok(entity)
    }

    pub async fn update<P: Serialize + ?Sized>(&self, uuid: Uuid, payload: &P) -> Result<T> {
        let body = serde_json::to_value(payload)?;
        let response = self.transport.put(&(self.detail)(uuid), Some(body)).await?;
        decode_entity(response)
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<()> {
        self.transport.delete(&(self.detail)(uuid)).await?;
        info!("🗑️ {} supprimé(e): {}", T::NAME, uuid);
        Ok(())
    }

    /// POST sur une sous-ressource, renvoie l'entité mise à jour
    pub async fn action(&self, path: &str, body: Option<Value>) -> Result<T> {
        let response = self.transport.post(path, body).await?;
        decode_entity(response)
    }

    /// Variante PUT, utilisée pour les bascules de statut
    pub async fn put_action(&self, path: &str, body: Option<Value>) -> Result<T> {
        let response = self.transport.put(path, body).await?;
        decode_entity(response)
    }

    /// Appel dont l'échec est journalisé mais jamais propagé
    pub async fn fire_and_forget(&self, path: &str) {
        if let Err(e) = self.transport.post(path, None).await {
            error!(resource = T::NAME, path, "❌ Appel ignoré en échec: {}", e);
        }
    }

    /// Met à jour plusieurs entités en parallèle
    ///
    /// Le premier échec fait échouer le lot. Les mises à jour déjà
    /// appliquées côté serveur ne sont pas annulées.
    pub async fn batch_update<P: Serialize>(&self, updates: &[(Uuid, P)]) -> Result<Vec<T>> {
        let entities = try_join_all(
            updates.iter().map(|(uuid, payload)| self.update(*uuid, payload)),
        )
        .await?;

        info!("✅ {} {}(s) mis(es) à jour", entities.len(), T::NAME);
        Ok(entities)
    }

    /// Supprime plusieurs entités en parallèle, mêmes garanties que `batch_update`
    pub async fn batch_delete(&self, uuids: &[Uuid]) -> Result<()> {
        try_join_all(uuids.iter().map(|uuid| self.delete(*uuid))).await?;
        Ok(())
    }

    /// Export binaire (PDF, CSV), non interprété
    pub async fn export(&self, path: &str, filters: &impl ToQuery) -> Result<Vec<u8>> {
        let url = filters.to_query().append_to(path);
        let bytes = self.transport.get_blob(&url).await?;

        info!("📄 Export {}: {} octets", T::NAME, bytes.len());
        Ok(bytes)
    }
}
