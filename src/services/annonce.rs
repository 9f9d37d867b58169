// services/annonce.rs
use crate::core::analytics::{price_distribution, rank_similar};
use crate::core::query::{Pagination, QueryString};
use crate::core::stats::annonce_stats;
use crate::models::{
    Annonce, AnnonceFilters, AnnonceStats, AnnonceStatut, Motif, NewAnnonce,
    PaginatedResponse, PriceAnalysis, SimilarItem, UpdateAnnonce,
};
use crate::services::endpoints::annonces;
use crate::services::entity::EntityClient;
use crate::services::http::HttpTransport;
use crate::utils::error::Result;
use crate::utils::helpers::date_in_days;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Taille du lot de candidats pour la recherche d'annonces similaires
const SIMILAR_POOL_SIZE: u32 = 50;

/// Service des annonces
#[derive(Clone)]
pub struct AnnonceService {
    client: EntityClient<Annonce>,
}

impl AnnonceService {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            client: EntityClient::new(transport, annonces::COLLECTION, annonces::detail),
        }
    }

    pub async fn list(&self, filters: &AnnonceFilters) -> Result<PaginatedResponse<Annonce>> {
        self.client.list(filters).await
    }

    pub async fn get(&self, uuid: Uuid) -> Result<Annonce> {
        self.client.get(uuid).await
    }

    pub async fn create(&self, annonce: &NewAnnonce) -> Result<Annonce> {
        self.client.create(annonce).await
    }

    pub async fn update(&self, uuid: Uuid, changes: &UpdateAnnonce) -> Result<Annonce> {
        self.client.update(uuid, changes).await
    }

    pub async fn delete(&self, uuid: Uuid) -> Result<()> {
        self.client.delete(uuid).await
    }

    // Transitions de statut

    /// Soumet un brouillon à la modération
    pub async fn submit(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "submit").await
    }

    pub async fn approve(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "approve").await
    }

    pub async fn reject(&self, uuid: Uuid, motif: &str) -> Result<Annonce> {
        self.transition_with_motif(uuid, "reject", motif).await
    }

    pub async fn publish(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "publish").await
    }

    pub async fn unpublish(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "unpublish").await
    }

    pub async fn block(&self, uuid: Uuid, motif: &str) -> Result<Annonce> {
        self.transition_with_motif(uuid, "block", motif).await
    }

    pub async fn unblock(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "unblock").await
    }

    pub async fn archive(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "archive").await
    }

    pub async fn restore(&self, uuid: Uuid) -> Result<Annonce> {
        self.transition(uuid, "restore").await
    }

    pub async fn toggle_featured(&self, uuid: Uuid) -> Result<Annonce> {
        self.client.put_action(&annonces::action(uuid, "featured"), None).await
    }

    pub async fn toggle_urgent(&self, uuid: Uuid) -> Result<Annonce> {
        self.client.put_action(&annonces::action(uuid, "urgent"), None).await
    }

    async fn transition(&self, uuid: Uuid, action: &str) -> Result<Annonce> {
        let annonce = self.client.action(&annonces::action(uuid, action), None).await?;
        info!("🔄 Annonce {} -> {} ({})", uuid, annonce.statut, action);
        Ok(annonce)
    }

    async fn transition_with_motif(&self, uuid: Uuid, action: &str, motif: &str) -> Result<Annonce> {
        let body = serde_json::to_value(Motif::new(motif))?;
        let annonce = self.client.action(&annonces::action(uuid, action), Some(body)).await?;
        info!("🔄 Annonce {} -> {} ({}: {})", uuid, annonce.statut, action, motif);
        Ok(annonce)
    }

    // Listes spécialisées

    pub async fn by_utilisateur(&self, utilisateur: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(&annonces::by_utilisateur(utilisateur), pagination).await
    }

    pub async fn by_categorie(&self, categorie: Uuid, pagination: &Pagination) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(&annonces::by_categorie(categorie), pagination).await
    }

    pub async fn published(&self, filters: &AnnonceFilters) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(annonces::PUBLISHED, filters).await
    }

    pub async fn featured(&self, pagination: &Pagination) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(annonces::FEATURED, pagination).await
    }

    pub async fn urgent(&self, pagination: &Pagination) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(annonces::URGENT, pagination).await
    }

    pub async fn pending_moderation(&self, pagination: &Pagination) -> Result<PaginatedResponse<Annonce>> {
        self.client.list_at(annonces::PENDING, pagination).await
    }

    /// Annonces publiées qui expirent dans les `days` prochains jours
    pub async fn expiring_soon(&self, days: i64) -> Result<PaginatedResponse<Annonce>> {
        let filters = AnnonceFilters {
            statut: Some(AnnonceStatut::Publie),
            expire_avant: Some(date_in_days(days)?),
            ..Default::default()
        };
        self.client.list(&filters).await
    }

    pub async fn popular(&self, limit: u32) -> Result<PaginatedResponse<Annonce>> {
        self.client
            .list_at(annonces::POPULAR, &Pagination::default().with_limit(limit))
            .await
    }

    pub async fn search(&self, text: &str, filters: &AnnonceFilters) -> Result<PaginatedResponse<Annonce>> {
        let mut filters = filters.clone();
        filters.pagination.search = Some(text.to_string());
        self.client.list_at(annonces::SEARCH, &filters).await
    }

    /// Compteur de vues, sans effet sur l'appelant en cas d'échec
    pub async fn increment_views(&self, uuid: Uuid) {
        self.client.fire_and_forget(&annonces::action(uuid, "vues")).await
    }

    // Lots

    pub async fn batch_update(&self, updates: &[(Uuid, UpdateAnnonce)]) -> Result<Vec<Annonce>> {
        self.client.batch_update(updates).await
    }

    pub async fn batch_delete(&self, uuids: &[Uuid]) -> Result<()> {
        self.client.batch_delete(uuids).await
    }

    // Analyses

    /// Annonces publiées les plus proches de `uuid`, meilleur score d'abord
    pub async fn similar(&self, uuid: Uuid, limit: usize) -> Result<Vec<SimilarItem<Annonce>>> {
        let reference = self.client.get(uuid).await?;
        let filters = AnnonceFilters {
            pagination: Pagination::default().with_limit(SIMILAR_POOL_SIZE),
            statut: Some(AnnonceStatut::Publie),
            categorie_uuid: reference.categorie_id(),
            ..Default::default()
        };
        let pool = self.client.list(&filters).await?;

        Ok(rank_similar(&reference, pool.items, limit))
    }

    pub async fn stats(&self, filters: &AnnonceFilters) -> Result<AnnonceStats> {
        let page = self.client.list(filters).await?;
        Ok(annonce_stats(&page.items))
    }

    /// Distribution des prix renseignés
    pub async fn price_analysis(&self, filters: &AnnonceFilters) -> Result<PriceAnalysis> {
        let page = self.client.list(filters).await?;
        let prix: Vec<f64> = page.items.iter().filter_map(|a| a.prix).collect();
        Ok(price_distribution(&prix))
    }

    // Exports

    pub async fn export_pdf(&self, uuid: Uuid) -> Result<Vec<u8>> {
        self.client.export(&annonces::export_pdf(uuid), &QueryString::new()).await
    }

    pub async fn export_csv(&self, filters: &AnnonceFilters) -> Result<Vec<u8>> {
        self.client.export(annonces::EXPORT_CSV, filters).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::ApiClient;
    use crate::utils::config::ClientConfig;
    use assert_json_diff::assert_json_include;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service(server: &MockServer) -> AnnonceService {
        let transport = ApiClient::new(&ClientConfig::new(&server.uri())).unwrap();
        AnnonceService::new(Arc::new(transport))
    }

    fn annonce(uuid: Uuid, statut: &str, categorie: Uuid, ville: &str, prix: f64) -> Value {
        json!({
            "uuid": uuid,
            "titre": "Appartement",
            "statut": statut,
            "type_annonce": "location",
            "categorie_uuid": categorie,
            "ville": ville,
            "prix": prix
        })
    }

    #[tokio::test]
    async fn test_create_sends_draft_and_skips_empty_fields() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        let categorie = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path(annonces::COLLECTION))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": annonce(id, "brouillon", categorie, "Abidjan", 150_000.0)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = NewAnnonce {
            titre: "Studio meublé Plateau".to_string(),
            description: "Studio meublé avec climatisation et accès internet.".to_string(),
            prix: Some(150_000.0),
            ville: "Abidjan".to_string(),
            categorie_uuid: Some(categorie),
            ..Default::default()
        };
        let annonce = service(&server).create(&draft).await.unwrap();
        assert_eq!(annonce.uuid, id);
        assert_eq!(annonce.statut, AnnonceStatut::Brouillon);

        let requests = server.received_requests().await.unwrap();
        let body: Value = requests[0].body_json().unwrap();
        assert_json_include!(
            actual: body.clone(),
            expected: json!({
                "titre": "Studio meublé Plateau",
                "type_annonce": "vente",
                "prix": 150000.0,
                "ville": "Abidjan",
                "categorie_uuid": categorie
            })
        );
        assert!(body.get("surface").is_none());
        assert!(body.get("quartier").is_none());
    }

    #[tokio::test]
    async fn test_reject_sends_motif_and_returns_backend_entity() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path(annonces::action(id, "reject")))
            .and(body_json(json!({ "motif": "Photos floues" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": annonce(id, "bloque", Uuid::new_v4(), "Abidjan", 1.0)
            })))
            .expect(1)
            .mount(&server)
            .await;

        let annonce = service(&server).reject(id, "Photos floues").await.unwrap();
        assert_eq!(annonce.statut, AnnonceStatut::Bloque);
    }

    #[tokio::test]
    async fn test_failed_transition_is_an_error() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("POST"))
            .and(path(annonces::action(id, "publish")))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({ "message": "Annonce non approuvée" })),
            )
            .mount(&server)
            .await;

        let err = service(&server).publish(id).await.unwrap_err();
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.to_string(), "Annonce non approuvée");
    }

    #[tokio::test]
    async fn test_toggle_featured_uses_put() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(annonces::action(id, "featured")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "uuid": id, "titre": "Villa", "is_featured": true
            })))
            .mount(&server)
            .await;

        assert!(service(&server).toggle_featured(id).await.unwrap().is_featured);
    }

    #[tokio::test]
    async fn test_search_sends_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(annonces::SEARCH))
            .and(query_param("search", "villa piscine"))
            .and(query_param("ville", "Assinie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "annonces": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let filters = AnnonceFilters {
            ville: Some("Assinie".to_string()),
            ..Default::default()
        };
        let page = service(&server).search("villa piscine", &filters).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_similar_ranks_candidates() {
        let server = MockServer::start().await;
        let categorie = Uuid::new_v4();
        let reference = Uuid::new_v4();
        let proche = Uuid::new_v4();
        let lointaine = Uuid::new_v4();

        Mock::given(method("GET"))
            .and(path(annonces::detail(reference)))
            .respond_with(ResponseTemplate::new(200).set_body_json(annonce(
                reference, "publie", categorie, "Abidjan", 200_000.0,
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(annonces::COLLECTION))
            .and(query_param("categorie_uuid", categorie.to_string()))
            .and(query_param("statut", "publie"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    annonce(lointaine, "publie", categorie, "Bouaké", 900_000.0),
                    annonce(reference, "publie", categorie, "Abidjan", 200_000.0),
                    annonce(proche, "publie", categorie, "Abidjan", 210_000.0),
                ]
            })))
            .mount(&server)
            .await;

        let similar = service(&server).similar(reference, 5).await.unwrap();

        assert_eq!(similar.len(), 2);
        assert_eq!(similar[0].item.uuid, proche);
        assert_eq!(similar[0].score, 90);
        assert_eq!(similar[1].item.uuid, lointaine);
        assert_eq!(similar[1].score, 55);
    }

    #[tokio::test]
    async fn test_similar_with_embedded_categorie_filters_pool() {
        let server = MockServer::start().await;
        let categorie = Uuid::new_v4();
        let reference = Uuid::new_v4();
        let voisine = Uuid::new_v4();
        let embarquee = |uuid: Uuid| {
            json!({
                "uuid": uuid,
                "titre": "Duplex",
                "statut": "publie",
                "type_annonce": "vente",
                "categorie": { "uuid": categorie, "nom": "Immobilier" },
                "ville": "Abidjan"
            })
        };

        Mock::given(method("GET"))
            .and(path(annonces::detail(reference)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": embarquee(reference) })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(annonces::COLLECTION))
            .and(query_param("categorie_uuid", categorie.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [embarquee(reference), embarquee(voisine)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let similar = service(&server).similar(reference, 5).await.unwrap();

        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].item.uuid, voisine);
        assert_eq!(similar[0].score, 75);
    }

    #[tokio::test]
    async fn test_expiring_soon_out_of_range_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = service(&server).expiring_soon(i64::MAX / 1000).await.unwrap_err();
        assert!(matches!(err, crate::utils::error::AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_price_analysis_ignores_missing_prices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(annonces::COLLECTION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "uuid": Uuid::new_v4(), "titre": "A", "prix": 100 },
                { "uuid": Uuid::new_v4(), "titre": "B", "prix": "300" },
                { "uuid": Uuid::new_v4(), "titre": "C" }
            ])))
            .mount(&server)
            .await;

        let analysis = service(&server)
            .price_analysis(&AnnonceFilters::default())
            .await
            .unwrap();

        assert_eq!(analysis.count, 2);
        assert_eq!(analysis.average, 200);
        assert_eq!(analysis.min, 100);
        assert_eq!(analysis.max, 300);
    }

    #[tokio::test]
    async fn test_export_csv_passes_bytes_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(annonces::EXPORT_CSV))
            .and(query_param("statut", "publie"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xEF, 0xBB, 0xBF, b'a']))
            .mount(&server)
            .await;

        let filters = AnnonceFilters {
            statut: Some(AnnonceStatut::Publie),
            ..Default::default()
        };
        let bytes = service(&server).export_csv(&filters).await.unwrap();
        assert_eq!(bytes, vec![0xEF, 0xBB, 0xBF, b'a']);
    }
}
