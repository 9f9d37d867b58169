use crate::core::query::{Pagination, QueryString, ToQuery};
use crate::models::{de, CategorieRef, GroupCount, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// Cycle de vie d'une annonce
///
/// `brouillon → en_attente → publie → {bloque, archive}`, `bloque → publie`
/// par déblocage. Le backend reste seul juge des transitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnnonceStatut {
    #[default]
    Brouillon,    // Rédigée, non soumise
    EnAttente,    // En attente de modération
    Publie,       // Visible publiquement
    Bloque,       // Bloquée par un modérateur
    Archive,      // Retirée
}

impl AnnonceStatut {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnonceStatut::Brouillon => "brouillon",
            AnnonceStatut::EnAttente => "en_attente",
            AnnonceStatut::Publie => "publie",
            AnnonceStatut::Bloque => "bloque",
            AnnonceStatut::Archive => "archive",
        }
    }
}

impl fmt::Display for AnnonceStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nature de l'annonce
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeAnnonce {
    #[default]
    Vente,
    Location,
    Echange,
    Service,
}

impl TypeAnnonce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeAnnonce::Vente => "vente",
            TypeAnnonce::Location => "location",
            TypeAnnonce::Echange => "echange",
            TypeAnnonce::Service => "service",
        }
    }
}

impl fmt::Display for TypeAnnonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une annonce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Annonce {
    /// Identifiant stable, jamais réutilisé
    pub uuid: Uuid,

    pub titre: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub type_annonce: TypeAnnonce,

    #[serde(default)]
    pub statut: AnnonceStatut,

    /// Prix demandé (absent pour certains échanges)
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub prix: Option<f64>,

    /// Surface en m²
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub surface: Option<f64>,

    pub nombre_pieces: Option<u32>,

    pub ville: Option<String>,

    pub quartier: Option<String>,

    pub categorie_uuid: Option<Uuid>,

    /// Catégorie embarquée quand l'API la joint
    pub categorie: Option<CategorieRef>,

    /// Propriétaire de l'annonce
    pub utilisateur_uuid: Option<Uuid>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub nombre_vues: u64,

    #[serde(default)]
    pub is_featured: bool,

    #[serde(default)]
    pub is_urgent: bool,

    pub date_expiration: Option<DateTime<Utc>>,

    /// Raison du dernier blocage ou rejet
    pub motif_blocage: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource for Annonce {
    const NAME: &'static str = "annonce";
    const COLLECTION_KEY: &'static str = "annonces";

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Annonce {
    /// UUID de catégorie, pris dans la catégorie embarquée à défaut
    pub fn categorie_id(&self) -> Option<Uuid> {
        self.categorie_uuid.or_else(|| self.categorie.as_ref().map(|c| c.uuid))
    }

    /// Nom de catégorie si embarquée, sinon l'UUID
    pub fn categorie_label(&self) -> Option<String> {
        self.categorie
            .as_ref()
            .map(|c| c.nom.clone())
            .or_else(|| self.categorie_uuid.map(|u| u.to_string()))
    }

    pub fn is_published(&self) -> bool {
        self.statut == AnnonceStatut::Publie
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.date_expiration.map(|d| d <= now).unwrap_or(false)
    }
}

/// Pour créer une annonce
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewAnnonce {
    #[validate(length(min = 5, max = 150, message = "Le titre doit faire entre 5 et 150 caractères"))]
    pub titre: String,

    #[validate(length(min = 20, message = "La description doit contenir au moins 20 caractères"))]
    pub description: String,

    pub type_annonce: TypeAnnonce,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 100, message = "Le nombre de pièces doit être compris entre 1 et 100"))]
    pub nombre_pieces: Option<u32>,

    pub ville: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quartier: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_uuid: Option<Uuid>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub is_urgent: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<DateTime<Utc>>,
}

/// Pour mettre à jour une annonce (champs absents inchangés)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnnonce {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_annonce: Option<TypeAnnonce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nombre_pieces: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quartier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_uuid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_expiration: Option<DateTime<Utc>>,
}

/// Filtres de recherche d'annonces
#[derive(Debug, Clone, Default)]
pub struct AnnonceFilters {
    pub pagination: Pagination,
    pub prix_min: Option<f64>,
    pub prix_max: Option<f64>,
    pub surface_min: Option<f64>,
    pub surface_max: Option<f64>,
    pub nombre_pieces_min: Option<u32>,
    pub ville: Option<String>,
    pub quartier: Option<String>,
    pub statut: Option<AnnonceStatut>,
    pub type_annonce: Option<TypeAnnonce>,
    pub categorie_uuid: Option<Uuid>,
    pub utilisateur_uuid: Option<Uuid>,
    pub is_featured: Option<bool>,
    pub is_urgent: Option<bool>,
    /// Annonces expirant avant cette date
    pub expire_avant: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl ToQuery for AnnonceFilters {
    fn to_query(&self) -> QueryString {
        let mut query = self.pagination.to_query();
        query
            .push("prix_min", self.prix_min)
            .push("prix_max", self.prix_max)
            .push("surface_min", self.surface_min)
            .push("surface_max", self.surface_max)
            .push("nombre_pieces_min", self.nombre_pieces_min)
            .push("ville", self.ville.as_deref())
            .push("quartier", self.quartier.as_deref())
            .push("statut", self.statut)
            .push("type_annonce", self.type_annonce)
            .push("categorie_uuid", self.categorie_uuid)
            .push("utilisateur_uuid", self.utilisateur_uuid)
            .push("is_featured", self.is_featured)
            .push("is_urgent", self.is_urgent)
            .push("expire_avant", self.expire_avant.map(|d| d.to_rfc3339()))
            .push_all("tags", &self.tags);
        query
    }
}

/// Statistiques calculées sur un lot d'annonces
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnnonceStats {
    pub total: u64,
    pub brouillons: u64,
    pub en_attente: u64,
    pub publiees: u64,
    pub bloquees: u64,
    pub archivees: u64,
    pub featured: u64,
    pub urgentes: u64,
    pub total_vues: u64,
    pub vues_moyennes: i64,
    pub prix_moyen: i64,
    /// Part des annonces publiées (0-100)
    pub taux_publication: f64,
    pub par_statut: Vec<GroupCount>,
    pub par_type: Vec<GroupCount>,
    pub par_categorie: Vec<GroupCount>,
    pub par_ville: Vec<GroupCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_with_string_price() {
        let annonce: Annonce = serde_json::from_value(json!({
            "uuid": "6f1c1a52-3c0b-4c8e-9d7a-2b1f0e7c9a11",
            "titre": "Villa 4 pièces",
            "statut": "en_attente",
            "type_annonce": "location",
            "prix": "350000.00",
            "ville": "Abidjan"
        }))
        .unwrap();

        assert_eq!(annonce.statut, AnnonceStatut::EnAttente);
        assert_eq!(annonce.type_annonce, TypeAnnonce::Location);
        assert_eq!(annonce.prix, Some(350000.0));
        assert!(annonce.images.is_empty());
        assert_eq!(annonce.nombre_vues, 0);
    }

    #[test]
    fn test_published_and_expired() {
        let now = Utc::now();
        let mut annonce: Annonce = serde_json::from_value(json!({
            "uuid": "6f1c1a52-3c0b-4c8e-9d7a-2b1f0e7c9a11",
            "titre": "Studio meublé",
            "statut": "publie"
        }))
        .unwrap();

        assert!(annonce.is_published());
        // sans date d'expiration, jamais expirée
        assert!(!annonce.is_expired(now));

        annonce.date_expiration = Some(now + chrono::Duration::hours(1));
        assert!(!annonce.is_expired(now));
        annonce.date_expiration = Some(now);
        assert!(annonce.is_expired(now));

        annonce.statut = AnnonceStatut::Archive;
        assert!(!annonce.is_published());
    }

    #[test]
    fn test_filters_query() {
        let filters = AnnonceFilters {
            ville: Some("Abidjan".to_string()),
            prix_min: Some(1000.0),
            is_featured: Some(false),
            statut: Some(AnnonceStatut::Publie),
            tags: vec!["meuble".to_string()],
            ..Default::default()
        };

        let query = filters.to_query();
        assert!(query.contains("ville", "Abidjan"));
        assert!(query.contains("prix_min", "1000"));
        assert!(query.contains("is_featured", "false"));
        assert!(query.contains("statut", "publie"));
        assert!(query.contains("tags[]", "meuble"));
        assert!(!query.contains_key("prix_max"));
        assert!(!query.contains_key("page"));
    }

    #[test]
    fn test_update_payload_skips_absent_fields() {
        let payload = UpdateAnnonce {
            prix: Some(120000.0),
            ..Default::default()
        };

        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({ "prix": 120000.0 }));
    }
}
