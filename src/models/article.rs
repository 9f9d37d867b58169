use crate::core::query::{Pagination, QueryString, ToQuery};
use crate::models::{de, CategorieRef, GroupCount, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// État d'un article du catalogue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatut {
    #[default]
    Brouillon,
    Publie,
    Bloque,
    Archive,
}

impl ArticleStatut {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatut::Brouillon => "brouillon",
            ArticleStatut::Publie => "publie",
            ArticleStatut::Bloque => "bloque",
            ArticleStatut::Archive => "archive",
        }
    }
}

impl fmt::Display for ArticleStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Un article mis en vente par un vendeur
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub uuid: Uuid,

    pub nom: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub prix: f64,

    #[serde(default)]
    pub quantite_stock: i64,

    #[serde(default)]
    pub statut: ArticleStatut,

    pub categorie_uuid: Option<Uuid>,
    pub categorie: Option<CategorieRef>,

    /// Vendeur propriétaire
    pub vendeur_uuid: Option<Uuid>,

    pub ville: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub nombre_vues: u64,

    #[serde(default)]
    pub is_featured: bool,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource for Article {
    const NAME: &'static str = "article";
    const COLLECTION_KEY: &'static str = "articles";

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Article {
    /// UUID de catégorie, pris dans la catégorie embarquée à défaut
    pub fn categorie_id(&self) -> Option<Uuid> {
        self.categorie_uuid.or_else(|| self.categorie.as_ref().map(|c| c.uuid))
    }

    pub fn categorie_label(&self) -> Option<String> {
        self.categorie
            .as_ref()
            .map(|c| c.nom.clone())
            .or_else(|| self.categorie_uuid.map(|u| u.to_string()))
    }

    pub fn in_stock(&self) -> bool {
        self.quantite_stock > 0
    }

    /// Valeur du stock au prix catalogue
    pub fn stock_value(&self) -> f64 {
        self.prix * self.quantite_stock.max(0) as f64
    }
}

/// Pour créer un article
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewArticle {
    #[validate(length(min = 3, max = 150, message = "Le nom doit faire entre 3 et 150 caractères"))]
    pub nom: String,

    #[validate(length(min = 20, message = "La description doit contenir au moins 20 caractères"))]
    pub description: String,

    pub prix: f64,

    pub quantite_stock: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_uuid: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,

    #[serde(default)]
    pub images: Vec<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Pour mettre à jour un article
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateArticle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nom: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prix: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantite_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categorie_uuid: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ville: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

/// Filtres de recherche d'articles
#[derive(Debug, Clone, Default)]
pub struct ArticleFilters {
    pub pagination: Pagination,
    pub prix_min: Option<f64>,
    pub prix_max: Option<f64>,
    pub stock_min: Option<i64>,
    pub stock_max: Option<i64>,
    pub statut: Option<ArticleStatut>,
    pub categorie_uuid: Option<Uuid>,
    pub vendeur_uuid: Option<Uuid>,
    pub ville: Option<String>,
    pub is_featured: Option<bool>,
    pub en_stock: Option<bool>,
    pub tags: Vec<String>,
}

impl ToQuery for ArticleFilters {
    fn to_query(&self) -> QueryString {
        let mut query = self.pagination.to_query();
        query
            .push("prix_min", self.prix_min)
            .push("prix_max", self.prix_max)
            .push("stock_min", self.stock_min)
            .push("stock_max", self.stock_max)
            .push("statut", self.statut)
            .push("categorie_uuid", self.categorie_uuid)
            .push("vendeur_uuid", self.vendeur_uuid)
            .push("ville", self.ville.as_deref())
            .push("is_featured", self.is_featured)
            .push("en_stock", self.en_stock)
            .push_all("tags", &self.tags);
        query
    }
}

/// Statistiques calculées sur un lot d'articles
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArticleStats {
    pub total: u64,
    pub publies: u64,
    pub bloques: u64,
    pub en_rupture: u64,
    pub stock_total: i64,
    pub valeur_stock: i64,
    pub prix_moyen: i64,
    pub total_vues: u64,
    pub par_statut: Vec<GroupCount>,
    pub par_categorie: Vec<GroupCount>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_defaults() {
        let article: Article = serde_json::from_value(json!({
            "uuid": "0b6c7a9e-6d52-4f7f-9a3e-1c2d3e4f5a6b",
            "nom": "Chaise en teck",
            "prix": 25000,
            "quantite_stock": 4
        }))
        .unwrap();

        assert_eq!(article.statut, ArticleStatut::Brouillon);
        assert!(article.in_stock());
        assert_eq!(article.stock_value(), 100000.0);
    }

    #[test]
    fn test_filters_query() {
        let query = ArticleFilters {
            stock_max: Some(0),
            en_stock: Some(false),
            ..Default::default()
        }
        .to_query();

        assert!(query.contains("stock_max", "0"));
        assert!(query.contains("en_stock", "false"));
        assert!(!query.contains_key("stock_min"));
    }
}
