// Modèle: annonce.rs
pub mod annonce;
pub use annonce::{
    Annonce, AnnonceStatut, TypeAnnonce,
    NewAnnonce, UpdateAnnonce, AnnonceFilters, AnnonceStats
};

// Modèle: article.rs
pub mod article;
pub use article::{
    Article, ArticleStatut, NewArticle, UpdateArticle,
    ArticleFilters, ArticleStats
};

// Modèle: promotion.rs
pub mod promotion;
pub use promotion::{
    Promotion, PromotionStatut, TypeReduction, NewPromotion,
    UpdatePromotion, PromotionFilters, PromotionStats
};

// Modèle: reception.rs
pub mod reception;
pub use reception::{
    Reception, ReceptionStatut, LigneReception, NewReception,
    UpdateReception, ReceptionFilters, ReceptionStats
};

// Modèle: analysis.rs
pub mod analysis;
pub use analysis::{
    GroupCount, PriceAnalysis, SimilarItem, ValidationReport
};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entité exposée par l'API et identifiée par un UUID
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    /// Nom singulier, utilisé dans les logs et les erreurs
    const NAME: &'static str;

    /// Clé de la liste dans les enveloppes `{ <clé>: [...] }`
    const COLLECTION_KEY: &'static str;

    fn uuid(&self) -> Uuid;
}

/// Réponse paginée normalisée
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub count: u64,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// Résultat dégradé: aucune entité, une seule page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            total: 0,
            page: 1,
            pages: 1,
        }
    }

    /// Liste complète non paginée
    pub fn from_items(items: Vec<T>) -> Self {
        let count = items.len() as u64;
        Self {
            items,
            count,
            total: count,
            page: 1,
            pages: 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PaginatedResponse<U> {
        PaginatedResponse {
            items: self.items.into_iter().map(f).collect(),
            count: self.count,
            total: self.total,
            page: self.page,
            pages: self.pages,
        }
    }
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Référence vers une catégorie, telle qu'embarquée par l'API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorieRef {
    pub uuid: Uuid,
    pub nom: String,
}

/// Motif accompagnant un blocage ou un rejet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Motif {
    pub motif: String,
}

impl Motif {
    pub fn new(motif: &str) -> Self {
        Self {
            motif: motif.to_string(),
        }
    }
}

/// Désérialisation tolérante des montants: l'API renvoie parfois les
/// décimaux sous forme de chaîne (`"150000.00"`).
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }))
    }

    pub fn f64_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_f64(deserializer)?.unwrap_or(0.0))
    }
}
