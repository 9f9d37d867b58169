use crate::core::query::{Pagination, QueryString, ToQuery};
use crate::models::{de, GroupCount, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

/// État d'une promotion
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatut {
    #[default]
    Brouillon,
    Active,
    Suspendue,
    Expiree,
}

impl PromotionStatut {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatut::Brouillon => "brouillon",
            PromotionStatut::Active => "active",
            PromotionStatut::Suspendue => "suspendue",
            PromotionStatut::Expiree => "expiree",
        }
    }
}

impl fmt::Display for PromotionStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type de réduction appliquée
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TypeReduction {
    #[default]
    Pourcentage,
    MontantFixe,
}

impl TypeReduction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeReduction::Pourcentage => "pourcentage",
            TypeReduction::MontantFixe => "montant_fixe",
        }
    }
}

impl fmt::Display for TypeReduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une promotion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Promotion {
    pub uuid: Uuid,

    pub titre: String,

    /// Code saisi par l'acheteur, s'il y en a un
    pub code: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub type_reduction: TypeReduction,

    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub valeur: f64,

    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin: Option<DateTime<Utc>>,

    #[serde(default)]
    pub statut: PromotionStatut,

    #[serde(default)]
    pub article_uuids: Vec<Uuid>,

    pub annonce_uuid: Option<Uuid>,

    #[serde(default)]
    pub utilisations: u64,

    pub utilisations_max: Option<u64>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource for Promotion {
    const NAME: &'static str = "promotion";
    const COLLECTION_KEY: &'static str = "promotions";

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Promotion {
    /// Active et dans sa période de validité à `now`
    pub fn is_running(&self, now: DateTime<Utc>) -> bool {
        self.statut == PromotionStatut::Active
            && self.date_debut.map(|d| d <= now).unwrap_or(true)
            && self.date_fin.map(|d| d > now).unwrap_or(true)
    }

    /// Plafond d'utilisation atteint
    pub fn is_exhausted(&self) -> bool {
        self.utilisations_max
            .map(|max| self.utilisations >= max)
            .unwrap_or(false)
    }

    /// Prix après application de la réduction, jamais négatif
    pub fn apply_to(&self, prix: f64) -> f64 {
        let reduit = match self.type_reduction {
            TypeReduction::Pourcentage => prix - prix * self.valeur / 100.0,
            TypeReduction::MontantFixe => prix - self.valeur,
        };
        reduit.max(0.0)
    }
}

/// Pour créer une promotion
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NewPromotion {
    #[validate(length(min = 3, max = 120, message = "Le titre doit faire entre 3 et 120 caractères"))]
    pub titre: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 4, max = 32, message = "Le code doit faire entre 4 et 32 caractères"))]
    pub code: Option<String>,

    #[serde(default)]
    pub description: String,

    pub type_reduction: TypeReduction,

    pub valeur: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<DateTime<Utc>>,

    #[serde(default)]
    pub article_uuids: Vec<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annonce_uuid: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilisations_max: Option<u64>,
}

/// Pour mettre à jour une promotion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePromotion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_reduction: Option<TypeReduction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valeur: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_uuids: Option<Vec<Uuid>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utilisations_max: Option<u64>,
}

/// Filtres de recherche de promotions
#[derive(Debug, Clone, Default)]
pub struct PromotionFilters {
    pub pagination: Pagination,
    pub statut: Option<PromotionStatut>,
    pub type_reduction: Option<TypeReduction>,
    pub article_uuid: Option<Uuid>,
    pub annonce_uuid: Option<Uuid>,
    /// Promotions actives à cette date
    pub actives_le: Option<DateTime<Utc>>,
    pub expire_avant: Option<DateTime<Utc>>,
    pub valeur_min: Option<f64>,
    pub valeur_max: Option<f64>,
    pub code: Option<String>,
}

impl ToQuery for PromotionFilters {
    fn to_query(&self) -> QueryString {
        let mut query = self.pagination.to_query();
        query
            .push("statut", self.statut)
            .push("type_reduction", self.type_reduction)
            .push("article_uuid", self.article_uuid)
            .push("annonce_uuid", self.annonce_uuid)
            .push("actives_le", self.actives_le.map(|d| d.to_rfc3339()))
            .push("expire_avant", self.expire_avant.map(|d| d.to_rfc3339()))
            .push("valeur_min", self.valeur_min)
            .push("valeur_max", self.valeur_max)
            .push("code", self.code.as_deref());
        query
    }
}

/// Statistiques calculées sur un lot de promotions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PromotionStats {
    pub total: u64,
    pub actives: u64,
    pub suspendues: u64,
    pub expirees: u64,
    pub epuisees: u64,
    pub utilisations_totales: u64,
    pub reduction_moyenne_pourcentage: i64,
    pub par_statut: Vec<GroupCount>,
    pub par_type: Vec<GroupCount>,
}
