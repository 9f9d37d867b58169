use crate::core::query::{Pagination, QueryString, ToQuery};
use crate::models::{de, GroupCount, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// État d'une réception en entrepôt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReceptionStatut {
    #[default]
    EnAttente,    // Livraison annoncée, pas encore contrôlée
    Validee,      // Contrôlée et entrée en stock
    Rejetee,      // Refusée au contrôle
    Annulee,      // Annulée avant contrôle
}

impl ReceptionStatut {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReceptionStatut::EnAttente => "en_attente",
            ReceptionStatut::Validee => "validee",
            ReceptionStatut::Rejetee => "rejetee",
            ReceptionStatut::Annulee => "annulee",
        }
    }
}

impl fmt::Display for ReceptionStatut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Une ligne de bon de réception
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LigneReception {
    pub article_uuid: Option<Uuid>,

    #[serde(default)]
    pub designation: String,

    #[serde(default)]
    pub quantite_attendue: i64,

    #[serde(default)]
    pub quantite_recue: i64,

    #[serde(default, deserialize_with = "de::f64_or_zero")]
    pub prix_unitaire: f64,
}

impl LigneReception {
    /// Quantité reçue moins quantité attendue
    pub fn ecart(&self) -> i64 {
        self.quantite_recue - self.quantite_attendue
    }

    pub fn montant(&self) -> f64 {
        self.prix_unitaire * self.quantite_recue as f64
    }
}

/// Une réception de marchandises
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reception {
    pub uuid: Uuid,

    /// Numéro du bon de réception
    pub reference: String,

    pub fournisseur_uuid: Option<Uuid>,
    pub fournisseur_nom: Option<String>,

    pub entrepot: Option<String>,

    pub date_reception: Option<DateTime<Utc>>,

    #[serde(default)]
    pub statut: ReceptionStatut,

    #[serde(default)]
    pub lignes: Vec<LigneReception>,

    /// Montant renvoyé par l'API; recalculé depuis les lignes s'il manque
    #[serde(default, deserialize_with = "de::opt_f64")]
    pub montant_total: Option<f64>,

    pub notes: Option<String>,

    pub motif_rejet: Option<String>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Resource for Reception {
    const NAME: &'static str = "reception";
    const COLLECTION_KEY: &'static str = "receptions";

    fn uuid(&self) -> Uuid {
        self.uuid
    }
}

impl Reception {
    pub fn montant(&self) -> f64 {
        self.montant_total
            .unwrap_or_else(|| self.lignes.iter().map(LigneReception::montant).sum())
    }

    pub fn quantite_recue(&self) -> i64 {
        self.lignes.iter().map(|l| l.quantite_recue).sum()
    }

    /// Lignes dont la quantité reçue diffère de l'attendu
    pub fn lignes_en_ecart(&self) -> impl Iterator<Item = &LigneReception> {
        self.lignes.iter().filter(|l| l.ecart() != 0)
    }
}

/// Pour créer une réception
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewReception {
    pub reference: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fournisseur_uuid: Option<Uuid>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrepot: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_reception: Option<DateTime<Utc>>,

    pub lignes: Vec<LigneReception>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Pour mettre à jour une réception
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReception {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrepot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_reception: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lignes: Option<Vec<LigneReception>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Filtres de recherche de réceptions
#[derive(Debug, Clone, Default)]
pub struct ReceptionFilters {
    pub pagination: Pagination,
    pub statut: Option<ReceptionStatut>,
    pub fournisseur_uuid: Option<Uuid>,
    pub entrepot: Option<String>,
    pub date_debut: Option<DateTime<Utc>>,
    pub date_fin: Option<DateTime<Utc>>,
    pub montant_min: Option<f64>,
    pub montant_max: Option<f64>,
}

impl ToQuery for ReceptionFilters {
    fn to_query(&self) -> QueryString {
        let mut query = self.pagination.to_query();
        query
            .push("statut", self.statut)
            .push("fournisseur_uuid", self.fournisseur_uuid)
            .push("entrepot", self.entrepot.as_deref())
            .push("date_debut", self.date_debut.map(|d| d.to_rfc3339()))
            .push("date_fin", self.date_fin.map(|d| d.to_rfc3339()))
            .push("montant_min", self.montant_min)
            .push("montant_max", self.montant_max);
        query
    }
}

/// Statistiques calculées sur un lot de réceptions
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReceptionStats {
    pub total: u64,
    pub en_attente: u64,
    pub validees: u64,
    pub rejetees: u64,
    pub annulees: u64,
    pub montant_total: i64,
    pub montant_moyen: i64,
    pub quantite_recue: i64,
    /// Réceptions avec au moins une ligne en écart
    pub avec_ecarts: u64,
    pub par_statut: Vec<GroupCount>,
    pub par_entrepot: Vec<GroupCount>,
}
