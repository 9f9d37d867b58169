use serde::{Deserialize, Serialize};

/// Nombre d'entités partageant une même valeur de regroupement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

/// Distribution des prix d'un lot, valeurs arrondies à l'entier
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceAnalysis {
    pub count: u64,
    pub average: i64,
    pub median: i64,
    pub min: i64,
    pub max: i64,
    pub quartile_25: i64,
    pub quartile_75: i64,
}

/// Candidat classé par score de similarité
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarItem<T> {
    pub item: T,
    pub score: u32,
}

/// Résultat d'une validation avant soumission
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Bloquent la soumission
    pub errors: Vec<String>,
    /// Signaux qualité non bloquants
    pub warnings: Vec<String>,
    /// Améliorations facultatives
    pub suggestions: Vec<String>,
}

impl ValidationReport {
    pub fn new(errors: Vec<String>, warnings: Vec<String>, suggestions: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            suggestions,
        }
    }
}
