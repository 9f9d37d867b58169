//! # Derived Analytics
//!
//! Calculs purs sur une collection déjà chargée: regroupements, score de
//! similarité et distribution des prix. Les résultats ne sont pas mis à jour
//! si les données changent côté serveur; il faut les recalculer.

use crate::models::{Annonce, Article, GroupCount, PriceAnalysis, Resource, SimilarItem};
use crate::utils::helpers::round_to_i64;
use std::collections::HashMap;

/// Pondérations du score de similarité
pub const SCORE_MEME_TYPE: u32 = 30;
pub const SCORE_MEME_CATEGORIE: u32 = 25;
pub const SCORE_MEME_VILLE: u32 = 20;
pub const SCORE_PRIX_PROCHE: u32 = 15;
pub const SCORE_SURFACE_PROCHE: u32 = 10;

/// Écart relatif maximal pour considérer deux valeurs proches
pub const TOLERANCE_RELATIVE: f64 = 0.2;

/// Compte les entités par clé, en un seul passage
///
/// L'ordre du résultat suit la première apparition de chaque clé.
/// Les entités sans clé sont ignorées.
pub fn count_by<T, F>(items: &[T], key_fn: F) -> Vec<GroupCount>
where
    F: Fn(&T) -> Option<String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();

    for key in items.iter().filter_map(|item| key_fn(item)) {
        match index.get(&key) {
            Some(&position) => groups[position].count += 1,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(GroupCount { key, count: 1 });
            }
        }
    }

    groups
}

/// Caractéristiques comparées pour la similarité
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimilarityProfile {
    pub type_key: Option<String>,
    pub categorie: Option<String>,
    pub ville: Option<String>,
    pub prix: Option<f64>,
    pub surface: Option<f64>,
}

/// Entité comparable à une autre du même genre
pub trait Comparable: Resource {
    fn similarity_profile(&self) -> SimilarityProfile;
}

impl Comparable for Annonce {
    fn similarity_profile(&self) -> SimilarityProfile {
        SimilarityProfile {
            type_key: Some(self.type_annonce.as_str().to_string()),
            categorie: self.categorie_id().map(|u| u.to_string()),
            ville: self.ville.clone(),
            prix: self.prix,
            surface: self.surface,
        }
    }
}

impl Comparable for Article {
    fn similarity_profile(&self) -> SimilarityProfile {
        SimilarityProfile {
            type_key: None,
            categorie: self.categorie_id().map(|u| u.to_string()),
            ville: self.ville.clone(),
            prix: Some(self.prix),
            surface: None,
        }
    }
}

/// `|a - b|` rapporté à la moyenne des deux, dans la tolérance
fn within_tolerance(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) if a.is_finite() && b.is_finite() => {
            let moyenne = (a + b) / 2.0;
            if moyenne == 0.0 {
                return a == b;
            }
            ((a - b).abs() / moyenne.abs()) <= TOLERANCE_RELATIVE
        }
        _ => false,
    }
}

fn same_text(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}

/// Score de similarité entre deux profils (0 à 100)
pub fn similarity_score(reference: &SimilarityProfile, candidate: &SimilarityProfile) -> u32 {
    let mut score = 0;

    if same_text(&reference.type_key, &candidate.type_key) {
        score += SCORE_MEME_TYPE;
    }
    if same_text(&reference.categorie, &candidate.categorie) {
        score += SCORE_MEME_CATEGORIE;
    }
    if same_text(&reference.ville, &candidate.ville) {
        score += SCORE_MEME_VILLE;
    }
    if within_tolerance(reference.prix, candidate.prix) {
        score += SCORE_PRIX_PROCHE;
    }
    if within_tolerance(reference.surface, candidate.surface) {
        score += SCORE_SURFACE_PROCHE;
    }

    score
}

/// Classe les candidats par similarité décroissante
///
/// La référence elle-même est exclue. À score égal, l'ordre d'origine est
/// conservé (tri stable).
pub fn rank_similar<T: Comparable>(reference: &T, pool: Vec<T>, limit: usize) -> Vec<SimilarItem<T>> {
    let profile = reference.similarity_profile();
    let reference_uuid = reference.uuid();

    let mut ranked: Vec<SimilarItem<T>> = pool
        .into_iter()
        .filter(|candidate| candidate.uuid() != reference_uuid)
        .map(|candidate| {
            let score = similarity_score(&profile, &candidate.similarity_profile());
            SimilarItem { item: candidate, score }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}

/// Distribution des prix
///
/// Quartiles au rang le plus proche (`floor(n * 0.25)`, `floor(n * 0.75)`),
/// sans interpolation. Les valeurs non finies sont ignorées.
pub fn price_distribution(prices: &[f64]) -> PriceAnalysis {
    let mut sorted: Vec<f64> = prices.iter().copied().filter(|p| p.is_finite()).collect();
    if sorted.is_empty() {
        return PriceAnalysis::default();
    }

    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    let average = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let q25 = sorted[(n as f64 * 0.25).floor() as usize];
    let q75 = sorted[(n as f64 * 0.75).floor() as usize];

    PriceAnalysis {
        count: n as u64,
        average: round_to_i64(average),
        median: round_to_i64(median),
        min: round_to_i64(sorted[0]),
        max: round_to_i64(sorted[n - 1]),
        quartile_25: round_to_i64(q25),
        quartile_75: round_to_i64(q75),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    fn annonce(type_annonce: &str, categorie: Uuid, ville: &str, prix: f64, surface: f64) -> Annonce {
        serde_json::from_value(json!({
            "uuid": Uuid::new_v4(),
            "titre": "Annonce de test",
            "type_annonce": type_annonce,
            "categorie_uuid": categorie,
            "ville": ville,
            "prix": prix,
            "surface": surface
        }))
        .unwrap()
    }

    #[test]
    fn test_price_distribution_even() {
        let analysis = price_distribution(&[40.0, 10.0, 30.0, 20.0]);

        assert_eq!(
            analysis,
            PriceAnalysis {
                count: 4,
                average: 25,
                median: 25,
                min: 10,
                max: 40,
                quartile_25: 20,
                quartile_75: 40,
            }
        );
    }

    #[test]
    fn test_price_distribution_odd_and_rounding() {
        let analysis = price_distribution(&[10.4, 20.6, 30.0]);

        assert_eq!(analysis.count, 3);
        assert_eq!(analysis.median, 21);
        assert_eq!(analysis.average, 20);
        assert_eq!(analysis.min, 10);
        assert_eq!(analysis.max, 30);
        assert_eq!(analysis.quartile_25, 10);
        assert_eq!(analysis.quartile_75, 30);
    }

    #[test]
    fn test_price_distribution_empty() {
        assert_eq!(price_distribution(&[]), PriceAnalysis::default());
        assert_eq!(price_distribution(&[f64::NAN]).count, 0);
    }

    #[test]
    fn test_count_by_first_occurrence_order() {
        let villes = vec![Some("Bouaké"), Some("Abidjan"), None, Some("Bouaké")];
        let groups = count_by(&villes, |v| v.map(str::to_string));

        assert_eq!(
            groups,
            vec![
                GroupCount { key: "Bouaké".to_string(), count: 2 },
                GroupCount { key: "Abidjan".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_similarity_weights() {
        let categorie = Uuid::new_v4();
        let reference = annonce("vente", categorie, "Abidjan", 100_000.0, 100.0);
        let profile = reference.similarity_profile();

        let full = annonce("vente", categorie, "abidjan", 110_000.0, 90.0);
        assert_eq!(similarity_score(&profile, &full.similarity_profile()), 100);

        let far = annonce("location", Uuid::new_v4(), "Yamoussoukro", 200_000.0, 300.0);
        assert_eq!(similarity_score(&profile, &far.similarity_profile()), 0);
    }

    #[test]
    fn test_similarity_reads_embedded_categorie() {
        let categorie = Uuid::new_v4();
        let embarquee = |ville: &str| -> Annonce {
            serde_json::from_value(json!({
                "uuid": Uuid::new_v4(),
                "titre": "Annonce de test",
                "type_annonce": "vente",
                "categorie": { "uuid": categorie, "nom": "Immobilier" },
                "ville": ville
            }))
            .unwrap()
        };

        let reference = embarquee("Abidjan");
        let candidate = embarquee("Abidjan");
        assert_eq!(reference.categorie_id(), Some(categorie));
        assert_eq!(similarity_score(&reference.similarity_profile(), &candidate.similarity_profile()), 75);

        // UUID seul d'un côté, catégorie embarquée de l'autre
        let plate = annonce("vente", categorie, "Abidjan", 1.0, 1.0);
        assert_eq!(similarity_score(&plate.similarity_profile(), &candidate.similarity_profile()), 75);
    }

    #[test]
    fn test_price_tolerance_uses_pairwise_average() {
        // |100 - 122| / 111 ≈ 0.198
        assert!(within_tolerance(Some(100.0), Some(122.0)));
        // |100 - 125| / 112.5 ≈ 0.222
        assert!(!within_tolerance(Some(100.0), Some(125.0)));
        assert!(!within_tolerance(Some(100.0), None));
    }

    #[test]
    fn test_rank_similar_orders_and_excludes_reference() {
        let categorie = Uuid::new_v4();
        let reference = annonce("vente", categorie, "Abidjan", 1.0, 1.0);

        let type_only = annonce("vente", Uuid::new_v4(), "Korhogo", 500.0, 500.0);
        let strong = annonce("vente", categorie, "Abidjan", 500.0, 500.0);
        let tie = annonce("vente", Uuid::new_v4(), "San-Pédro", 900.0, 900.0);

        let pool = vec![type_only.clone(), reference.clone(), strong.clone(), tie.clone()];
        let ranked = rank_similar(&reference, pool, 10);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].item.uuid, strong.uuid);
        assert_eq!(ranked[0].score, 75);
        // égalité à 30: ordre d'origine conservé
        assert_eq!(ranked[1].item.uuid, type_only.uuid);
        assert_eq!(ranked[2].item.uuid, tie.uuid);

        let truncated = rank_similar(&reference, vec![type_only, strong], 1);
        assert_eq!(truncated.len(), 1);
        assert_eq!(truncated[0].score, 75);
    }
}
