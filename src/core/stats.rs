// core/stats.rs
use crate::core::analytics::count_by;
use crate::models::{
    Annonce, AnnonceStats, AnnonceStatut, Article, ArticleStats, ArticleStatut,
    Promotion, PromotionStats, PromotionStatut, Reception, ReceptionStats,
    ReceptionStatut, TypeReduction,
};
use crate::utils::helpers::{calculate_percentage, round_to_i64};

fn mean(values: &[f64]) -> i64 {
    if values.is_empty() {
        return 0;
    }
    round_to_i64(values.iter().sum::<f64>() / values.len() as f64)
}

/// Statistiques d'un lot d'annonces (par statut, type, catégorie et ville)
pub fn annonce_stats(annonces: &[Annonce]) -> AnnonceStats {
    let count_statut = |statut: AnnonceStatut| {
        annonces.iter().filter(|a| a.statut == statut).count() as u64
    };

    let total = annonces.len() as u64;
    let publiees = count_statut(AnnonceStatut::Publie);
    let total_vues: u64 = annonces.iter().map(|a| a.nombre_vues).sum();
    let prix: Vec<f64> = annonces.iter().filter_map(|a| a.prix).collect();

    AnnonceStats {
        total,
        brouillons: count_statut(AnnonceStatut::Brouillon),
        en_attente: count_statut(AnnonceStatut::EnAttente),
        publiees,
        bloquees: count_statut(AnnonceStatut::Bloque),
        archivees: count_statut(AnnonceStatut::Archive),
        featured: annonces.iter().filter(|a| a.is_featured).count() as u64,
        urgentes: annonces.iter().filter(|a| a.is_urgent).count() as u64,
        total_vues,
        vues_moyennes: if total == 0 { 0 } else { round_to_i64(total_vues as f64 / total as f64) },
        prix_moyen: mean(&prix),
        taux_publication: calculate_percentage(publiees, total),
        par_statut: count_by(annonces, |a| Some(a.statut.to_string())),
        par_type: count_by(annonces, |a| Some(a.type_annonce.to_string())),
        par_categorie: count_by(annonces, Annonce::categorie_label),
        par_ville: count_by(annonces, |a| a.ville.clone()),
    }
}

/// Statistiques d'un lot d'articles
pub fn article_stats(articles: &[Article]) -> ArticleStats {
    let prix: Vec<f64> = articles.iter().map(|a| a.prix).collect();

    ArticleStats {
        total: articles.len() as u64,
        publies: articles.iter().filter(|a| a.statut == ArticleStatut::Publie).count() as u64,
        bloques: articles.iter().filter(|a| a.statut == ArticleStatut::Bloque).count() as u64,
        en_rupture: articles.iter().filter(|a| !a.in_stock()).count() as u64,
        stock_total: articles.iter().map(|a| a.quantite_stock.max(0)).sum(),
        valeur_stock: round_to_i64(articles.iter().map(Article::stock_value).sum()),
        prix_moyen: mean(&prix),
        total_vues: articles.iter().map(|a| a.nombre_vues).sum(),
        par_statut: count_by(articles, |a| Some(a.statut.to_string())),
        par_categorie: count_by(articles, Article::categorie_label),
    }
}

/// Statistiques d'un lot de promotions
pub fn promotion_stats(promotions: &[Promotion]) -> PromotionStats {
    let count_statut = |statut: PromotionStatut| {
        promotions.iter().filter(|p| p.statut == statut).count() as u64
    };
    let pourcentages: Vec<f64> = promotions
        .iter()
        .filter(|p| p.type_reduction == TypeReduction::Pourcentage)
        .map(|p| p.valeur)
        .collect();

    PromotionStats {
        total: promotions.len() as u64,
        actives: count_statut(PromotionStatut::Active),
        suspendues: count_statut(PromotionStatut::Suspendue),
        expirees: count_statut(PromotionStatut::Expiree),
        epuisees: promotions.iter().filter(|p| p.is_exhausted()).count() as u64,
        utilisations_totales: promotions.iter().map(|p| p.utilisations).sum(),
        reduction_moyenne_pourcentage: mean(&pourcentages),
        par_statut: count_by(promotions, |p| Some(p.statut.to_string())),
        par_type: count_by(promotions, |p| Some(p.type_reduction.to_string())),
    }
}

/// Statistiques d'un lot de réceptions
pub fn reception_stats(receptions: &[Reception]) -> ReceptionStats {
    let count_statut = |statut: ReceptionStatut| {
        receptions.iter().filter(|r| r.statut == statut).count() as u64
    };
    let montants: Vec<f64> = receptions.iter().map(Reception::montant).collect();

    ReceptionStats {
        total: receptions.len() as u64,
        en_attente: count_statut(ReceptionStatut::EnAttente),
        validees: count_statut(ReceptionStatut::Validee),
        rejetees: count_statut(ReceptionStatut::Rejetee),
        annulees: count_statut(ReceptionStatut::Annulee),
        montant_total: round_to_i64(montants.iter().sum()),
        montant_moyen: mean(&montants),
        quantite_recue: receptions.iter().map(Reception::quantite_recue).sum(),
        avec_ecarts: receptions
            .iter()
            .filter(|r| r.lignes_en_ecart().next().is_some())
            .count() as u64,
        par_statut: count_by(receptions, |r| Some(r.statut.to_string())),
        par_entrepot: count_by(receptions, |r| r.entrepot.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupCount;
    use serde_json::json;
    use uuid::Uuid;

    fn annonce(statut: &str, ville: &str, prix: Option<f64>, vues: u64) -> Annonce {
        serde_json::from_value(json!({
            "uuid": Uuid::new_v4(),
            "titre": "Annonce",
            "statut": statut,
            "ville": ville,
            "prix": prix,
            "nombre_vues": vues,
            "categorie": { "uuid": Uuid::new_v4(), "nom": "Immobilier" }
        }))
        .unwrap()
    }

    #[test]
    fn test_annonce_stats() {
        let annonces = vec![
            annonce("publie", "Abidjan", Some(100.0), 10),
            annonce("publie", "Bouaké", Some(200.0), 5),
            annonce("en_attente", "Abidjan", None, 0),
            annonce("bloque", "Abidjan", Some(301.0), 1),
        ];

        let stats = annonce_stats(&annonces);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.publiees, 2);
        assert_eq!(stats.en_attente, 1);
        assert_eq!(stats.bloquees, 1);
        assert_eq!(stats.total_vues, 16);
        assert_eq!(stats.vues_moyennes, 4);
        assert_eq!(stats.prix_moyen, 200);
        assert_eq!(stats.taux_publication, 50.0);
        assert_eq!(
            stats.par_ville,
            vec![
                GroupCount { key: "Abidjan".to_string(), count: 3 },
                GroupCount { key: "Bouaké".to_string(), count: 1 },
            ]
        );
        assert_eq!(stats.par_categorie, vec![GroupCount { key: "Immobilier".to_string(), count: 4 }]);
        assert_eq!(stats.par_statut[0], GroupCount { key: "publie".to_string(), count: 2 });
    }

    #[test]
    fn test_empty_stats_do_not_divide_by_zero() {
        let stats = annonce_stats(&[]);
        assert_eq!(stats, AnnonceStats::default());

        assert_eq!(reception_stats(&[]).montant_moyen, 0);
        assert_eq!(article_stats(&[]).prix_moyen, 0);
        assert_eq!(promotion_stats(&[]).reduction_moyenne_pourcentage, 0);
    }

    #[test]
    fn test_reception_stats() {
        let receptions: Vec<Reception> = serde_json::from_value(json!([
            {
                "uuid": Uuid::new_v4(), "reference": "BR-1", "statut": "validee", "entrepot": "Yopougon",
                "montant_total": 1000,
                "lignes": [{ "designation": "Riz", "quantite_attendue": 10, "quantite_recue": 9, "prix_unitaire": 100 }]
            },
            {
                "uuid": Uuid::new_v4(), "reference": "BR-2", "statut": "en_attente", "entrepot": "Yopougon",
                "lignes": [{ "designation": "Huile", "quantite_attendue": 2, "quantite_recue": 2, "prix_unitaire": 1500 }]
            }
        ]))
        .unwrap();

        let stats = reception_stats(&receptions);
        assert_eq!(stats.total, 2);
        assert_eq!(stats.validees, 1);
        assert_eq!(stats.montant_total, 4000);
        assert_eq!(stats.montant_moyen, 2000);
        assert_eq!(stats.quantite_recue, 11);
        assert_eq!(stats.avec_ecarts, 1);
        assert_eq!(stats.par_entrepot, vec![GroupCount { key: "Yopougon".to_string(), count: 2 }]);
    }
}
