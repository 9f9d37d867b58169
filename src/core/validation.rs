//! # Validation Helper
//!
//! Vérifie un brouillon avant soumission, sans appel réseau.
//!
//! - **errors**: bloquent la soumission
//! - **warnings**: signaux qualité, non bloquants
//! - **suggestions**: améliorations facultatives
//!
//! Le rapport est consultatif: c'est à l'appelant de décider s'il bloque.

use crate::models::{NewAnnonce, NewArticle, NewPromotion, TypeAnnonce, TypeReduction, ValidationReport};
use crate::utils::helpers::char_len;
use crate::utils::validation::{
    validate_non_empty_string, validate_percentage,
    validate_positive_number, validation_message,
};
use validator::Validate;

/// Nombre de photos en dessous duquel on suggère d'en ajouter
pub const PHOTOS_RECOMMANDEES: usize = 3;

/// Longueur de description en dessous de laquelle on avertit
pub const DESCRIPTION_DETAILLEE: usize = 100;

/// Collecte les messages d'un rapport en cours de construction
#[derive(Default)]
struct ReportBuilder {
    errors: Vec<String>,
    warnings: Vec<String>,
    suggestions: Vec<String>,
}

impl ReportBuilder {
    fn check(&mut self, result: crate::utils::error::Result<()>) {
        if let Err(e) = result {
            self.errors.push(validation_message(e));
        }
    }

    /// Règles déclarées par `#[validate(...)]`, un message par erreur
    fn check_rules<T: Validate>(&mut self, draft: &T) {
        if let Err(errors) = draft.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by_key(|(field, _)| *field);

            for (field, field_errors) in fields {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} invalide", field));
                    self.errors.push(message);
                }
            }
        }
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn warn(&mut self, message: &str) {
        self.warnings.push(message.to_string());
    }

    fn suggest(&mut self, message: &str) {
        self.suggestions.push(message.to_string());
    }

    fn finish(self) -> ValidationReport {
        ValidationReport::new(self.errors, self.warnings, self.suggestions)
    }
}

/// Valide un brouillon d'annonce
pub fn validate_annonce(draft: &NewAnnonce) -> ValidationReport {
    let mut report = ReportBuilder::default();

    report.check_rules(draft);
    if let Some(prix) = draft.prix {
        report.check(validate_positive_number(prix, "Le prix"));
    }
    if let Some(surface) = draft.surface {
        report.check(validate_positive_number(surface, "La surface"));
    }
    report.check(validate_non_empty_string(&draft.ville, "La ville"));
    if draft.categorie_uuid.is_none() {
        report.error("La catégorie est obligatoire");
    }

    if draft.images.is_empty() {
        report.warn("Aucune image: les annonces sans photo sont beaucoup moins consultées");
    }
    if draft.prix.is_none() && draft.type_annonce == TypeAnnonce::Vente {
        report.warn("Aucun prix indiqué pour une vente");
    }
    let description = char_len(&draft.description);
    if description >= 20 && description < DESCRIPTION_DETAILLEE {
        report.warn("Description courte: détaillez l'état, les équipements et l'accès");
    }

    if draft.images.len() < PHOTOS_RECOMMANDEES {
        report.suggest("Ajoutez plus de photos (au moins 3)");
    }
    if draft.tags.is_empty() {
        report.suggest("Ajoutez des mots-clés pour améliorer la recherche");
    }
    if draft.quartier.is_none() {
        report.suggest("Précisez le quartier");
    }

    report.finish()
}

/// Valide un brouillon d'article
pub fn validate_article(draft: &NewArticle) -> ValidationReport {
    let mut report = ReportBuilder::default();

    report.check_rules(draft);
    report.check(validate_positive_number(draft.prix, "Le prix"));
    if draft.quantite_stock < 0 {
        report.error("Le stock ne peut pas être négatif");
    }

    if draft.images.is_empty() {
        report.warn("Aucune image pour cet article");
    }
    if draft.quantite_stock == 0 {
        report.warn("Article créé en rupture de stock");
    }
    if draft.categorie_uuid.is_none() {
        report.warn("Sans catégorie, l'article n'apparaîtra pas dans les rayons");
    }

    if draft.images.len() < PHOTOS_RECOMMANDEES {
        report.suggest("Ajoutez plus de photos (au moins 3)");
    }
    if draft.tags.is_empty() {
        report.suggest("Ajoutez des mots-clés pour améliorer la recherche");
    }

    report.finish()
}

/// Valide un brouillon de promotion
pub fn validate_promotion(draft: &NewPromotion) -> ValidationReport {
    let mut report = ReportBuilder::default();

    report.check_rules(draft);
    report.check(validate_positive_number(draft.valeur, "La valeur de la réduction"));
    if draft.type_reduction == TypeReduction::Pourcentage {
        report.check(validate_percentage(draft.valeur, "Le pourcentage de réduction"));
    }
    if let (Some(debut), Some(fin)) = (draft.date_debut, draft.date_fin) {
        if fin <= debut {
            report.error("La date de fin doit être postérieure à la date de début");
        }
    }
    if draft.utilisations_max == Some(0) {
        report.error("Le nombre d'utilisations maximum doit être positif");
    }

    if draft.article_uuids.is_empty() && draft.annonce_uuid.is_none() {
        report.warn("La promotion ne cible aucun article ni aucune annonce");
    }
    if draft.date_fin.is_none() {
        report.warn("Promotion sans date de fin");
    }

    if draft.code.is_none() {
        report.suggest("Ajoutez un code pour suivre les utilisations");
    }

    report.finish()
}
