// services/endpoints.rs
//! Routes de l'API, relatives à l'URL de base

use uuid::Uuid;

pub mod annonces {
    use super::Uuid;

    pub const COLLECTION: &str = "/annonces";
    pub const PUBLISHED: &str = "/annonces/publiees";
    pub const FEATURED: &str = "/annonces/featured";
    pub const URGENT: &str = "/annonces/urgentes";
    pub const PENDING: &str = "/annonces/en-attente";
    pub const POPULAR: &str = "/annonces/populaires";
    pub const SEARCH: &str = "/annonces/recherche";
    pub const EXPORT_CSV: &str = "/annonces/export/csv";

    pub fn detail(uuid: Uuid) -> String {
        format!("{}/{}", COLLECTION, uuid)
    }

    pub fn action(uuid: Uuid, action: &str) -> String {
        format!("{}/{}/{}", COLLECTION, uuid, action)
    }

    pub fn by_utilisateur(uuid: Uuid) -> String {
        format!("/utilisateurs/{}/annonces", uuid)
    }

    pub fn by_categorie(uuid: Uuid) -> String {
        format!("/categories/{}/annonces", uuid)
    }

    pub fn export_pdf(uuid: Uuid) -> String {
        action(uuid, "export/pdf")
    }
}

pub mod articles {
    use super::Uuid;

    pub const COLLECTION: &str = "/articles";
    pub const PUBLISHED: &str = "/articles/publies";
    pub const FEATURED: &str = "/articles/featured";
    pub const POPULAR: &str = "/articles/populaires";
    pub const LOW_STOCK: &str = "/articles/stock-faible";
    pub const SEARCH: &str = "/articles/recherche";
    pub const EXPORT_CSV: &str = "/articles/export/csv";

    pub fn detail(uuid: Uuid) -> String {
        format!("{}/{}", COLLECTION, uuid)
    }

    pub fn action(uuid: Uuid, action: &str) -> String {
        format!("{}/{}/{}", COLLECTION, uuid, action)
    }

    pub fn by_vendeur(uuid: Uuid) -> String {
        format!("/vendeurs/{}/articles", uuid)
    }

    pub fn by_categorie(uuid: Uuid) -> String {
        format!("/categories/{}/articles", uuid)
    }
}

pub mod promotions {
    use super::Uuid;

    pub const COLLECTION: &str = "/promotions";
    pub const ACTIVE: &str = "/promotions/actives";
    pub const SEARCH: &str = "/promotions/recherche";

    pub fn detail(uuid: Uuid) -> String {
        format!("{}/{}", COLLECTION, uuid)
    }

    pub fn action(uuid: Uuid, action: &str) -> String {
        format!("{}/{}/{}", COLLECTION, uuid, action)
    }

    pub fn by_article(uuid: Uuid) -> String {
        format!("/articles/{}/promotions", uuid)
    }

    pub fn by_code(code: &str) -> String {
        format!("{}/code/{}", COLLECTION, urlencoding::encode(code))
    }
}

pub mod receptions {
    use super::Uuid;

    pub const COLLECTION: &str = "/receptions";
    pub const PENDING: &str = "/receptions/en-attente";
    pub const EXPORT_CSV: &str = "/receptions/export/csv";

    pub fn detail(uuid: Uuid) -> String {
        format!("{}/{}", COLLECTION, uuid)
    }

    pub fn action(uuid: Uuid, action: &str) -> String {
        format!("{}/{}/{}", COLLECTION, uuid, action)
    }

    pub fn by_fournisseur(uuid: Uuid) -> String {
        format!("/fournisseurs/{}/receptions", uuid)
    }

    pub fn export_pdf(uuid: Uuid) -> String {
        action(uuid, "export/pdf")
    }
}
