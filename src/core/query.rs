//! # Query Builder
//!
//! Transforme un jeu de filtres (pagination, tri, recherche, filtres métier)
//! en chaîne de requête.
//!
//! ## Règles
//! - Seules les valeurs définies (`Some`) sont ajoutées; `0` et `false` le sont aussi.
//! - Les listes sont envoyées sous la forme `cle[]=valeur`, une paire par élément.
//! - Une borne `_min` sans `_max` (ou l'inverse) reste valide.
//! - L'ordre des paires suit l'ordre des appels et ne fait pas partie du contrat.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Chaîne de requête construite paire par paire
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute `key=value` si la valeur est définie
    pub fn push<V: fmt::Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((key.to_string(), value.to_string()));
        }
        self
    }

    /// Ajoute une paire `key[]=value` par élément
    pub fn push_all<V: fmt::Display>(&mut self, key: &str, values: &[V]) -> &mut Self {
        let array_key = format!("{}[]", key);
        for value in values {
            self.pairs.push((array_key.clone(), value.to_string()));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Première valeur associée à `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.pairs.iter().any(|(k, v)| k == key && v == value)
    }

    /// Chaîne encodée, sans `?`
    pub fn build(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// `path` suivi de la requête si elle n'est pas vide
    pub fn append_to(&self, path: &str) -> String {
        if self.is_empty() {
            path.to_string()
        } else {
            let separator = if path.contains('?') { '&' } else { '?' };
            format!("{}{}{}", path, separator, self.build())
        }
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

/// Tout jeu de filtres sérialisable en chaîne de requête
pub trait ToQuery {
    fn to_query(&self) -> QueryString;
}

impl ToQuery for QueryString {
    fn to_query(&self) -> QueryString {
        self.clone()
    }
}

/// Sens de tri
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination, tri et recherche libre communs à toutes les listes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Pagination {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl Pagination {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn sorted(mut self, sort_by: &str, sort_order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.to_string());
        self.sort_order = Some(sort_order);
        self
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl ToQuery for Pagination {
    fn to_query(&self) -> QueryString {
        let mut query = QueryString::new();
        query
            .push("page", self.page)
            .push("limit", self.limit)
            .push("search", self.search.as_deref())
            .push("sortBy", self.sort_by.as_deref())
            .push("sortOrder", self.sort_order);
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_values_are_omitted() {
        let mut query = QueryString::new();
        query
            .push("ville", None::<&str>)
            .push("prix_min", Some(1000))
            .push("prix_max", None::<f64>);

        assert!(!query.contains_key("ville"));
        assert!(!query.contains_key("prix_max"));
        assert!(query.contains("prix_min", "1000"));
    }

    #[test]
    fn test_falsy_values_are_kept() {
        let mut query = QueryString::new();
        query.push("page", Some(0)).push("is_featured", Some(false));

        assert!(query.contains("page", "0"));
        assert!(query.contains("is_featured", "false"));
    }

    #[test]
    fn test_arrays_use_bracket_keys() {
        let mut query = QueryString::new();
        query.push_all("tags", &["piscine", "jardin"]);

        assert_eq!(query.len(), 2);
        assert!(query.contains("tags[]", "piscine"));
        assert!(query.contains("tags[]", "jardin"));
        assert!(query.build().contains("tags[]=jardin"));
    }

    #[test]
    fn test_empty_array_adds_nothing() {
        let mut query = QueryString::new();
        query.push_all::<&str>("tags", &[]);
        assert!(query.is_empty());
    }

    #[test]
    fn test_values_are_encoded() {
        let mut query = QueryString::new();
        query.push("search", Some("villa & piscine"));

        assert_eq!(query.build(), "search=villa%20%26%20piscine");
    }

    #[test]
    fn test_append_to() {
        let mut query = QueryString::new();
        assert_eq!(query.append_to("/annonces"), "/annonces");

        query.push("page", Some(2));
        assert_eq!(query.append_to("/annonces"), "/annonces?page=2");
        assert_eq!(query.append_to("/annonces?x=1"), "/annonces?x=1&page=2");
    }

    #[test]
    fn test_pagination_wire_names() {
        let query = Pagination::page(2, 10)
            .sorted("created_at", SortOrder::Desc)
            .with_search("studio")
            .to_query();

        assert!(query.contains("page", "2"));
        assert!(query.contains("limit", "10"));
        assert!(query.contains("sortBy", "created_at"));
        assert!(query.contains("sortOrder", "desc"));
        assert!(query.contains("search", "studio"));
    }

    #[test]
    fn test_float_display_matches_wire_format() {
        let mut query = QueryString::new();
        query.push("prix_min", Some(1000.0_f64)).push("surface_max", Some(72.5_f64));

        assert!(query.contains("prix_min", "1000"));
        assert!(query.contains("surface_max", "72.5"));
    }
}
