//! # Response Unwrapper
//!
//! Normalise les différentes enveloppes renvoyées par l'API.
//!
//! ## Formes de liste reconnues (la première qui correspond l'emporte)
//! 1. tableau nu: `[...]`
//! 2. `{ "data": [...], "count"?, "total"?, "page"?, "pages"? }`
//! 3. `{ "<entités>": [...], ... }` (ex. `annonces`)
//!
//! Une liste de forme inconnue donne une liste vide et un avertissement,
//! jamais une erreur. Une entité seule, elle, ne peut pas être devinée:
//! `decode_entity` échoue si aucune forme ne correspond.

use crate::models::{PaginatedResponse, Resource};
use crate::utils::error::{AppError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

/// Métadonnées de pagination telles que fournies par l'API
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvelopeMeta {
    pub count: Option<u64>,
    pub total: Option<u64>,
    pub page: Option<u64>,
    pub pages: Option<u64>,
}

impl EnvelopeMeta {
    fn read(object: &Map<String, Value>) -> Self {
        Self {
            count: meta_field(object, "count"),
            total: meta_field(object, "total"),
            page: meta_field(object, "page"),
            pages: meta_field(object, "pages"),
        }
    }
}

/// Forme reconnue d'une réponse de liste
#[derive(Debug, Clone, PartialEq)]
pub enum ListEnvelope {
    Bare(Vec<Value>),
    Wrapped {
        key: String,
        items: Vec<Value>,
        meta: EnvelopeMeta,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    #[error("expected an array or an object, got {0}")]
    NotAnObject(&'static str),

    #[error("no list found under any of: {}", keys.join(", "))]
    MissingList { keys: Vec<String> },
}

/// Reconnaît la forme d'une réponse de liste
pub fn decode_list(body: &Value, collection_key: &str) -> std::result::Result<ListEnvelope, ShapeError> {
    let object = match body {
        Value::Array(items) => return Ok(ListEnvelope::Bare(items.clone())),
        Value::Object(object) => object,
        other => return Err(ShapeError::NotAnObject(json_kind(other))),
    };

    for key in ["data", collection_key] {
        if let Some(Value::Array(items)) = object.get(key) {
            return Ok(ListEnvelope::Wrapped {
                key: key.to_string(),
                items: items.clone(),
                meta: EnvelopeMeta::read(object),
            });
        }
    }

    Err(ShapeError::MissingList {
        keys: vec!["data".to_string(), collection_key.to_string()],
    })
}

/// Normalise une réponse de liste en `PaginatedResponse`
///
/// Les éléments qui ne se désérialisent pas en `T` sont ignorés avec un
/// avertissement; le reste de la page est conservé.
pub fn normalize_list<T: DeserializeOwned>(body: Value, collection_key: &str) -> PaginatedResponse<T> {
    let envelope = match decode_list(&body, collection_key) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(
                collection = collection_key,
                error = %e,
                "⚠️ Structure de réponse inattendue, liste vide retournée"
            );
            return PaginatedResponse::empty();
        }
    };

    match envelope {
        ListEnvelope::Bare(raw) => PaginatedResponse::from_items(decode_items(raw, collection_key)),
        ListEnvelope::Wrapped { key, items: raw, meta } => {
            let items: Vec<T> = decode_items(raw, collection_key);
            let count = meta.count.unwrap_or(items.len() as u64);
            if meta.total.is_none() {
                debug!(collection = collection_key, key = %key, count, "total absent, repli sur count");
            }

            PaginatedResponse {
                count,
                total: meta.total.unwrap_or(count),
                page: meta.page.unwrap_or(1),
                pages: meta.pages.unwrap_or(1),
                items,
            }
        }
    }
}

#[derive(Deserialize)]
struct DataWrapper<T> {
    data: Option<T>,
}

/// Décode une entité seule, enveloppée (`{ "data": {...} }`) ou directe
pub fn decode_entity<T: Resource>(body: Value) -> Result<T> {
    if body.is_null() {
        return Err(AppError::NotFound(format!("{}: réponse vide", T::NAME)));
    }

    let entity = if body.get("data").is_some() {
        match serde_json::from_value::<DataWrapper<T>>(body) {
            Ok(DataWrapper { data: Some(entity) }) => entity,
            Ok(DataWrapper { data: None }) => {
                return Err(AppError::NotFound(format!("{}: data vide", T::NAME)));
            }
            Err(e) => {
                return Err(AppError::InvalidStructure(format!("{}: {}", T::NAME, e)));
            }
        }
    } else {
        serde_json::from_value::<T>(body)
            .map_err(|e| AppError::InvalidStructure(format!("{}: {}", T::NAME, e)))?
    };

    if entity.uuid().is_nil() {
        return Err(AppError::InvalidStructure(format!("{}: uuid manquant", T::NAME)));
    }

    Ok(entity)
}

fn decode_items<T: DeserializeOwned>(raw: Vec<Value>, collection_key: &str) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(collection = collection_key, index, error = %e, "Élément ignoré");
                None
            }
        })
        .collect()
}

fn meta_field(object: &Map<String, Value>, key: &str) -> Option<u64> {
    match object.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
