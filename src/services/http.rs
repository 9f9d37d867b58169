// services/http.rs
use crate::utils::config::ClientConfig;
use crate::utils::error::{AppError, Result};
use crate::utils::helpers::truncate_string;
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, RequestBuilder, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Transport HTTP vers l'API
///
/// Les chemins sont relatifs à l'URL de base et peuvent porter une requête.
/// Une réponse non 2xx devient `AppError::Http` avec le corps JSON renvoyé.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value>;

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value>;

    async fn delete(&self, path: &str) -> Result<Value>;

    /// Contenu binaire (PDF, CSV), transmis tel quel
    async fn get_blob(&self, path: &str) -> Result<Vec<u8>>;
}

/// Client `reqwest` de l'API
#[derive(Clone)]
pub struct ApiClient {
    http_client: Arc<HttpClient>,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client: Arc::new(http_client),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http_client
            .request(method, self.url(path))
            .header("Accept", "application/json");

        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Envoie la requête et sépare succès et erreur HTTP
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> Result<Response> {
        info!("➡️ {} {}", method, path);

        let mut builder = self.request(method.clone(), path);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("❌ {} {}: {}", method, path, e);
            AppError::Network(e.to_string())
        })?;

        let status = response.status();
        if status.is_success() {
            info!("✅ {} {} -> {}", method, path, status.as_u16());
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let payload = serde_json::from_str::<Value>(&text).ok().or_else(|| {
            (!text.trim().is_empty()).then(|| Value::String(truncate_string(&text, 500)))
        });
        let err = AppError::from_response(status.as_u16(), payload);

        error!(
            status = status.as_u16(),
            payload = ?err.payload(),
            "❌ {} {}: {}", method, path, err
        );
        Err(err)
    }

    async fn send_json(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let response = self.send(method, path, body).await?;
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| AppError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl HttpTransport for ApiClient {
    async fn get(&self, path: &str) -> Result<Value> {
        self.send_json(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send_json(Method::POST, path, body).await
    }

    async fn put(&self, path: &str, body: Option<Value>) -> Result<Value> {
        self.send_json(Method::PUT, path, body).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.send_json(Method::DELETE, path, None).await
    }

    async fn get_blob(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path, None).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&ClientConfig::new(&server.uri()).with_token("secret")).unwrap()
    }

    #[tokio::test]
    async fn test_get_sends_token_and_parses_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/annonces"))
            .and(query_param("page", "2"))
            .and(header("Authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;

        let body = client(&server).await.get("/annonces?page=2").await.unwrap();
        assert_eq!(body, json!([1, 2]));
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/annonces"))
            .and(body_json(json!({ "titre": "Studio" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "ok": true })))
            .mount(&server)
            .await;

        let body = client(&server)
            .await
            .post("/annonces", Some(json!({ "titre": "Studio" })))
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let body = client(&server).await.delete("/annonces/x").await.unwrap();
        assert!(body.is_null());
    }

    #[tokio::test]
    async fn test_error_keeps_backend_payload() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({ "message": "Prix invalide", "errors": { "prix": ["min"] } })),
            )
            .mount(&server)
            .await;

        let err = client(&server).await.put("/annonces/x", None).await.unwrap_err();

        assert_eq!(err.status(), Some(422));
        assert_eq!(err.to_string(), "Prix invalide");
        assert_eq!(err.payload().unwrap()["errors"]["prix"][0], "min");
    }

    #[tokio::test]
    async fn test_network_error() {
        let config = ClientConfig::new("http://127.0.0.1:9");
        let err = ApiClient::new(&config).unwrap().get("/annonces").await.unwrap_err();

        assert!(matches!(err, AppError::Network(_)));
    }

    #[tokio::test]
    async fn test_get_blob() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/annonces/export/csv"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"uuid;titre\n".to_vec()))
            .mount(&server)
            .await;

        let bytes = client(&server).await.get_blob("/annonces/export/csv").await.unwrap();
        assert_eq!(bytes, b"uuid;titre\n".to_vec());
    }
}
