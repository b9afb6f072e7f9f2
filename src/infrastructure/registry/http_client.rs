//! reqwest implementation of the registry client

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ApiConfig;
use crate::domain::{
    EnumeratedOptionSet, ModelFields, ModelId, ModelRecord, ModelRegistryClient, QueryState,
    RemoteError,
};

/// Talks to the registry REST API under `{base_url}/api/models`
#[derive(Debug, Clone)]
pub struct HttpModelRegistryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpModelRegistryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::new(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: normalize_base_url(base_url.into()),
            client,
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, RemoteError> {
        match config.timeout() {
            Some(timeout) => Self::with_timeout(&config.base_url, timeout),
            None => Ok(Self::new(&config.base_url)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn models_url(&self) -> String {
        format!("{}/api/models", self.base_url)
    }

    fn model_url(&self, id: ModelId) -> String {
        format!("{}/api/models/{}", self.base_url, id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request.send().await.map_err(RemoteError::transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response.text().await.unwrap_or_default();
            return Err(RemoteError::status(status.as_u16(), error_body));
        }

        response.json().await.map_err(RemoteError::decode)
    }
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

#[async_trait]
impl ModelRegistryClient for HttpModelRegistryClient {
    async fn create(&self, fields: &ModelFields) -> Result<ModelRecord, RemoteError> {
        debug!(name = %fields.name, "POST /api/models");
        self.send(self.client.post(self.models_url()).json(fields))
            .await
    }

    async fn list_all(&self, query: &QueryState) -> Result<Vec<ModelRecord>, RemoteError> {
        let params = query.to_params();
        debug!(?params, "GET /api/models");

        let mut request = self.client.get(self.models_url());
        if !params.is_empty() {
            request = request.query(&params);
        }

        self.send(request).await
    }

    async fn get_by_id(&self, id: ModelId) -> Result<ModelRecord, RemoteError> {
        debug!(%id, "GET /api/models/{{id}}");
        self.send(self.client.get(self.model_url(id))).await
    }

    async fn get_enumerated_options(&self) -> Result<EnumeratedOptionSet, RemoteError> {
        debug!("GET /api/models/enums");
        self.send(self.client.get(format!("{}/enums", self.models_url())))
            .await
    }

    async fn update(&self, id: ModelId, fields: &ModelFields) -> Result<ModelRecord, RemoteError> {
        debug!(%id, name = %fields.name, "PUT /api/models/{{id}}");
        self.send(self.client.put(self.model_url(id)).json(fields))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::fixtures::{pd_model_fields, record};
    use crate::domain::{BusinessLine, SortField, Status};
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record_json(id: u64) -> serde_json::Value {
        serde_json::to_value(record(id, pd_model_fields())).unwrap()
    }

    #[tokio::test]
    async fn test_create_posts_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/models"))
            .and(body_json(serde_json::to_value(pd_model_fields()).unwrap()))
            .respond_with(ResponseTemplate::new(201).set_body_json(record_json(12)))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(format!("{}/", server.uri()));
        let created = client.create(&pd_model_fields()).await.unwrap();

        assert_eq!(created.id().value(), 12);
        assert_eq!(created.fields(), &pd_model_fields());
    }

    #[tokio::test]
    async fn test_list_all_without_query_sends_no_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param_is_missing("search"))
            .and(query_param_is_missing("sortBy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([record_json(1), record_json(2)])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let models = client.list_all(&QueryState::new()).await.unwrap();

        assert_eq!(models.len(), 2);
    }

    #[tokio::test]
    async fn test_list_all_keeps_records_with_unrecognised_codes() {
        let mut treasury = record_json(2);
        treasury["businessLine"] = serde_json::json!("TREASURY");
        treasury["businessLineDisplayName"] = serde_json::json!("Treasury");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([record_json(1), treasury])),
            )
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let models = client.list_all(&QueryState::new()).await.unwrap();

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].business_line(), &BusinessLine::RetailBanking);
        assert_eq!(
            models[1].business_line(),
            &BusinessLine::Other("TREASURY".to_string())
        );
        assert_eq!(
            models[1].labels().business_line_display_name.as_deref(),
            Some("Treasury")
        );
    }

    #[tokio::test]
    async fn test_list_all_delegates_search_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .and(query_param("search", "risk"))
            .and(query_param("sortBy", "modelName"))
            .and(query_param("sortDir", "asc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut query = QueryState::new();
        query.set_search_term("risk");
        query.toggle_sort(SortField::Name);

        let client = HttpModelRegistryClient::new(server.uri());
        assert!(client.list_all(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models/99"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let err = client.get_by_id(ModelId::new(99).unwrap()).await.unwrap_err();

        assert_eq!(err.message(), "HTTP 404");
    }

    #[tokio::test]
    async fn test_get_enumerated_options() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models/enums"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::to_value(EnumeratedOptionSet::standard()).unwrap()),
            )
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let options = client.get_enumerated_options().await.unwrap();

        assert_eq!(options, EnumeratedOptionSet::standard());
    }

    #[tokio::test]
    async fn test_update_puts_fields() {
        let mut fields = pd_model_fields();
        fields.status = Status::Validated;

        let mut updated = record_json(4);
        updated["status"] = serde_json::json!("VALIDATED");

        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/models/4"))
            .and(body_json(serde_json::to_value(&fields).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(updated))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let record = client.update(ModelId::new(4).unwrap(), &fields).await.unwrap();

        assert_eq!(record.status(), &Status::Validated);
    }

    #[tokio::test]
    async fn test_server_error_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Model name is required"))
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let err = client.create(&pd_model_fields()).await.unwrap_err();

        assert!(err.message().contains("400"));
        assert!(err.message().contains("Model name is required"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_remote_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = HttpModelRegistryClient::new(server.uri());
        let err = client.list_all(&QueryState::new()).await.unwrap_err();

        assert!(err.message().starts_with("Failed to parse response"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_remote_error() {
        let client =
            HttpModelRegistryClient::with_timeout("http://127.0.0.1:1", Duration::from_secs(2))
                .unwrap();

        let err = client.list_all(&QueryState::new()).await.unwrap_err();

        assert!(err.message().starts_with("Request failed"));
    }
}
