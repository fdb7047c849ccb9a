use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::graphql::{GraphQlQuery, GraphQlRequest, GraphQlResponse};

/// Errors raised while querying the CMS
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("failed to reach the CMS: {0}")]
    Request(#[from] reqwest::Error),

    #[error("CMS responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Errors reported inside a GraphQL response, joined in order
    #[error("{}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },

    #[error("CMS response contained no data")]
    MissingData,

    #[error("failed to decode CMS response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Per-call options for a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Ask for draft (unpublished) content
    pub include_drafts: bool,
}

impl QueryOptions {
    pub fn drafts(include_drafts: bool) -> Self {
        Self { include_drafts }
    }
}

/// Sends typed GraphQL queries to the CMS.
///
/// The returned futures are `Send` so axum handlers can await them.
pub trait QueryExecutor: Send + Sync {
    fn execute_with<Q: GraphQlQuery>(
        &self,
        variables: &Q::Variables,
        options: QueryOptions,
    ) -> impl Future<Output = Result<Q::Response, CmsError>> + Send;

    fn execute<Q: GraphQlQuery>(
        &self,
        variables: &Q::Variables,
    ) -> impl Future<Output = Result<Q::Response, CmsError>> + Send {
        self.execute_with::<Q>(variables, QueryOptions::default())
    }
}

/// DatoCMS Content Delivery API client
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    endpoint: String,
    api_token: String,
    environment: Option<String>,
}

impl CmsClient {
    pub fn new(config: &Config) -> Result<Self, CmsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.cms_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.cms_endpoint.clone(),
            api_token: config.cms_api_token.clone(),
            environment: config.cms_environment.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl QueryExecutor for CmsClient {
    fn execute_with<Q: GraphQlQuery>(
        &self,
        variables: &Q::Variables,
        options: QueryOptions,
    ) -> impl Future<Output = Result<Q::Response, CmsError>> + Send {
        async move {
            debug!(
                "Querying CMS: {} (drafts: {})",
                Q::OPERATION_NAME,
                options.include_drafts
            );

            let mut request = self
                .http
                .post(&self.endpoint)
                .bearer_auth(&self.api_token)
                .header("Accept", "application/json")
                .header("X-Exclude-Invalid", "true")
                .json(&GraphQlRequest::for_query::<Q>(variables));

            if let Some(environment) = &self.environment {
                request = request.header("X-Environment", environment);
            }
            if options.include_drafts {
                request = request.header("X-Include-Drafts", "true");
            }

            let response = request.send().await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(CmsError::Status { status, body });
            }

            let bytes = response.bytes().await?;
            decode_response::<Q::Response>(&bytes)
        }
    }
}

/// Decode a GraphQL envelope; reported errors win over partial data
fn decode_response<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, CmsError> {
    let envelope: GraphQlResponse<T> = serde_json::from_slice(bytes)?;

    if !envelope.errors.is_empty() {
        return Err(CmsError::GraphQl {
            messages: envelope.errors.into_iter().map(|e| e.message).collect(),
        });
    }

    envelope.data.ok_or(CmsError::MissingData)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::NoVariables;
    use serde::Deserialize;
    use wiremock::{
        matchers::{body_json, header, header_exists, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    struct SiteQuery;

    #[derive(Debug, Deserialize, PartialEq)]
    struct SiteData {
        name: String,
    }

    impl GraphQlQuery for SiteQuery {
        const DOCUMENT: &'static str = "query Site { name }";
        const OPERATION_NAME: &'static str = "Site";
        type Variables = NoVariables;
        type Response = SiteData;
    }

    fn create_test_config(endpoint: &str) -> Config {
        Config {
            cms_api_token: "test-token".to_string(),
            cms_endpoint: endpoint.to_string(),
            cms_environment: None,
            cms_timeout_secs: 5,
            include_drafts: false,
            site_locales: None,
            port: 3000,
        }
    }

    fn client_for(mock_server: &MockServer) -> CmsClient {
        CmsClient::new(&create_test_config(&format!("{}/", mock_server.uri())))
            .expect("client should build")
    }

    // ==================== execute Tests ====================

    #[tokio::test]
    async fn test_execute_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("Authorization", "Bearer test-token"))
            .and(header("X-Exclude-Invalid", "true"))
            .and(body_json(serde_json::json!({
                "query": "query Site { name }",
                "operationName": "Site",
                "variables": {}
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"name": "Blog"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let data = client.execute::<SiteQuery>(&NoVariables {}).await.unwrap();

        assert_eq!(data, SiteData { name: "Blog".to_string() });
    }

    #[tokio::test]
    async fn test_execute_with_drafts_sends_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("X-Include-Drafts", "true"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"name": "Draft"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let data = client
            .execute_with::<SiteQuery>(&NoVariables {}, QueryOptions::drafts(true))
            .await
            .unwrap();

        assert_eq!(data.name, "Draft");
    }

    #[tokio::test]
    async fn test_execute_sends_environment_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header_exists("X-Environment"))
            .and(header("X-Environment", "staging"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"name": "Staging"}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = create_test_config(&format!("{}/", mock_server.uri()));
        config.cms_environment = Some("staging".to_string());
        let client = CmsClient::new(&config).unwrap();

        let data = client.execute::<SiteQuery>(&NoVariables {}).await.unwrap();
        assert_eq!(data.name, "Staging");
    }

    #[tokio::test]
    async fn test_execute_http_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .execute::<SiteQuery>(&NoVariables {})
            .await
            .unwrap_err();

        match err {
            CmsError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "invalid token");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_execute_graphql_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": null,
                "errors": [{"message": "Field 'nope' doesn't exist"}, {"message": "second"}]
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .execute::<SiteQuery>(&NoVariables {})
            .await
            .unwrap_err();

        assert!(matches!(err, CmsError::GraphQl { .. }));
        assert_eq!(err.to_string(), "Field 'nope' doesn't exist; second");
    }

    #[tokio::test]
    async fn test_execute_invalid_json() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .execute::<SiteQuery>(&NoVariables {})
            .await
            .unwrap_err();

        assert!(matches!(err, CmsError::Decode(_)));
    }

    #[tokio::test]
    async fn test_execute_connection_error() {
        // Nothing listens on port 1
        let client = CmsClient::new(&create_test_config("http://127.0.0.1:1/")).unwrap();
        let err = client
            .execute::<SiteQuery>(&NoVariables {})
            .await
            .unwrap_err();

        assert!(matches!(err, CmsError::Request(_)));
    }

    // ==================== decode_response Tests ====================

    #[test]
    fn test_decode_missing_data() {
        let err = decode_response::<SiteData>(br#"{}"#).unwrap_err();
        assert!(matches!(err, CmsError::MissingData));
    }

    #[test]
    fn test_decode_errors_win_over_data() {
        let err = decode_response::<SiteData>(
            br#"{"data": {"name": "Blog"}, "errors": [{"message": "partial"}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "partial");
    }

    #[test]
    fn test_graphql_error_without_messages_displays_empty() {
        let err = CmsError::GraphQl {
            messages: vec![String::new()],
        };
        assert_eq!(err.to_string(), "");
    }
}
