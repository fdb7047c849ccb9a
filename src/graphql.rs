//! Typed GraphQL queries.
//!
//! Each query is a unit type that carries its document together with the
//! shapes of its variables and result, so a query can only be executed with
//! matching variables and decoded into its own result type.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A GraphQL operation with statically known variables and result.
pub trait GraphQlQuery {
    /// The GraphQL document sent to the CMS
    const DOCUMENT: &'static str;
    /// Name of the operation inside `DOCUMENT`
    const OPERATION_NAME: &'static str;

    type Variables: Serialize + Send + Sync;
    type Response: DeserializeOwned + Send;
}

/// Request body for a GraphQL POST
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a, V> {
    pub query: &'static str,
    pub operation_name: &'static str,
    pub variables: &'a V,
}

impl<'a, V> GraphQlRequest<'a, V> {
    pub fn for_query<Q>(variables: &'a V) -> Self
    where
        Q: GraphQlQuery<Variables = V>,
    {
        Self {
            query: Q::DOCUMENT,
            operation_name: Q::OPERATION_NAME,
            variables,
        }
    }
}

/// Response envelope; the CMS may send `data`, `errors`, or both
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

/// Variables for queries that take no arguments
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoVariables {}

#[cfg(test)]
mod tests {
    use super::*;

    struct PingQuery;

    #[derive(Debug, Deserialize)]
    struct Ping {
        pong: bool,
    }

    #[derive(Serialize)]
    struct PingVariables {
        times: u32,
    }

    impl GraphQlQuery for PingQuery {
        const DOCUMENT: &'static str = "query Ping($times: Int) { pong }";
        const OPERATION_NAME: &'static str = "Ping";
        type Variables = PingVariables;
        type Response = Ping;
    }

    #[test]
    fn test_request_serialization() {
        let variables = PingVariables { times: 2 };
        let request = GraphQlRequest::for_query::<PingQuery>(&variables);

        let json = serde_json::to_value(&request).expect("Should serialize");
        assert_eq!(
            json,
            serde_json::json!({
                "query": "query Ping($times: Int) { pong }",
                "operationName": "Ping",
                "variables": {"times": 2}
            })
        );
    }

    #[test]
    fn test_no_variables_serializes_as_empty_object() {
        let json = serde_json::to_string(&NoVariables {}).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_response_with_data_only() {
        let response: GraphQlResponse<Ping> =
            serde_json::from_str(r#"{"data": {"pong": true}}"#).expect("Should deserialize");
        assert!(response.data.expect("data").pong);
        assert!(response.errors.is_empty());
    }

    #[test]
    fn test_response_with_errors_only() {
        let response: GraphQlResponse<Ping> = serde_json::from_str(
            r#"{"errors": [{"message": "bad field"}, {"locations": []}]}"#,
        )
        .expect("Should deserialize");
        assert!(response.data.is_none());
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[0].message, "bad field");
        assert_eq!(response.errors[1].message, "");
    }
}
