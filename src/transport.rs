//! GraphQL transport boundary.
//!
//! [`GraphqlClient`] posts `{ query, variables }` to a single configured
//! endpoint and decodes the standard envelope `{ data, errors }`. It is
//! constructed explicitly and shared (`Arc`) by every query in the process;
//! it owns an internally synchronized response cache, so callers never lock
//! anything themselves.
//!
//! Failures are classified, not thrown: network and decode problems become
//! [`QueryError::Transport`], a 2xx response carrying a non-empty `errors`
//! list becomes [`QueryError::Graphql`]. A successful response whose payload
//! says "not found" (a null record) is not an error at this layer at all.

use std::time::Duration;

use dashmap::DashMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for query execution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The request never produced a usable response: network unreachable,
    /// timeout, non-2xx status, or an undecodable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-empty top-level error list.
    #[error("graphql error: {0}")]
    Graphql(String),
}

impl QueryError {
    /// The user-safe classification published in the error phase.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Graphql(_) => ErrorKind::Graphql,
        }
    }
}

/// Classification of a failed attempt, safe to publish to the UI.
///
/// Raw error text stays in the diagnostic log; screens render a generic
/// failure message for either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Graphql,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<ErrorItem>>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    message: String,
}

/// Extract the `data` payload from a GraphQL response body.
///
/// A non-empty `errors` list wins over any partial data; `data: null`
/// without errors is treated as a malformed reply from the server.
fn decode_envelope(body: &str) -> Result<serde_json::Value, QueryError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| QueryError::Transport(format!("undecodable response body: {e}")))?;

    if let Some(errors) = envelope.errors
        && !errors.is_empty()
    {
        let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
        return Err(QueryError::Graphql(messages.join("; ")));
    }

    match envelope.data {
        Some(data) => Ok(data),
        None => Err(QueryError::Graphql("response contained no data".into())),
    }
}

/// HTTP client for one GraphQL endpoint, with a process-wide response cache.
///
/// The cache is read-through and keyed by operation name plus serialized
/// variables; successful payloads are served from memory on repeat requests.
/// There is no eviction; the working set here is a handful of list and
/// detail responses.
#[derive(Debug)]
pub struct GraphqlClient {
    http: reqwest::Client,
    endpoint: String,
    cache: DashMap<(&'static str, String), serde_json::Value>,
}

impl GraphqlClient {
    /// Build a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, QueryError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            cache: DashMap::new(),
        })
    }

    /// Execute a named query with the given variables and decode the typed
    /// payload.
    ///
    /// # Errors
    ///
    /// Classified per the module docs: [`QueryError::Transport`] for anything
    /// below the GraphQL layer, [`QueryError::Graphql`] for server-reported
    /// errors.
    #[instrument(skip(self, query, variables), fields(endpoint = %self.endpoint))]
    pub async fn execute<D: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: serde_json::Value,
    ) -> Result<D, QueryError> {
        let key = (operation, variables.to_string());

        if let Some(cached) = self.cache.get(&key) {
            debug!(operation, "serving cached response");
            return typed(cached.clone());
        }

        let body = serde_json::json!({ "query": query, "variables": variables });

        let response = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(QueryError::Transport(format!("unexpected status {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let data = decode_envelope(&text)?;
        self.cache.insert(key, data.clone());
        typed(data)
    }
}

fn typed<D: DeserializeOwned>(data: serde_json::Value) -> Result<D, QueryError> {
    serde_json::from_value(data)
        .map_err(|e| QueryError::Transport(format!("unexpected payload shape: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_success_payload() {
        let body = r#"{"data":{"character":{"id":"1","name":"Rick Sanchez"}}}"#;
        let data = decode_envelope(body).expect("should decode");
        assert_eq!(data["character"]["name"], "Rick Sanchez");
    }

    #[test]
    fn decode_null_record_is_success() {
        // "Not found" is a data condition, not a transport condition.
        let body = r#"{"data":{"character":null}}"#;
        let data = decode_envelope(body).expect("should decode");
        assert!(data["character"].is_null());
    }

    #[test]
    fn decode_error_list_wins() {
        let body = r#"{"data":null,"errors":[{"message":"User not found"},{"message":"boom"}]}"#;
        let err = decode_envelope(body).expect_err("should classify");
        assert_eq!(err, QueryError::Graphql("User not found; boom".into()));
        assert_eq!(err.kind(), ErrorKind::Graphql);
    }

    #[test]
    fn decode_empty_error_list_is_ignored() {
        let body = r#"{"data":{"ok":true},"errors":[]}"#;
        let data = decode_envelope(body).expect("empty error list is not an error");
        assert_eq!(data["ok"], true);
    }

    #[test]
    fn decode_missing_data_is_graphql_error() {
        let body = r#"{"data":null}"#;
        let err = decode_envelope(body).expect_err("null data without errors");
        assert_eq!(err.kind(), ErrorKind::Graphql);
    }

    #[test]
    fn decode_garbage_is_transport_error() {
        let err = decode_envelope("<html>bad gateway</html>").expect_err("not json");
        assert_eq!(err.kind(), ErrorKind::Transport);
    }

    #[test]
    fn error_kinds_classify() {
        assert_eq!(
            QueryError::Transport("timeout".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            QueryError::Graphql("bad field".into()).kind(),
            ErrorKind::Graphql
        );
    }
}
