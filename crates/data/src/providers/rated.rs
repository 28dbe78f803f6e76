//! REST client for the Rated operator statistics API.

use crate::{OperatorPage, OperatorStatsProvider};
use async_trait::async_trait;
use lsd_rebalance_domain::{RebalanceError, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use zeroize::Zeroizing;

/// Production endpoint of the statistics service.
pub const DEFAULT_RATED_API_URL: &str = "https://api.rated.network/v0";

/// Aggregation window used when none is configured.
pub const DEFAULT_WINDOW: &str = "1d";

const SOURCE: &str = "rated";

/// Summary of a pool label as reported by the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    /// Distinct node operators; the service reports null for some pools.
    pub node_operator_count: Option<u64>,
    /// Total validators across all operators.
    pub validator_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OperatorsResponse {
    data: Vec<NodeOperatorEntry>,
    #[serde(default)]
    next: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeOperatorEntry {
    validator_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

/// Client for the Rated API.
///
/// Each instance owns its base URL and bearer token, so several clients can
/// point at different endpoints in the same process.
#[derive(Clone)]
pub struct RatedProvider {
    client: Client,
    base_url: Url,
    access_token: Zeroizing<String>,
}

impl RatedProvider {
    /// Creates a new RatedProvider.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, access_token: impl Into<String>) -> Result<Self> {
        Self::with_client(Client::new(), base_url, access_token)
    }

    /// Creates a provider around an existing HTTP client.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn with_client(
        client: Client,
        base_url: &str,
        access_token: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            access_token: Zeroizing::new(access_token.into()),
        })
    }

    /// Exchanges credentials for an access token.
    ///
    /// # Errors
    /// Returns [`RebalanceError::UpstreamFetch`] if the service rejects the
    /// credentials or cannot be reached.
    pub async fn authenticate(base_url: &str, username: &str, password: &str) -> Result<String> {
        let url = endpoint(&parse_base_url(base_url)?, &["auth", "token"])?;
        debug!(url = %url, "Requesting access token");

        let response = Client::new()
            .post(url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(error = %e, "Authentication failed");
                upstream(e)
            })?;

        let token: TokenResponse = response.json().await.map_err(upstream)?;
        Ok(token.access_token)
    }

    /// Fetches the summary of a pool label.
    ///
    /// # Errors
    /// Returns [`RebalanceError::UpstreamFetch`] on transport, status or decoding failures.
    pub async fn pool_summary(&self, label: &str, window: &str) -> Result<PoolSummary> {
        let url = endpoint(&self.base_url, &["eth", "operators", label, "summary"])?;
        self.get_json(url, &[("window", window.to_string())]).await
    }

    /// Total validators behind a pool label.
    ///
    /// # Errors
    /// Returns [`RebalanceError::UpstreamFetch`] if the request fails or the
    /// service has no validator count for the label.
    pub async fn total_validator_count(&self, label: &str, window: &str) -> Result<u64> {
        self.pool_summary(label, window)
            .await?
            .validator_count
            .ok_or_else(|| {
                RebalanceError::upstream(SOURCE, format!("no validator count for {label}"))
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!(url = %url, ?query, "GET");

        let response = self
            .client
            .get(url.clone())
            .query(query)
            .bearer_auth(self.access_token.as_str())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request to operator stats service failed");
                upstream(e)
            })?;

        response.json::<T>().await.map_err(upstream)
    }
}

#[async_trait]
impl OperatorStatsProvider for RatedProvider {
    async fn operator_count(&self, label: &str, window: &str) -> Result<u64> {
        let summary = self.pool_summary(label, window).await?;
        let count = summary.node_operator_count.ok_or_else(|| {
            RebalanceError::upstream(SOURCE, format!("no node operator count for {label}"))
        })?;
        debug!(label, count, "Fetched operator count");
        Ok(count)
    }

    async fn operator_page(
        &self,
        label: &str,
        page_size: usize,
        offset: usize,
        window: &str,
    ) -> Result<OperatorPage> {
        let url = endpoint(&self.base_url, &["eth", "operators"])?;
        let query = [
            ("idType", "nodeOperator".to_string()),
            ("window", window.to_string()),
            ("parentId", label.to_string()),
            ("size", page_size.to_string()),
            ("from", offset.to_string()),
        ];
        let page: OperatorsResponse = self.get_json(url, &query).await?;

        let has_next_page = page.next.is_some_and(|next| !next.is_null());
        debug!(
            label,
            offset,
            operators = page.data.len(),
            has_next_page,
            "Fetched operator page"
        );

        Ok(OperatorPage {
            validator_counts: page.data.into_iter().map(|op| op.validator_count).collect(),
            has_next_page,
        })
    }
}

fn upstream(e: reqwest::Error) -> RebalanceError {
    RebalanceError::upstream(SOURCE, e.to_string())
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    Url::parse(base_url)
        .map_err(|e| RebalanceError::InvalidConfig(format!("operator stats URL {base_url:?}: {e}")))
}

/// Appends path segments to the base URL, percent-encoding each one.
fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url> {
    let mut url = base_url.clone();
    url.path_segments_mut()
        .map_err(|_| RebalanceError::InvalidConfig(format!("{base_url} cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Form, Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    const TOKEN: &str = "test-token";

    fn authorized(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {TOKEN}"))
    }

    async fn summary(
        headers: HeaderMap,
        Path(label): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({})));
        }
        assert_eq!(params.get("window").map(String::as_str), Some("1d"));
        match label.as_str() {
            "Lido Curated Module" => (
                StatusCode::OK,
                Json(json!({ "nodeOperatorCount": 37, "validatorCount": 9000 })),
            ),
            "Frax" => (
                StatusCode::OK,
                Json(json!({ "nodeOperatorCount": null, "validatorCount": 120 })),
            ),
            _ => (StatusCode::NOT_FOUND, Json(json!({}))),
        }
    }

    async fn operators(
        headers: HeaderMap,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if !authorized(&headers) {
            return (StatusCode::UNAUTHORIZED, Json(json!({})));
        }
        assert_eq!(params["idType"], "nodeOperator");
        let all: &[u64] = match params["parentId"].as_str() {
            "Rocketpool" => &[5, 4, 3, 2, 1],
            _ => &[],
        };
        let size: usize = params["size"].parse().unwrap();
        let from: usize = params["from"].parse().unwrap();
        let end = (from + size).min(all.len());
        let data: Vec<Value> = all[from.min(end)..end]
            .iter()
            .map(|c| json!({ "validatorCount": c }))
            .collect();
        let next = if end < all.len() {
            json!(format!("/eth/operators?from={end}"))
        } else {
            Value::Null
        };
        (StatusCode::OK, Json(json!({ "data": data, "next": next })))
    }

    async fn token(Form(form): Form<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
        if form.get("username").map(String::as_str) == Some("ops")
            && form.get("password").map(String::as_str) == Some("secret")
        {
            (StatusCode::OK, Json(json!({ "accessToken": TOKEN })))
        } else {
            (StatusCode::UNAUTHORIZED, Json(json!({})))
        }
    }

    async fn spawn_mock() -> String {
        let router = Router::new()
            .route("/v0/eth/operators/{label}/summary", get(summary))
            .route("/v0/eth/operators", get(operators))
            .route("/v0/auth/token", post(token));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v0")
    }

    #[tokio::test]
    async fn test_operator_count_encodes_label() {
        let base = spawn_mock().await;
        let provider = RatedProvider::new(&base, TOKEN).unwrap();

        let count = provider
            .operator_count("Lido Curated Module", DEFAULT_WINDOW)
            .await
            .unwrap();
        assert_eq!(count, 37);
        assert_eq!(
            provider
                .total_validator_count("Lido Curated Module", DEFAULT_WINDOW)
                .await
                .unwrap(),
            9000
        );
    }

    #[tokio::test]
    async fn test_null_operator_count_is_upstream_error() {
        let base = spawn_mock().await;
        let provider = RatedProvider::new(&base, TOKEN).unwrap();

        let err = provider.operator_count("Frax", DEFAULT_WINDOW).await.unwrap_err();
        assert!(matches!(err, RebalanceError::UpstreamFetch { source_name: "rated", .. }));
    }

    #[tokio::test]
    async fn test_operator_pages_follow_next_marker() {
        let base = spawn_mock().await;
        let provider = RatedProvider::new(&base, TOKEN).unwrap();

        let first = provider
            .operator_page("Rocketpool", 2, 0, DEFAULT_WINDOW)
            .await
            .unwrap();
        assert_eq!(first.validator_counts, vec![5, 4]);
        assert!(first.has_next_page);

        let last = provider
            .operator_page("Rocketpool", 2, 4, DEFAULT_WINDOW)
            .await
            .unwrap();
        assert_eq!(last.validator_counts, vec![1]);
        assert!(!last.has_next_page);
    }

    #[tokio::test]
    async fn test_bad_token_and_status_errors() {
        let base = spawn_mock().await;

        let unauthorized = RatedProvider::new(&base, "wrong").unwrap();
        assert!(matches!(
            unauthorized.operator_count("Lido Curated Module", DEFAULT_WINDOW).await,
            Err(RebalanceError::UpstreamFetch { .. })
        ));

        let provider = RatedProvider::new(&base, TOKEN).unwrap();
        assert!(matches!(
            provider.operator_count("Unknown Pool", DEFAULT_WINDOW).await,
            Err(RebalanceError::UpstreamFetch { .. })
        ));
    }

    #[tokio::test]
    async fn test_authenticate_returns_token() {
        let base = spawn_mock().await;

        let token = RatedProvider::authenticate(&base, "ops", "secret").await.unwrap();
        assert_eq!(token, TOKEN);
        assert!(RatedProvider::authenticate(&base, "ops", "nope").await.is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RatedProvider::new("not a url", TOKEN),
            Err(RebalanceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let base = parse_base_url("https://api.example.com/v0/").unwrap();
        let url = endpoint(&base, &["eth", "operators", "Stader Permissioned", "summary"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v0/eth/operators/Stader%20Permissioned/summary"
        );
    }
}
