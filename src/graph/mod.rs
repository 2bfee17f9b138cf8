pub mod auth;
pub mod intune;

use crate::error::{IntunePubError, Result};
use auth::AccessToken;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use std::time::Duration;

pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Fixed per-request timeout. There is no retry: a failed or timed-out
/// request fails the whole operation.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Graph API client bound to a single access token
pub struct GraphClient {
    client: Client,
    access_token: String,
    base_url: String,
}

impl GraphClient {
    /// Client for the Graph root at `base_url` (`GRAPH_API_BASE` in production)
    pub fn with_base_url(token: &AccessToken, base_url: &str) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            access_token: token.secret().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn send<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request.bearer_auth(&self.access_token).send().await?;
        let status = resp.status();

        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            let enhanced_error = crate::error::enhance_graph_error(&error_text);
            return Err(IntunePubError::NetworkError(format!(
                "HTTP {}: {}",
                status, enhanced_error
            )));
        }

        let body = resp.text().await?;
        let data = serde_json::from_str::<T>(&body)?;
        Ok(data)
    }
}

// ============================================================================
// Pagination Helpers
// ============================================================================

/// Generic paginated response from Graph API
///
/// Standard OData page with a `value` array and an optional `@odata.nextLink`
#[derive(Debug, Deserialize)]
pub struct PaginatedResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
    #[serde(rename = "@odata.count")]
    pub count: Option<i64>,
}

/// Query options for a list request
#[derive(Debug, Default, Clone)]
pub struct ListOptions {
    /// OData query parameters for the first page (`$top`, `$filter`, ...)
    pub query: Vec<(&'static str, String)>,

    /// Send `ConsistencyLevel: eventual`, required by Graph for
    /// advanced `$filter` and `$count` queries
    pub eventual_consistency: bool,
}

impl GraphClient {
    /// Fetch all pages of a paginated Graph API endpoint
    ///
    /// Follows `@odata.nextLink` verbatim until it is absent. Any failing
    /// page fails the whole call; pages already fetched are discarded.
    pub async fn get_all_pages<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        options: &ListOptions,
    ) -> Result<Vec<T>> {
        let mut all_items: Vec<T> = Vec::new();
        let mut request = self
            .client
            .get(self.endpoint_url(endpoint))
            .query(&options.query);
        let mut page = 1;

        loop {
            if options.eventual_consistency {
                request = request.header("ConsistencyLevel", "eventual");
            }

            let response: PaginatedResponse<T> = self.send(request).await?;
            tracing::debug!(
                "Page {} of {}: {} item(s), count={:?}",
                page,
                endpoint,
                response.value.len(),
                response.count
            );
            all_items.extend(response.value);

            match response.next_link {
                Some(next) => {
                    request = self.client.get(next);
                    page += 1;
                }
                None => break,
            }
        }

        Ok(all_items)
    }
}
