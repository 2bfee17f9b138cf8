//! Intune mobile app inventory via Microsoft Graph API

use crate::config::AppConfig;
use crate::error::Result;
use crate::graph::auth::{AccessToken, TokenProvider};
use crate::graph::{GraphClient, ListOptions, GRAPH_API_BASE};
use serde::Deserialize;

pub const MOBILE_APPS_ENDPOINT: &str = "deviceAppManagement/mobileApps";

/// Largest page size requested from the service
pub const MAX_PAGE_SIZE: u32 = 999;

/// Raw mobile app record as returned by Graph
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileApp {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "@odata.type", default)]
    pub odata_type: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub publisher: Option<String>,

    #[serde(default)]
    pub display_version: Option<String>,

    #[serde(default)]
    pub committed_content_version: Option<String>,

    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub is_assigned: Option<bool>,

    /// Only set on iOS VPP apps
    #[serde(default)]
    pub vpp_token_name: Option<String>,
}

/// Server-side `contains` predicate on the display name, case-insensitive
pub fn name_filter_expression(filter: &str) -> String {
    format!(
        "contains(tolower(displayName), '{}')",
        filter.to_lowercase().replace('\'', "''")
    )
}

/// Query options for the mobileApps list, with an optional name filter
pub fn list_options(name_filter: Option<&str>) -> ListOptions {
    let mut query = vec![("$top", MAX_PAGE_SIZE.to_string())];
    let filter = name_filter.map(str::trim).filter(|f| !f.is_empty());

    if let Some(filter) = filter {
        query.push(("$filter", name_filter_expression(filter)));
        query.push(("$count", "true".to_string()));
    }

    ListOptions {
        query,
        eventual_consistency: filter.is_some(),
    }
}

/// List every mobile app in the tenant, following pagination
pub async fn list_apps(client: &GraphClient, name_filter: Option<&str>) -> Result<Vec<MobileApp>> {
    client
        .get_all_pages(MOBILE_APPS_ENDPOINT, &list_options(name_filter))
        .await
}

/// Token + inventory operations the batch workflow depends on
#[allow(async_fn_in_trait)]
pub trait AppDirectory {
    async fn acquire_token(&self) -> Result<AccessToken>;

    async fn list_apps(
        &self,
        token: &AccessToken,
        name_filter: Option<&str>,
    ) -> Result<Vec<MobileApp>>;
}

/// Live Graph-backed directory
pub struct IntuneService {
    auth: TokenProvider,
    graph_base: String,
}

impl IntuneService {
    pub fn new(auth: TokenProvider) -> Self {
        Self {
            auth,
            graph_base: GRAPH_API_BASE.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(TokenProvider::new(config))
    }

    pub fn with_graph_base(mut self, graph_base: impl Into<String>) -> Self {
        self.graph_base = graph_base.into();
        self
    }
}

impl AppDirectory for IntuneService {
    async fn acquire_token(&self) -> Result<AccessToken> {
        self.auth.acquire_token().await
    }

    async fn list_apps(
        &self,
        token: &AccessToken,
        name_filter: Option<&str>,
    ) -> Result<Vec<MobileApp>> {
        let client = GraphClient::with_base_url(token, &self.graph_base)?;
        list_apps(&client, name_filter).await
    }
}
