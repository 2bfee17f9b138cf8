use crate::config::AppConfig;
use crate::error::{IntunePubError, Result};
use oauth2::{
    basic::{BasicClient, BasicErrorResponse},
    reqwest::async_http_client,
    AuthType, AuthUrl, ClientId, ClientSecret, HttpRequest, RequestTokenError, Scope, TokenResponse,
    TokenUrl,
};
use std::cell::Cell;
use std::fmt;
use std::time::Duration;

pub const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";
pub const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Bounded wait for the token endpoint
pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Opaque bearer token. Expiry is informational only; nothing refreshes it.
#[derive(Clone)]
pub struct AccessToken {
    secret: String,
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            expires_at: None,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client-credentials token provider for a single tenant
#[derive(Clone)]
pub struct TokenProvider {
    authority: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    timeout: Duration,
}

impl TokenProvider {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            authority: MICROSOFT_AUTHORITY.to_string(),
            tenant_id: config.tenant_id.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            timeout: TOKEN_TIMEOUT,
        }
    }

    /// Use another identity authority host
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.authority, self.tenant_id)
    }

    /// Exchange the client id/secret for a Graph access token.
    ///
    /// Single attempt: network errors, non-200 responses and a 200 without an
    /// `access_token` all come back as `AuthError`.
    pub async fn acquire_token(&self) -> Result<AccessToken> {
        let auth_url = AuthUrl::new(format!(
            "{}/{}/oauth2/v2.0/authorize",
            self.authority, self.tenant_id
        ))
        .map_err(|e| IntunePubError::AuthError(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(self.token_url())
            .map_err(|e| IntunePubError::AuthError(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(self.client_id.clone()),
            Some(ClientSecret::new(self.client_secret.clone())),
            auth_url,
            Some(token_url),
        )
        .set_auth_type(AuthType::RequestBody);

        tracing::debug!("Requesting client credentials token from {}", self.token_url());

        // Status of the last response, for errors oauth2 reports without it
        let status = Cell::new(None);
        let http_client = |request: HttpRequest| {
            let status = &status;
            async move {
                let response = async_http_client(request).await;
                if let Ok(resp) = &response {
                    status.set(Some(resp.status_code.as_u16()));
                }
                response
            }
        };

        let request = client
            .exchange_client_credentials()
            .add_scope(Scope::new(GRAPH_SCOPE.to_string()))
            .request_async(http_client);

        let token = match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(token)) => token,
            Ok(Err(e)) => return Err(describe_token_error(e, status.get())),
            Err(_) => {
                return Err(IntunePubError::AuthError(format!(
                    "Token request timed out after {:?}",
                    self.timeout
                )))
            }
        };

        let expires_at = token
            .expires_in()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| chrono::Utc::now() + d);

        Ok(AccessToken {
            secret: token.access_token().secret().clone(),
            expires_at,
        })
    }
}

fn describe_token_error<RE>(
    err: RequestTokenError<RE, BasicErrorResponse>,
    status: Option<u16>,
) -> IntunePubError
where
    RE: std::error::Error + 'static,
{
    match err {
        RequestTokenError::ServerResponse(resp) => {
            let detail = resp
                .error_description()
                .cloned()
                .unwrap_or_else(|| "no error description".to_string());
            IntunePubError::AuthError(format!("{}: {}", resp.error(), detail))
        }
        RequestTokenError::Request(e) => {
            IntunePubError::AuthError(format!("Token request failed: {}", with_causes(&e)))
        }
        RequestTokenError::Parse(_, body) => match status {
            Some(code) if code != 200 => IntunePubError::AuthError(rejected_message(code, &body)),
            _ => IntunePubError::AuthError(missing_token_message(&body)),
        },
        RequestTokenError::Other(msg) => IntunePubError::AuthError(msg),
    }
}

/// `err` followed by each distinct cause in its source chain
fn with_causes(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

/// The service's `error_description` when the body carries one, else the raw body
fn response_detail(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .and_then(|d| d.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string())
}

/// A 200 response that carried no usable `access_token`
fn missing_token_message(body: &[u8]) -> String {
    format!("Token response missing access_token: {}", response_detail(body))
}

/// A non-200 response that was not a standard OAuth2 error document
fn rejected_message(status: u16, body: &[u8]) -> String {
    format!("Token request rejected (HTTP {}): {}", status, response_detail(body))
}
