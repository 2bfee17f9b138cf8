use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntunePubError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Authentication failed: {0}")]
    AuthError(String),

    #[error("Graph API error: {0}")]
    NetworkError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Interactive prompt error: {0}")]
    DialoguerError(#[from] dialoguer::Error),

    #[error("Command '{0}' not found. Is it installed and on your PATH?")]
    ToolNotFound(String),

    #[error("{description} failed ({status}):\n{output}")]
    ToolFailed {
        description: String,
        status: String,
        output: String,
    },

    #[error("{description} did not finish within {seconds}s")]
    ToolTimedOut { description: String, seconds: u64 },

    #[error("Cancelled by user")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, IntunePubError>;

/// Parse Graph API error response and provide helpful context
pub fn enhance_graph_error(error_response: &str) -> String {
    if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(error_response) {
        if let Some(error_obj) = error_json.get("error") {
            let code = error_obj
                .get("code")
                .and_then(|c| c.as_str())
                .unwrap_or("Unknown");
            let message = error_obj
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("No message");

            let hint = match code {
                "Unauthorized" | "InvalidAuthenticationToken" => {
                    "\n💡 Hint: The access token was rejected. Check the tenant id and client secret."
                }
                "Forbidden" | "InsufficientPrivileges" | "Authorization_RequestDenied" => {
                    "\n💡 Hint: The app registration needs DeviceManagementApps.ReadWrite.All with admin consent."
                }
                "BadRequest" if message.contains("filter") => {
                    "\n💡 Hint: The name filter was rejected. Try a shorter or simpler app id."
                }
                "TooManyRequests" => {
                    "\n💡 Hint: API rate limit exceeded. Wait a moment and try again."
                }
                _ => "",
            };

            return format!("{}: {}{}", code, message, hint);
        }
    }

    error_response.to_string()
}
