use crate::error::{IntunePubError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default settings document name, looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_TEMP_DIR: &str = "temp_packages";

pub const DEFAULT_TOOL: &str = "wintuner";

/// Settings document as written on disk. Every key is optional here so that
/// validation can report all missing keys at once.
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    intune_tenant_id: Option<String>,
    #[serde(default)]
    intune_client_id: Option<String>,
    #[serde(default)]
    intune_client_secret: Option<String>,
    #[serde(default)]
    wintuner_download_dir: Option<String>,
    #[serde(default)]
    temp_package_dir: Option<String>,
    #[serde(default)]
    wintuner_path: Option<String>,
    #[serde(default)]
    tool_timeout_secs: Option<u64>,
}

/// Validated configuration, immutable after loading
#[derive(Clone)]
pub struct AppConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub download_dir: PathBuf,
    pub temp_dir: PathBuf,

    /// External packaging binary (name on PATH or absolute path)
    pub tool_path: String,

    /// Ceiling on a single external tool run; `None` waits forever
    pub tool_timeout: Option<Duration>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("download_dir", &self.download_dir)
            .field("temp_dir", &self.temp_dir)
            .field("tool_path", &self.tool_path)
            .field("tool_timeout", &self.tool_timeout)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

impl AppConfig {
    /// Load, validate and prepare directories.
    ///
    /// `explicit` is the `--config` flag; without it the default document is
    /// searched next to the executable, then in the per-user config directory.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(explicit)?;
        Self::load_from(&path)
    }

    /// Load from a specific path and create the output directories
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(IntunePubError::ConfigError(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            IntunePubError::ConfigError(format!("{}: Unreadable file: {}", path.display(), e))
        })?;
        let config = Self::parse(&contents, Format::for_path(path)).map_err(|e| match e {
            IntunePubError::ConfigError(msg) => {
                IntunePubError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        config.ensure_directories()?;
        tracing::debug!("Loaded configuration from {}: {:?}", path.display(), config);

        Ok(config)
    }

    fn parse(contents: &str, format: Format) -> Result<Self> {
        let raw: RawConfig = match format {
            Format::Json => serde_json::from_str(contents)
                .map_err(|e| IntunePubError::ConfigError(format!("Invalid JSON: {}", e)))?,
            Format::Toml => toml::from_str(contents)
                .map_err(|e| IntunePubError::ConfigError(format!("Invalid TOML: {}", e)))?,
        };

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self> {
        fn required(
            value: Option<String>,
            key: &'static str,
            missing: &mut Vec<&'static str>,
        ) -> String {
            match value.map(|v| v.trim().to_string()) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    missing.push(key);
                    String::new()
                }
            }
        }

        let mut missing = Vec::new();
        let tenant_id = required(raw.intune_tenant_id, "intune_tenant_id", &mut missing);
        let client_id = required(raw.intune_client_id, "intune_client_id", &mut missing);
        let client_secret =
            required(raw.intune_client_secret, "intune_client_secret", &mut missing);
        let download_dir =
            required(raw.wintuner_download_dir, "wintuner_download_dir", &mut missing);

        if !missing.is_empty() {
            return Err(IntunePubError::ConfigError(format!(
                "Missing required key(s): {}",
                missing.join(", ")
            )));
        }

        let temp_dir = raw
            .temp_package_dir
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TEMP_DIR.to_string());

        let tool_path = raw
            .wintuner_path
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_TOOL.to_string());

        Ok(Self {
            tenant_id,
            client_id,
            client_secret,
            download_dir: PathBuf::from(download_dir),
            temp_dir: PathBuf::from(temp_dir),
            tool_path,
            tool_timeout: raw
                .tool_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        })
    }

    /// Create the download and temp directories if they do not exist yet
    pub fn ensure_directories(&self) -> Result<()> {
        for dir in [&self.download_dir, &self.temp_dir] {
            if !dir.exists() {
                fs::create_dir_all(dir)?;
            }
        }
        Ok(())
    }
}

/// Pick the settings document to load.
///
/// An explicit path always wins. Otherwise the first existing candidate is
/// used, falling back to the executable-dir path so the error names it.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }

    let candidates = default_candidates()?;
    let fallback = candidates[0].clone();

    Ok(candidates
        .into_iter()
        .find(|p| p.is_file())
        .unwrap_or(fallback))
}

fn default_candidates() -> Result<Vec<PathBuf>> {
    let exe = std::env::current_exe()?;
    let exe_dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut candidates = vec![exe_dir.join(CONFIG_FILE_NAME)];

    if let Some(dirs) = ProjectDirs::from("com", "intunepub", "intunepub") {
        candidates.push(dirs.config_dir().join(CONFIG_FILE_NAME));
        candidates.push(dirs.config_dir().join("config.toml"));
    }

    Ok(candidates)
}
