//! wintuner integration
//!
//! Builds the `wintuner package` / `wintuner publish` command lines, checks
//! for previously packaged apps on disk, and runs the tool as a child process.

pub mod local;
pub mod runner;

use std::fmt;
use std::path::Path;

/// Folder name used when no explicit version is requested
pub const LATEST: &str = "latest";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Architecture {
    #[default]
    X64,
    X86,
    Arm64,
}

impl Architecture {
    pub const ALL: [Architecture; 3] = [Architecture::X64, Architecture::X86, Architecture::Arm64];

    pub fn as_str(&self) -> &'static str {
        match self {
            Architecture::X64 => "x64",
            Architecture::X86 => "x86",
            Architecture::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InstallerContext {
    User,
    #[default]
    System,
}

impl InstallerContext {
    pub const ALL: [InstallerContext; 2] = [InstallerContext::User, InstallerContext::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            InstallerContext::User => "user",
            InstallerContext::System => "system",
        }
    }
}

impl fmt::Display for InstallerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested version, or "latest" when none was given
pub fn version_label(version: Option<&str>) -> &str {
    version.unwrap_or(LATEST)
}

/// `package <id> --package-folder <dir> --architecture <a> --installer-context <c> [--version <v>]`
pub fn package_args(
    app_id: &str,
    package_folder: &Path,
    architecture: Architecture,
    context: InstallerContext,
    version: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        "package".to_string(),
        app_id.to_string(),
        "--package-folder".to_string(),
        package_folder.to_string_lossy().into_owned(),
        "--architecture".to_string(),
        architecture.as_str().to_string(),
        "--installer-context".to_string(),
        context.as_str().to_string(),
    ];

    if let Some(v) = version {
        args.extend(["--version".to_string(), v.to_string()]);
    }

    args
}

/// `publish <id> --package-folder <dir> --tenant <tenant> --token <token> [--version <v>]`
pub fn publish_args(
    app_id: &str,
    package_folder: &Path,
    tenant_id: &str,
    token: &str,
    version: Option<&str>,
) -> Vec<String> {
    let mut args = vec![
        "publish".to_string(),
        app_id.to_string(),
        "--package-folder".to_string(),
        package_folder.to_string_lossy().into_owned(),
        "--tenant".to_string(),
        tenant_id.to_string(),
        "--token".to_string(),
        token.to_string(),
    ];

    if let Some(v) = version {
        args.extend(["--version".to_string(), v.to_string()]);
    }

    args
}

/// Copy of `args` safe for logs: the value after `--token` is masked
pub fn redact_args(args: &[String]) -> Vec<String> {
    let mut redacted = Vec::with_capacity(args.len());
    let mut mask_next = false;

    for arg in args {
        if mask_next {
            redacted.push("***".to_string());
            mask_next = false;
        } else {
            mask_next = arg == "--token";
            redacted.push(arg.clone());
        }
    }

    redacted
}
