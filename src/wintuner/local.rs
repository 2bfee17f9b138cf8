//! Local package lookup

use super::version_label;
use crate::config::AppConfig;
use std::path::{Path, PathBuf};

/// `{root}/{app_id}/{version or "latest"}`
pub fn package_path(root: &Path, app_id: &str, version: Option<&str>) -> PathBuf {
    root.join(app_id).join(version_label(version))
}

/// True iff the package directory exists. Contents are not inspected.
pub fn exists_in(root: &Path, app_id: &str, version: Option<&str>) -> bool {
    package_path(root, app_id, version).is_dir()
}

pub fn exists(app_id: &str, version: Option<&str>, config: &AppConfig) -> bool {
    exists_in(&config.download_dir, app_id, version)
}
