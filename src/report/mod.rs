//! Intune app inventory report
//!
//! Normalizes raw mobile app records into display rows, renders them as a
//! fixed-width table and performs the loose name matching used by the
//! "already published?" check.
//!
//! Table style: a dashed border above the header, below the header and after
//! the last row. Data rows are not separated from each other.

use crate::graph::intune::MobileApp;

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_TYPE: &str = "Unknown Type";

/// Column titles and widths, in display order
pub const COLUMNS: [(&str, usize); 6] = [
    ("Name", 32),
    ("Platform", 12),
    ("Version", 10),
    ("VPP Token Name", 17),
    ("Assigned", 10),
    ("Developer", 24),
];

const ELLIPSIS: &str = "...";

/// Ordered substring lookup over the lower-cased `@odata.type`.
/// First match wins, so `macOSOfficeSuiteApp` lands on macOS.
const PLATFORM_TABLE: &[(&str, &str)] = &[
    ("macos", "macOS"),
    ("ios", "iOS"),
    ("android", "Android"),
    ("win32lobapp", "Windows"),
    ("wingetapp", "Windows"),
    ("windows", "Windows"),
    ("microsoftstoreforbusiness", "Windows"),
    ("officesuite", "Windows"),
    ("webapp", "Web"),
];

/// Display-ready app row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRow {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub platform: String,
    pub version: String,
    pub vpp_token_name: String,
    pub assigned: String,
    pub developer: String,
}

/// Map an `@odata.type` discriminator to a platform label. Never empty.
pub fn platform_label(odata_type: &str) -> String {
    let discriminator = odata_type.trim();
    if discriminator.is_empty() {
        return UNKNOWN_TYPE.to_string();
    }

    let lower = discriminator.to_lowercase();
    if let Some((_, label)) = PLATFORM_TABLE
        .iter()
        .find(|(needle, _)| lower.contains(needle))
    {
        return label.to_string();
    }

    // "#microsoft.graph.someNewApp" -> "someNewApp"
    match discriminator
        .rsplit('.')
        .next()
        .map(|s| s.trim().trim_start_matches('#'))
    {
        Some(segment) if !segment.is_empty() => segment.to_string(),
        _ => discriminator.to_string(),
    }
}

/// Everything before the first period
pub fn short_name(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Matching key for an app identifier: period-truncated and lower-cased
pub fn processed_identifier(identifier: &str) -> String {
    short_name(identifier.trim()).to_lowercase()
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Normalize raw records. Total: missing fields fall back to defaults.
pub fn normalize(apps: &[MobileApp]) -> Vec<AppRow> {
    apps.iter().map(normalize_one).collect()
}

fn normalize_one(app: &MobileApp) -> AppRow {
    let name = non_empty(app.display_name.as_ref())
        .unwrap_or(NOT_AVAILABLE)
        .to_string();
    let platform = platform_label(app.odata_type.as_deref().unwrap_or_default());

    let version = non_empty(app.display_version.as_ref())
        .or_else(|| non_empty(app.committed_content_version.as_ref()))
        .or_else(|| non_empty(app.app_version.as_ref()))
        .unwrap_or(NOT_AVAILABLE)
        .to_string();

    let vpp_token_name = if platform == "iOS" {
        non_empty(app.vpp_token_name.as_ref()).unwrap_or(NOT_AVAILABLE)
    } else {
        NOT_AVAILABLE
    };

    AppRow {
        id: non_empty(app.id.as_ref()).unwrap_or(NOT_AVAILABLE).to_string(),
        short_name: short_name(&name).to_string(),
        name,
        platform,
        version,
        vpp_token_name: vpp_token_name.to_string(),
        assigned: if app.is_assigned.unwrap_or(false) { "Yes" } else { "No" }.to_string(),
        developer: non_empty(app.publisher.as_ref())
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    }
}

/// Rows whose short name contains the processed identifier.
///
/// Deliberately fuzzy: "Zoom.Zoom" matches "Zoom Workplace" and also any
/// other app whose name happens to contain "zoom".
pub fn find_matches<'a>(identifier: &str, rows: &'a [AppRow]) -> Vec<&'a AppRow> {
    let needle = processed_identifier(identifier);
    if needle.is_empty() {
        return Vec::new();
    }

    rows.iter()
        .filter(|row| row.short_name.to_lowercase().contains(&needle))
        .collect()
}

/// Fit a cell into `width` characters, marking truncation with "..."
pub fn fit_cell(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }

    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut cell: String = value.chars().take(keep).collect();
    cell.push_str(ELLIPSIS);
    cell.chars().take(width).collect()
}

pub fn border_line() -> String {
    let segments: Vec<String> = COLUMNS.iter().map(|(_, w)| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn table_row(cells: [&str; 6]) -> String {
    let mut line = String::from("|");
    for (cell, (_, width)) in cells.iter().zip(COLUMNS.iter()) {
        line.push_str(&format!(" {:<width$} |", fit_cell(cell, *width), width = *width));
    }
    line
}

/// Render rows as an aligned text table
pub fn render(rows: &[AppRow]) -> String {
    let border = border_line();
    let header = table_row(COLUMNS.map(|(title, _)| title));
    let mut lines = vec![border.clone(), header, border.clone()];

    for row in rows {
        lines.push(table_row([
            &row.name,
            &row.platform,
            &row.version,
            &row.vpp_token_name,
            &row.assigned,
            &row.developer,
        ]));
    }

    if !rows.is_empty() {
        lines.push(border);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(odata_type: &str, name: &str) -> MobileApp {
        MobileApp {
            odata_type: Some(odata_type.to_string()),
            display_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_platform_label_lookup() {
        assert_eq!(platform_label("#microsoft.graph.win32LobApp"), "Windows");
        assert_eq!(platform_label("#microsoft.graph.winGetApp"), "Windows");
        assert_eq!(platform_label("#microsoft.graph.iosVppApp"), "iOS");
        assert_eq!(platform_label("#microsoft.graph.managedIOSStoreApp"), "iOS");
        assert_eq!(platform_label("#microsoft.graph.androidManagedStoreApp"), "Android");
        assert_eq!(platform_label("#microsoft.graph.macOSOfficeSuiteApp"), "macOS");
        assert_eq!(platform_label("#microsoft.graph.officeSuiteApp"), "Windows");
        assert_eq!(platform_label("#microsoft.graph.webApp"), "Web");
    }

    #[test]
    fn test_platform_label_is_case_insensitive() {
        assert_eq!(
            platform_label("#MICROSOFT.GRAPH.IOSVPPAPP"),
            platform_label("#microsoft.graph.iosVppApp")
        );
    }

    #[test]
    fn test_platform_label_fallbacks_never_empty() {
        assert_eq!(platform_label("#microsoft.graph.someFutureApp"), "someFutureApp");
        assert_eq!(platform_label("customType"), "customType");
        assert_eq!(platform_label(""), UNKNOWN_TYPE);
        assert_eq!(platform_label("   "), UNKNOWN_TYPE);
        assert_eq!(platform_label("trailing."), "trailing.");
        assert!(!platform_label("#").is_empty());
    }

    #[test]
    fn test_short_name_is_idempotent() {
        assert_eq!(short_name("Notepad++.Notepad++"), "Notepad++");
        assert_eq!(short_name("Zoom"), "Zoom");
        assert_eq!(short_name(short_name("Mozilla.Firefox.ESR")), "Mozilla");
        assert_eq!(short_name(".hidden"), "");
    }

    #[test]
    fn test_normalize_defaults_for_empty_record() {
        let rows = normalize(&[MobileApp::default()]);
        let row = &rows[0];

        assert_eq!(row.name, NOT_AVAILABLE);
        assert_eq!(row.platform, UNKNOWN_TYPE);
        assert_eq!(row.version, NOT_AVAILABLE);
        assert_eq!(row.vpp_token_name, NOT_AVAILABLE);
        assert_eq!(row.assigned, "No");
        assert_eq!(row.developer, NOT_AVAILABLE);
        assert_eq!(row.id, NOT_AVAILABLE);
    }

    #[test]
    fn test_normalize_version_precedence() {
        let mut record = app("#microsoft.graph.win32LobApp", "Mozilla.Firefox");
        record.display_version = Some("".into());
        record.committed_content_version = Some("2".into());
        record.app_version = Some("3".into());
        assert_eq!(normalize(&[record.clone()])[0].version, "2");

        record.display_version = Some("128.0".into());
        assert_eq!(normalize(&[record.clone()])[0].version, "128.0");

        record.display_version = None;
        record.committed_content_version = None;
        assert_eq!(normalize(&[record])[0].version, "3");
    }

    #[test]
    fn test_vpp_token_only_for_ios() {
        let mut ios = app("#microsoft.graph.iosVppApp", "Pages");
        ios.vpp_token_name = Some("Contoso VPP".into());
        ios.is_assigned = Some(true);
        let mut android = app("#microsoft.graph.androidStoreApp", "Teams");
        android.vpp_token_name = Some("ignored".into());

        let rows = normalize(&[ios, android]);
        assert_eq!(rows[0].vpp_token_name, "Contoso VPP");
        assert_eq!(rows[0].assigned, "Yes");
        assert_eq!(rows[1].vpp_token_name, NOT_AVAILABLE);
    }

    #[test]
    fn test_find_matches_is_fuzzy_prefix_containment() {
        let rows = normalize(&[
            app("#microsoft.graph.win32LobApp", "Zoom Workplace"),
            app("#microsoft.graph.win32LobApp", "Mozilla.Firefox"),
            app("#microsoft.graph.win32LobApp", "Firefox.Zoom"),
        ]);

        let hits = find_matches("Zoom.Zoom", &rows);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Zoom Workplace");

        assert_eq!(find_matches("mozilla.firefox", &rows).len(), 1);
        assert!(find_matches(".Zoom", &rows).is_empty());
    }

    #[test]
    fn test_fit_cell_truncates_with_ellipsis() {
        assert_eq!(fit_cell("short", 10), "short");
        assert_eq!(fit_cell("exactly-10", 10), "exactly-10");
        assert_eq!(fit_cell("Microsoft Visual Studio Code", 10), "Microso...");
        assert_eq!(fit_cell("abcdef", 2), "..");
    }

    #[test]
    fn test_render_layout() {
        let mut record = app(
            "#microsoft.graph.win32LobApp",
            "A very long application display name indeed",
        );
        record.publisher = Some("Contoso".into());
        let rows = normalize(&[record.clone(), record]);

        let table = render(&rows);
        let lines: Vec<&str> = table.lines().collect();
        let border = border_line();

        // border, header, border, 2 rows, border
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], border);
        assert_eq!(lines[2], border);
        assert_eq!(lines[5], border);
        assert!(lines[1].starts_with("| Name "));
        assert!(lines[3].contains("A very long application displ..."));
        assert!(lines.iter().all(|l| l.chars().count() == border.chars().count()));
    }

    #[test]
    fn test_render_without_rows_is_header_only() {
        assert_eq!(render(&[]).lines().count(), 3);
    }
}
