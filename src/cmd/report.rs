use crate::cmd::progress;
use crate::config::AppConfig;
use crate::error::Result;
use crate::graph::auth::AccessToken;
use crate::graph::intune::{AppDirectory, IntuneService, MobileApp};
use crate::report;
use clap::Args;
use colored::Colorize;

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Only include apps whose display name contains this text
    #[arg(short, long)]
    filter: Option<String>,
}

/// `intunepub report`: print the tenant's app inventory
pub async fn report(config: &AppConfig, args: ReportArgs) -> Result<()> {
    let service = IntuneService::from_config(config);

    let spinner = progress::create_spinner("Requesting access token...");
    let token = match service.acquire_token().await {
        Ok(token) => {
            progress::finish_spinner_success(&spinner, "Access token acquired");
            token
        }
        Err(e) => {
            progress::finish_spinner_error(&spinner, "Authentication failed");
            return Err(e);
        }
    };

    print_inventory(&service, &token, args.filter.as_deref()).await
}

/// Fetch the inventory with `token` and print it as a table
pub async fn print_inventory<D: AppDirectory>(
    directory: &D,
    token: &AccessToken,
    filter: Option<&str>,
) -> Result<()> {
    let spinner = progress::create_spinner("Retrieving apps from Intune...");
    let apps = match directory.list_apps(token, filter).await {
        Ok(apps) => {
            progress::finish_spinner_success(&spinner, &format!("Retrieved {} apps", apps.len()));
            apps
        }
        Err(e) => {
            progress::finish_spinner_error(&spinner, "Failed to retrieve apps");
            return Err(e);
        }
    };

    print_report(&apps);
    Ok(())
}

pub fn print_report(apps: &[MobileApp]) {
    if apps.is_empty() {
        println!("{} No apps found", "→".cyan());
        return;
    }

    println!();
    println!(
        "{} {} ({} apps)",
        "Intune app report".cyan().bold(),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        apps.len()
    );
    println!("{}", report::render(&report::normalize(apps)));
}
