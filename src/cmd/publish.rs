//! Interactive package-and-publish session

use crate::batch::{BatchContext, BatchSettings, Orchestrator, Prompter, Question};
use crate::cmd::report;
use crate::config::AppConfig;
use crate::error::Result;
use crate::graph::intune::{AppDirectory, IntuneService};
use crate::tui::prompts::{self, ConsolePrompter};
use crate::wintuner::runner::{ToolRunner, WintunerRunner};
use colored::Colorize;

/// `intunepub publish` (also the default command)
pub async fn publish(config: &AppConfig) -> Result<()> {
    let directory = IntuneService::from_config(config);
    let runner = WintunerRunner::from_config(config);
    let mut prompter = ConsolePrompter;

    tracing::debug!(
        "Using {} with package folder {}",
        runner.program(),
        config.download_dir.display()
    );

    let batches = run_session(config, &directory, &runner, &mut prompter).await?;
    tracing::debug!("Session finished after {} batch(es)", batches);
    Ok(())
}

/// Batches until the user declines another one. Returns the number of
/// batches run.
pub async fn run_session<D, R, P>(
    config: &AppConfig,
    directory: &D,
    runner: &R,
    prompter: &mut P,
) -> Result<usize>
where
    D: AppDirectory,
    R: ToolRunner,
    P: Prompter,
{
    println!("{}", "Intune app packager".cyan().bold());
    println!(
        "  Package folder: {}",
        config.download_dir.display().to_string().dimmed()
    );

    let orchestrator = Orchestrator::new(config, directory, runner);
    let mut batches = 0;

    loop {
        let settings = BatchSettings::collect(prompter)?;
        let mut ctx = BatchContext::new();
        batches += 1;

        prompts::info(&format!(
            "Processing {} app(s), version {}, {} / {}",
            settings.app_ids.len(),
            settings.version_label(),
            settings.architecture,
            settings.installer_context
        ));

        let outcome = orchestrator.run_batch(&settings, &mut ctx, prompter).await?;
        outcome.print_summary();

        if prompter.confirm(&Question::FullReport)? {
            match ctx.token(directory).await {
                Some(token) => {
                    if let Err(e) = report::print_inventory(directory, token, None).await {
                        prompts::error(&format!("Could not generate the report: {}", e));
                    }
                }
                None => prompts::warning("Report unavailable without an access token."),
            }
        }

        if !prompter.confirm(&Question::AnotherBatch)? {
            break;
        }
    }

    println!("{} Done.", "✓".green().bold());
    Ok(batches)
}
