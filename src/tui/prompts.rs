//! Interactive console prompts
//!
//! Thin wrappers over dialoguer plus the colored status lines used across
//! the publish workflow.

use crate::batch::{self, Prompter, Question};
use crate::error::{IntunePubError, Result};
use crate::wintuner::{Architecture, InstallerContext};
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::io::ErrorKind;

/// Ctrl+C while a prompt is open surfaces as an interrupted read
fn prompt_error(e: dialoguer::Error) -> IntunePubError {
    match e {
        dialoguer::Error::IO(io) if io.kind() == ErrorKind::Interrupted => {
            IntunePubError::Interrupted
        }
        other => other.into(),
    }
}

/// Prompt for yes/no confirmation with a default value
pub fn confirm(message: &str, default: bool) -> Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(default)
        .interact()
        .map_err(prompt_error)
}

/// Prompt for free text. Empty answers are allowed when `allow_empty` is set.
pub fn input(message: &str, allow_empty: bool) -> Result<String> {
    let result: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(prompt_error)?;
    Ok(result.trim().to_string())
}

/// Prompt for selection from a list of options
pub fn select<T: ToString>(message: &str, options: &[T], default: usize) -> Result<usize> {
    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();
    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .items(&items)
        .default(default)
        .interact()
        .map_err(prompt_error)
}

/// Display a section header
pub fn section_header(title: &str) {
    println!();
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(60).dimmed());
}

/// Display a success message
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Display an info message
pub fn info(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

/// Display a warning message
pub fn warning(message: &str) {
    println!("{} {}", "!".yellow().bold(), message);
}

/// Display an error message
pub fn error(message: &str) {
    println!("{} {}", "✗".red().bold(), message);
}

/// Index of `value` in `all`, for menu defaults
fn position<T: PartialEq>(all: &[T], value: &T) -> usize {
    all.iter().position(|v| v == value).unwrap_or(0)
}

/// [`Prompter`] backed by the terminal
#[derive(Debug, Default)]
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn app_ids(&mut self) -> Result<Vec<String>> {
        let raw = input(
            "Enter the WinGet app ID(s) to package (comma-separated, e.g. Mozilla.Firefox,Zoom.Zoom)",
            true,
        )?;
        Ok(batch::parse_app_ids(&raw))
    }

    fn version(&mut self) -> Result<Option<String>> {
        let raw = input("Enter the version to package (leave blank for latest)", true)?;
        Ok(Some(raw).filter(|v| !v.is_empty()))
    }

    fn architecture(&mut self) -> Result<Architecture> {
        let index = select(
            "Select the architecture",
            &Architecture::ALL,
            position(&Architecture::ALL, &Architecture::default()),
        )?;
        Ok(Architecture::ALL[index])
    }

    fn installer_context(&mut self) -> Result<InstallerContext> {
        let index = select(
            "Select the installer context",
            &InstallerContext::ALL,
            position(&InstallerContext::ALL, &InstallerContext::default()),
        )?;
        Ok(InstallerContext::ALL[index])
    }

    fn confirm(&mut self, question: &Question) -> Result<bool> {
        confirm(&question.to_string(), false)
    }
}
