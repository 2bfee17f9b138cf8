//! Batch orchestration
//!
//! One batch = a list of app ids processed strictly one after another under
//! shared version/architecture/context settings. Each app walks the
//! [`state::Stage`] machine; the driver here performs the side effects.
//! User decisions come through the [`Prompter`] seam so the whole flow can
//! be driven without a console.

pub mod outcome;
pub mod state;

use crate::config::AppConfig;
use crate::error::Result;
use crate::graph::auth::AccessToken;
use crate::graph::intune::AppDirectory;
use crate::report;
use crate::tui::prompts;
use crate::wintuner::runner::ToolRunner;
use crate::wintuner::{self, local, Architecture, InstallerContext};
use colored::Colorize;
use std::fmt;

pub use outcome::BatchOutcome;
pub use state::{Disposition, Event, Stage};

/// Yes/no decisions the workflow asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    CheckIntune(String),
    PublishDespiteMatches(String),
    Publish(String),
    FullReport,
    AnotherBatch,
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Question::CheckIntune(id) => {
                write!(f, "Check if '{}' is already published on Intune?", id)
            }
            Question::PublishDespiteMatches(id) => write!(
                f,
                "App(s) with a name containing '{}' found in Intune. Publish anyway?",
                report::short_name(id)
            ),
            Question::Publish(id) => {
                write!(f, "Publish the packaged app '{}' to Intune?", id)
            }
            Question::FullReport => {
                write!(f, "Generate a full report of apps in your Intune tenant?")
            }
            Question::AnotherBatch => {
                write!(f, "Package and/or publish another batch of apps?")
            }
        }
    }
}

/// Source of user input for a session
pub trait Prompter {
    /// Comma-separated app ids, already split and de-duplicated
    fn app_ids(&mut self) -> Result<Vec<String>>;

    /// `None` means latest
    fn version(&mut self) -> Result<Option<String>>;

    fn architecture(&mut self) -> Result<Architecture>;

    fn installer_context(&mut self) -> Result<InstallerContext>;

    fn confirm(&mut self, question: &Question) -> Result<bool>;
}

/// Split a comma-separated id list, trimming blanks and dropping repeats
/// (case-insensitive, first spelling kept)
pub fn parse_app_ids(input: &str) -> Vec<String> {
    let mut ids: Vec<String> = Vec::new();
    for id in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !ids.iter().any(|seen| seen.eq_ignore_ascii_case(id)) {
            ids.push(id.to_string());
        }
    }
    ids
}

/// Settings shared by every app in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSettings {
    pub app_ids: Vec<String>,
    pub version: Option<String>,
    pub architecture: Architecture,
    pub installer_context: InstallerContext,
}

impl BatchSettings {
    pub fn new(app_ids: Vec<String>) -> Self {
        Self {
            app_ids,
            version: None,
            architecture: Architecture::default(),
            installer_context: InstallerContext::default(),
        }
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn version_label(&self) -> &str {
        wintuner::version_label(self.version())
    }

    /// Ask the prompter for everything a batch needs
    pub fn collect<P: Prompter>(prompter: &mut P) -> Result<Self> {
        let app_ids = loop {
            let ids = prompter.app_ids()?;
            if !ids.is_empty() {
                break ids;
            }
            prompts::error("App ID cannot be empty.");
        };

        let version = prompter
            .version()?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Self {
            app_ids,
            version,
            architecture: prompter.architecture()?,
            installer_context: prompter.installer_context()?,
        })
    }
}

#[derive(Debug)]
enum TokenSlot {
    Empty,
    Ready(AccessToken),
    Failed,
}

/// Per-batch state: the lazily acquired access token.
///
/// At most one token request is made per batch. A failed request is
/// remembered so later steps do not try again.
#[derive(Debug)]
pub struct BatchContext {
    token: TokenSlot,
    token_requests: usize,
}

impl Default for BatchContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchContext {
    pub fn new() -> Self {
        Self {
            token: TokenSlot::Empty,
            token_requests: 0,
        }
    }

    pub fn token_requests(&self) -> usize {
        self.token_requests
    }

    pub fn token_failed(&self) -> bool {
        matches!(self.token, TokenSlot::Failed)
    }

    /// Cached token, requesting it on first use
    pub async fn token<D: AppDirectory>(&mut self, directory: &D) -> Option<&AccessToken> {
        if let TokenSlot::Empty = self.token {
            self.token_requests += 1;
            self.token = match directory.acquire_token().await {
                Ok(token) => {
                    tracing::debug!("Access token acquired, expires at {:?}", token.expires_at);
                    TokenSlot::Ready(token)
                }
                Err(e) => {
                    prompts::error(&format!("Failed to obtain access token: {}", e));
                    TokenSlot::Failed
                }
            };
        }

        match &self.token {
            TokenSlot::Ready(token) => Some(token),
            _ => None,
        }
    }
}

/// Drives apps through the workflow
pub struct Orchestrator<'a, D, R> {
    config: &'a AppConfig,
    directory: &'a D,
    runner: &'a R,
}

impl<'a, D: AppDirectory, R: ToolRunner> Orchestrator<'a, D, R> {
    pub fn new(config: &'a AppConfig, directory: &'a D, runner: &'a R) -> Self {
        Self {
            config,
            directory,
            runner,
        }
    }

    /// Process every app in the batch and partition the ids by outcome.
    ///
    /// A token failure at publish time abandons the batch: the current app and
    /// every app after it are recorded as failed-publish.
    pub async fn run_batch<P: Prompter>(
        &self,
        settings: &BatchSettings,
        ctx: &mut BatchContext,
        prompter: &mut P,
    ) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for (index, app_id) in settings.app_ids.iter().enumerate() {
            prompts::section_header(&format!(
                "[{}/{}] {} ({})",
                index + 1,
                settings.app_ids.len(),
                app_id,
                settings.version_label()
            ));

            match self.process_app(app_id, settings, ctx, prompter).await? {
                Stage::Done(disposition) => outcome.record(app_id, disposition),
                _ => {
                    prompts::error("Cannot publish without an access token. Aborting this batch.");
                    for remaining in &settings.app_ids[index..] {
                        outcome.record(remaining, Disposition::PublishFailed);
                    }
                    break;
                }
            }
        }

        Ok(outcome)
    }

    /// Walk one app to a terminal stage (`Done` or `Aborted`)
    pub async fn process_app<P: Prompter>(
        &self,
        app_id: &str,
        settings: &BatchSettings,
        ctx: &mut BatchContext,
        prompter: &mut P,
    ) -> Result<Stage> {
        let mut stage = Stage::LocalCheck;

        while !stage.is_terminal() {
            let event = match stage {
                Stage::LocalCheck => Event::LocalPackage {
                    found: self.check_local(app_id, settings),
                },
                Stage::Package => Event::Packaging {
                    succeeded: self.package(app_id, settings).await,
                },
                Stage::Packaged => {
                    Event::CheckRequested(prompter.confirm(&Question::CheckIntune(app_id.into()))?)
                }
                Stage::IntuneCheck => Event::CheckResult {
                    matches: self.check_intune(app_id, ctx).await,
                },
                Stage::ConfirmDespiteMatches => Event::ProceedDespiteMatches(
                    prompter.confirm(&Question::PublishDespiteMatches(app_id.into()))?,
                ),
                Stage::ConfirmPublish => {
                    let publish = prompter.confirm(&Question::Publish(app_id.into()))?;
                    if !publish {
                        prompts::warning(&format!("Skipping publishing of {}.", app_id));
                    }
                    Event::PublishRequested(publish)
                }
                Stage::Publish => self.publish(app_id, settings, ctx).await,
                Stage::Done(_) | Stage::Aborted => break,
            };

            let next = stage.advance(event);
            tracing::debug!("{}: {:?} --{:?}--> {:?}", app_id, stage, event, next);
            stage = next;
        }

        Ok(stage)
    }

    fn check_local(&self, app_id: &str, settings: &BatchSettings) -> bool {
        let found = local::exists(app_id, settings.version(), self.config);
        if found {
            prompts::info(&format!(
                "Local package found for {} version {}.",
                app_id,
                settings.version_label()
            ));
        }
        found
    }

    async fn package(&self, app_id: &str, settings: &BatchSettings) -> bool {
        let description = format!("Packaging {} version {}", app_id, settings.version_label());
        let args = wintuner::package_args(
            app_id,
            &self.config.download_dir,
            settings.architecture,
            settings.installer_context,
            settings.version(),
        );

        match self
            .runner
            .run(&args, &description)
            .await
            .and_then(|output| output.into_result(&description))
        {
            Ok(_) => {
                let path =
                    local::package_path(&self.config.download_dir, app_id, settings.version());
                prompts::success(&format!("Package created in {}", path.display()));
                true
            }
            Err(e) => {
                prompts::error(&e.to_string());
                false
            }
        }
    }

    /// Number of existing Intune apps whose name looks like `app_id`.
    /// An unavailable check counts as no matches.
    async fn check_intune(&self, app_id: &str, ctx: &mut BatchContext) -> usize {
        println!("{} Checking Intune for '{}'...", "→".cyan(), app_id);

        let prefix = report::short_name(app_id.trim());
        if prefix.is_empty() {
            prompts::warning(&format!("Cannot derive a name to search for from '{}'.", app_id));
            return 0;
        }

        let Some(token) = ctx.token(self.directory).await else {
            prompts::warning("Intune check unavailable without an access token.");
            return 0;
        };

        let apps = match self.directory.list_apps(token, Some(prefix)).await {
            Ok(apps) => apps,
            Err(e) => {
                prompts::warning(&format!("Could not retrieve the Intune app list: {}", e));
                return 0;
            }
        };

        let rows = report::normalize(&apps);
        let matches = report::find_matches(app_id, &rows);

        if matches.is_empty() {
            prompts::success(&format!(
                "No app with a name containing '{}' found in Intune.",
                prefix
            ));
        }
        for row in &matches {
            prompts::warning(&format!(
                "App '{}' (ID: {}, Version: {}) found in Intune.",
                row.name, row.id, row.version
            ));
        }

        matches.len()
    }

    async fn publish(
        &self,
        app_id: &str,
        settings: &BatchSettings,
        ctx: &mut BatchContext,
    ) -> Event {
        let Some(token) = ctx.token(self.directory).await else {
            return Event::TokenUnavailable;
        };

        let description = format!(
            "Publishing {} version {} to Intune",
            app_id,
            settings.version_label()
        );
        let args = wintuner::publish_args(
            app_id,
            &self.config.download_dir,
            &self.config.tenant_id,
            token.secret(),
            settings.version(),
        );

        let succeeded = match self
            .runner
            .run(&args, &description)
            .await
            .and_then(|output| output.into_result(&description))
        {
            Ok(_) => {
                prompts::success(&format!("Successfully published {} to Intune.", app_id));
                true
            }
            Err(e) => {
                prompts::error(&e.to_string());
                prompts::error(&format!("Failed to publish {} to Intune.", app_id));
                false
            }
        };

        Event::Publishing { succeeded }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IntunePubError;
    use crate::graph::intune::MobileApp;
    use crate::wintuner::runner::ToolOutput;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct ScriptedPrompter {
        answers: VecDeque<bool>,
        asked: Vec<Question>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn app_ids(&mut self) -> Result<Vec<String>> {
            unreachable!("settings are built directly in these tests")
        }

        fn version(&mut self) -> Result<Option<String>> {
            Ok(None)
        }

        fn architecture(&mut self) -> Result<Architecture> {
            Ok(Architecture::X64)
        }

        fn installer_context(&mut self) -> Result<InstallerContext> {
            Ok(InstallerContext::System)
        }

        fn confirm(&mut self, question: &Question) -> Result<bool> {
            self.asked.push(question.clone());
            Ok(self
                .answers
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected question: {question}")))
        }
    }

    #[derive(Default)]
    struct FakeDirectory {
        fail_token: bool,
        apps: Vec<MobileApp>,
        token_calls: Cell<usize>,
        filters: RefCell<Vec<Option<String>>>,
    }

    impl AppDirectory for FakeDirectory {
        async fn acquire_token(&self) -> Result<AccessToken> {
            self.token_calls.set(self.token_calls.get() + 1);
            if self.fail_token {
                Err(IntunePubError::AuthError("invalid_client: bad secret".into()))
            } else {
                Ok(AccessToken::new("token-123"))
            }
        }

        async fn list_apps(
            &self,
            _token: &AccessToken,
            name_filter: Option<&str>,
        ) -> Result<Vec<MobileApp>> {
            self.filters.borrow_mut().push(name_filter.map(str::to_string));
            Ok(self.apps.clone())
        }
    }

    /// Emulates wintuner: successful packaging creates the package folder
    struct FakeRunner {
        download_dir: PathBuf,
        failing_packages: Vec<&'static str>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn new(download_dir: PathBuf) -> Self {
            Self {
                download_dir,
                failing_packages: Vec::new(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls
                .borrow()
                .iter()
                .map(|args| (args[0].clone(), args[1].clone()))
                .collect()
        }
    }

    impl ToolRunner for FakeRunner {
        async fn run(&self, args: &[String], _description: &str) -> Result<ToolOutput> {
            self.calls.borrow_mut().push(args.to_vec());
            let app_id = args[1].as_str();

            let success =
                !(args[0] == "package" && self.failing_packages.iter().any(|id| *id == app_id));
            if success && args[0] == "package" {
                let version = args
                    .iter()
                    .position(|a| a == "--version")
                    .map(|i| args[i + 1].as_str());
                std::fs::create_dir_all(local::package_path(&self.download_dir, app_id, version))?;
            }

            Ok(ToolOutput {
                success,
                status: if success { "exit status: 0" } else { "exit status: 1" }.into(),
                stdout: vec![],
                stderr: if success {
                    vec![]
                } else {
                    vec![format!("No package found for {}", app_id)]
                },
            })
        }
    }

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            tenant_id: "tenant-1".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            download_dir: dir.path().join("downloads"),
            temp_dir: dir.path().join("temp"),
            tool_path: "wintuner".into(),
            tool_timeout: None,
        }
    }

    fn settings(ids: &[&str]) -> BatchSettings {
        BatchSettings::new(ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_parse_app_ids() {
        assert_eq!(
            parse_app_ids(" Zoom.Zoom, ,BadId.Pkg,zoom.zoom ,Git.Git"),
            ["Zoom.Zoom", "BadId.Pkg", "Git.Git"]
        );
        assert!(parse_app_ids(" , ").is_empty());
    }

    #[tokio::test]
    async fn test_firefox_packages_latest_and_publishes() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory::default();
        let runner = FakeRunner::new(config.download_dir.clone());
        let mut prompter = ScriptedPrompter::new(&[false, true]);
        let mut ctx = BatchContext::new();

        assert!(!local::exists("Mozilla.Firefox", None, &config));

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Mozilla.Firefox"]), &mut ctx, &mut prompter)
            .await
            .unwrap();

        let calls = runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0][0], "package");
        assert!(!calls[0].contains(&"--version".to_string()));
        assert_eq!(calls[1][..2], ["publish", "Mozilla.Firefox"]);
        assert!(calls[1].contains(&"token-123".to_string()));

        assert!(local::exists("Mozilla.Firefox", None, &config));
        assert!(config.download_dir.join("Mozilla.Firefox").join("latest").is_dir());
        assert_eq!(outcome.published, ["Mozilla.Firefox"]);
    }

    #[tokio::test]
    async fn test_existing_local_package_is_not_repackaged() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        std::fs::create_dir_all(config.download_dir.join("Git.Git").join("latest")).unwrap();
        let directory = FakeDirectory::default();
        let runner = FakeRunner::new(config.download_dir.clone());
        let mut prompter = ScriptedPrompter::new(&[false, false]);

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Git.Git"]), &mut BatchContext::new(), &mut prompter)
            .await
            .unwrap();

        assert!(runner.calls.borrow().is_empty());
        assert_eq!(outcome.skipped, ["Git.Git"]);
        assert_eq!(directory.token_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_packaging_failure_does_not_block_siblings() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory::default();
        let mut runner = FakeRunner::new(config.download_dir.clone());
        runner.failing_packages.push("BadId.Pkg");
        // Zoom: no Intune check, publish. BadId: no questions asked.
        let mut prompter = ScriptedPrompter::new(&[false, true]);

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(
                &settings(&["Zoom.Zoom", "BadId.Pkg"]),
                &mut BatchContext::new(),
                &mut prompter,
            )
            .await
            .unwrap();

        assert_eq!(outcome.published, ["Zoom.Zoom"]);
        assert_eq!(outcome.package_failed, ["BadId.Pkg"]);
        assert_eq!(outcome.total(), 2);
        assert_eq!(
            runner.calls(),
            [
                ("package".to_string(), "Zoom.Zoom".to_string()),
                ("publish".to_string(), "Zoom.Zoom".to_string()),
                ("package".to_string(), "BadId.Pkg".to_string()),
            ]
        );
        assert!(prompter.answers.is_empty());
    }

    #[tokio::test]
    async fn test_token_failure_aborts_rest_of_batch() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory {
            fail_token: true,
            ..Default::default()
        };
        let runner = FakeRunner::new(config.download_dir.clone());
        // app 1: no check, decline publish. app 2: no check, publish -> token fails.
        let mut prompter = ScriptedPrompter::new(&[false, false, false, true]);
        let mut ctx = BatchContext::new();

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["A.One", "B.Two", "C.Three"]), &mut ctx, &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, ["A.One"]);
        assert_eq!(outcome.publish_failed, ["B.Two", "C.Three"]);
        assert_eq!(outcome.total(), 3);
        assert_eq!(directory.token_calls.get(), 1);
        assert_eq!(ctx.token_requests(), 1);
        assert!(ctx.token_failed());
        // C.Three was never packaged
        assert!(!runner.calls().iter().any(|(_, id)| id == "C.Three"));
    }

    #[tokio::test]
    async fn test_check_without_token_is_unavailable_then_publish_aborts() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory {
            fail_token: true,
            ..Default::default()
        };
        let runner = FakeRunner::new(config.download_dir.clone());
        // check yes -> unavailable, counted as no match -> publish yes -> abort
        let mut prompter = ScriptedPrompter::new(&[true, true]);
        let mut ctx = BatchContext::new();

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Zoom.Zoom", "Git.Git"]), &mut ctx, &mut prompter)
            .await
            .unwrap();

        assert_eq!(
            prompter.asked,
            [
                Question::CheckIntune("Zoom.Zoom".into()),
                Question::Publish("Zoom.Zoom".into()),
            ]
        );
        assert_eq!(outcome.publish_failed, ["Zoom.Zoom", "Git.Git"]);
        assert!(directory.filters.borrow().is_empty());
        assert_eq!(directory.token_calls.get(), 1);
        assert!(ctx.token_failed());
    }

    #[tokio::test]
    async fn test_token_is_reused_across_apps() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory::default();
        let runner = FakeRunner::new(config.download_dir.clone());
        let mut prompter = ScriptedPrompter::new(&[true, true, true, true]);
        let mut ctx = BatchContext::new();

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Zoom.Zoom", "Git.Git"]), &mut ctx, &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.published, ["Zoom.Zoom", "Git.Git"]);
        assert_eq!(directory.token_calls.get(), 1);
        assert_eq!(
            *directory.filters.borrow(),
            [Some("Zoom".to_string()), Some("Git".to_string())]
        );
    }

    #[tokio::test]
    async fn test_intune_match_declined_is_skipped() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory {
            apps: vec![MobileApp {
                id: Some("app-1".into()),
                display_name: Some("Zoom Workplace".into()),
                odata_type: Some("#microsoft.graph.win32LobApp".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let runner = FakeRunner::new(config.download_dir.clone());
        let mut prompter = ScriptedPrompter::new(&[true, false]);

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Zoom.Zoom"]), &mut BatchContext::new(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, ["Zoom.Zoom"]);
        assert_eq!(
            prompter.asked,
            [
                Question::CheckIntune("Zoom.Zoom".into()),
                Question::PublishDespiteMatches("Zoom.Zoom".into()),
            ]
        );
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unrelated_inventory_counts_as_no_match() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory {
            apps: vec![MobileApp {
                display_name: Some("Firefox".into()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let runner = FakeRunner::new(config.download_dir.clone());
        // check yes, no match -> straight to publish question (declined)
        let mut prompter = ScriptedPrompter::new(&[true, false]);

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&["Zoom.Zoom"]), &mut BatchContext::new(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.skipped, ["Zoom.Zoom"]);
        assert_eq!(prompter.asked[1], Question::Publish("Zoom.Zoom".into()));
    }

    #[tokio::test]
    async fn test_every_app_lands_in_exactly_one_list() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&dir);
        let directory = FakeDirectory::default();
        let mut runner = FakeRunner::new(config.download_dir.clone());
        runner.failing_packages.push("Bad.One");
        let ids = ["Good.One", "Bad.One", "Good.Two"];
        let mut prompter = ScriptedPrompter::new(&[false, true, false, false]);

        let outcome = Orchestrator::new(&config, &directory, &runner)
            .run_batch(&settings(&ids), &mut BatchContext::new(), &mut prompter)
            .await
            .unwrap();

        assert_eq!(outcome.total(), ids.len());
        for id in ids {
            assert!(outcome.disposition_of(id).is_some(), "{id} has no disposition");
        }
    }
}
