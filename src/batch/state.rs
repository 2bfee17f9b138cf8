//! Per-app workflow state machine
//!
//! Pure transitions: the driver performs the side effect for the current
//! stage, turns the result (or the user's answer) into an [`Event`] and asks
//! [`Stage::advance`] for the next stage. No backtracking.

/// Where an app ended up in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Disposition {
    Published,
    PackageFailed,
    PublishFailed,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Look for a package on disk
    LocalCheck,
    /// Run `wintuner package`
    Package,
    /// A package exists; ask whether to check Intune first
    Packaged,
    /// Query Intune for apps with a similar name
    IntuneCheck,
    /// Similar apps exist; ask whether to publish anyway
    ConfirmDespiteMatches,
    /// Ask whether to publish
    ConfirmPublish,
    /// Run `wintuner publish`
    Publish,
    Done(Disposition),
    /// No token could be obtained; the rest of the batch is abandoned
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    LocalPackage { found: bool },
    Packaging { succeeded: bool },
    CheckRequested(bool),
    CheckResult { matches: usize },
    ProceedDespiteMatches(bool),
    PublishRequested(bool),
    Publishing { succeeded: bool },
    TokenUnavailable,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done(_) | Stage::Aborted)
    }

    /// Next stage for `event`. Events that do not belong to the current stage
    /// leave it unchanged.
    pub fn advance(self, event: Event) -> Stage {
        match (self, event) {
            (Stage::LocalCheck, Event::LocalPackage { found: true }) => Stage::Packaged,
            (Stage::LocalCheck, Event::LocalPackage { found: false }) => Stage::Package,

            (Stage::Package, Event::Packaging { succeeded: true }) => Stage::Packaged,
            (Stage::Package, Event::Packaging { succeeded: false }) => {
                Stage::Done(Disposition::PackageFailed)
            }

            (Stage::Packaged, Event::CheckRequested(true)) => Stage::IntuneCheck,
            (Stage::Packaged, Event::CheckRequested(false)) => Stage::ConfirmPublish,

            (Stage::IntuneCheck, Event::CheckResult { matches: 0 }) => Stage::ConfirmPublish,
            (Stage::IntuneCheck, Event::CheckResult { .. }) => Stage::ConfirmDespiteMatches,

            (Stage::ConfirmDespiteMatches, Event::ProceedDespiteMatches(true)) => {
                Stage::ConfirmPublish
            }
            (Stage::ConfirmDespiteMatches, Event::ProceedDespiteMatches(false)) => {
                Stage::Done(Disposition::Skipped)
            }

            (Stage::ConfirmPublish, Event::PublishRequested(true)) => Stage::Publish,
            (Stage::ConfirmPublish, Event::PublishRequested(false)) => {
                Stage::Done(Disposition::Skipped)
            }

            (Stage::Publish, Event::Publishing { succeeded: true }) => {
                Stage::Done(Disposition::Published)
            }
            (Stage::Publish, Event::Publishing { succeeded: false }) => {
                Stage::Done(Disposition::PublishFailed)
            }
            (Stage::Publish, Event::TokenUnavailable) => Stage::Aborted,

            (stage, _) => stage,
        }
    }
}
