//! intunepub
//!
//! Packages WinGet apps with the wintuner tool and publishes them to
//! Microsoft Intune, checking the tenant's existing app inventory through
//! Microsoft Graph along the way.

pub mod batch;
pub mod cmd;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;
pub mod tui;
pub mod wintuner;

pub use error::{IntunePubError, Result};
