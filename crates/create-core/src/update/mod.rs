//! Self-update lifecycle
//!
//! This module provides:
//! - The persisted, time-boxed version-check gate
//! - The registry query classifying the local version's freshness
//! - Installation detection (local vs. global, which package manager)
//! - The upgrade orchestration state machine

pub mod checker;
pub mod detect;
pub mod gate;
pub mod orchestrator;

pub use checker::{Freshness, UpdateChecker, VersionInfo};
pub use detect::{Installation, PackageManager};
pub use gate::VersionGate;
pub use orchestrator::{plan_upgrade, UpgradeOutcome, UpgradePlan};

#[cfg(feature = "tui")]
pub use orchestrator::run_update_flow;
