//! Create Core - Shared library for project scaffolding CLIs
//!
//! This library provides the core functionality for provisioning new projects
//! from remote templates and for keeping the CLI itself up to date. It is
//! designed to be used by multiple CLI binaries (e.g., `forgelab`, `dappmint`)
//! that share the same underlying logic but have different product
//! configurations.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - version gate, update checker, installation
//!   detection, template fetching, name validation
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait, the upgrade
//!   state machine, and the scaffolding pipeline
//! - **Layer 3: CLI/TUI Interface** - cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the interactive cliclack-based flows
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use create_core::{ProductConfig, update};
//!
//! // Define your product config
//! #[derive(Clone)]
//! struct MyConfig;
//! impl ProductConfig for MyConfig {
//!     fn name(&self) -> &'static str { "myapp" }
//!     // ... implement other methods
//! }
//!
//! // Use the low-level APIs
//! let checker = update::UpdateChecker::from_config(&MyConfig)?;
//! let info = checker.fetch_latest("myapp", "0.2.1").await?;
//! ```

pub mod error;
pub mod install;
pub mod product;
pub mod scaffold;
pub mod templates;
pub mod update;

// Re-export main types for convenience
pub use error::Error;
pub use product::ProductConfig;
pub use scaffold::{
    validate_project_name, CreateArgs, Framework, Language, ScaffoldRequest, ScaffoldWriter,
};
pub use templates::TemplateFetcher;
pub use update::{
    Freshness, Installation, PackageManager, UpgradeOutcome, UpgradePlan, VersionGate, VersionInfo,
};

/// CLI version - used when a binary does not supply its own
pub const DEFAULT_CLI_VERSION: &str = "0.2.1";

/// Returns true when the product's suppression flag is set in the
/// environment. The flag silences the banner and the whole update flow; it is
/// set on child processes during re-exec to prevent recursive update checks.
pub fn intro_suppressed<C: ProductConfig>(config: &C) -> bool {
    std::env::var(config.skip_env()).as_deref() == Ok("true")
}
