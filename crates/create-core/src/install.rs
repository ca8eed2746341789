//! Wire the product SDK into an existing project
//!
//! The backend is chosen by the project's own lockfile so the install lands
//! in the lockfile the project already maintains; the user-agent environment
//! is the fallback for projects that haven't installed anything yet.

use std::path::PathBuf;

#[cfg(feature = "tui")]
use crate::error::Error;
#[cfg(feature = "tui")]
use crate::product::ProductConfig;
#[cfg(feature = "tui")]
use crate::update::detect::PackageManager;
#[cfg(feature = "tui")]
use anyhow::{Context, Result};

/// Inputs to the install flow, mapped from each binary's clap surface
#[derive(Debug, Clone, Default)]
pub struct InstallArgs {
    /// Project to install into; defaults to the current directory
    pub path: Option<PathBuf>,
    /// Install the nightly version of the SDK
    pub nightly: bool,
    /// Install the dev version of the SDK
    pub dev: bool,
}

/// Package spec for the requested release channel
fn sdk_spec(package: &str, args: &InstallArgs) -> String {
    if args.nightly {
        format!("{}@nightly", package)
    } else if args.dev {
        format!("{}@dev", package)
    } else {
        package.to_string()
    }
}

#[cfg(feature = "tui")]
pub async fn install<C: ProductConfig>(config: &C, args: InstallArgs) -> Result<()> {
    let project_dir = match &args.path {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    if !project_dir.join("package.json").is_file() {
        anyhow::bail!(
            "No project manifest found in {}. Run this inside a project, or pass its path.",
            project_dir.display()
        );
    }

    let backend = PackageManager::from_lockfile(&project_dir)
        .unwrap_or_else(PackageManager::from_user_agent_env);
    let spec = sdk_spec(config.sdk_package(), &args);

    cliclack::intro(config.display_name())?;
    cliclack::log::info(format!("Installing {} with {}", spec, backend))?;

    let command = backend.add_command(&spec);
    let status = tokio::process::Command::new(&command[0])
        .args(&command[1..])
        .current_dir(&project_dir)
        .status()
        .await
        .with_context(|| format!("Failed to run {}", command.join(" ")))?;

    if !status.success() {
        return Err(Error::Subprocess {
            command: command.join(" "),
            code: status.code().unwrap_or(1),
        }
        .into());
    }

    cliclack::outro(format!("Installed {}", spec))?;
    Ok(())
}
