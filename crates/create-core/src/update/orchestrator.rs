//! Upgrade orchestration
//!
//! On a stale version the orchestrator prompts, upgrades through the backend
//! that owns the installation, and re-executes the original command line in a
//! fresh child carrying the recursion-suppression flag. When the CLI is not
//! installed anywhere it defers to a one-shot run of the latest release via
//! the runner instead. The version-check record is always written before any
//! upgrade decision is acted on.

use crate::error::Error;
use crate::update::detect::{Installation, PackageManager};

#[cfg(feature = "tui")]
use crate::product::ProductConfig;
#[cfg(feature = "tui")]
use crate::update::{checker::UpdateChecker, detect, gate::VersionGate};
#[cfg(feature = "tui")]
use anyhow::Result;

/// What the primary command should do after the update flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeOutcome {
    /// No upgrade happened; run the primary command in this process
    Proceed,
    /// A child process ran the command; exit with its code
    Completed(i32),
}

/// Argument vectors for the selected upgrade path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpgradePlan {
    /// Not installed anywhere: run the latest release once through the runner
    OneShot { command: Vec<String> },
    /// Managed install: upgrade in place, then re-exec the original argv
    Managed {
        install: Vec<String>,
        reexec: Vec<String>,
    },
}

fn owned(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Select the upgrade commands for an installation.
///
/// A local installation whose backend could not be identified is fatal:
/// guessing an install command could corrupt the user's project.
pub fn plan_upgrade(
    installation: Installation,
    package: &str,
    argv: &[String],
) -> Result<UpgradePlan, Error> {
    let latest = format!("{}@latest", package);

    let install = match installation {
        Installation::Absent => {
            let mut command = owned(&["npx", "--yes", latest.as_str()]);
            command.extend(argv.iter().cloned());
            return Ok(UpgradePlan::OneShot { command });
        }
        Installation::Local(None) => {
            return Err(Error::Detection(format!(
                "Could not detect the package manager managing {}, aborting automatic upgrade.\n\
                 If you want to upgrade the CLI, please do it manually with your package manager.",
                package
            )));
        }
        Installation::Local(Some(PackageManager::Npm)) => owned(&["npm", "install", package]),
        Installation::Global(PackageManager::Npm) => owned(&["npm", "install", "-g", package]),
        Installation::Local(Some(PackageManager::Yarn)) => owned(&["yarn", "add", package]),
        Installation::Global(PackageManager::Yarn) => owned(&["yarn", "global", "add", package]),
        Installation::Local(Some(PackageManager::Pnpm)) => owned(&["pnpm", "add", latest.as_str()]),
        Installation::Global(PackageManager::Pnpm) => owned(&["pnpm", "add", "-g", latest.as_str()]),
    };

    // A yarn or pnpm global install isn't visible to the runner, so the
    // re-exec must invoke the binary directly in that case.
    let direct = matches!(
        installation,
        Installation::Global(PackageManager::Yarn) | Installation::Global(PackageManager::Pnpm)
    );
    let mut reexec = if direct {
        owned(&[package])
    } else {
        owned(&["npx", package])
    };
    reexec.extend(argv.iter().cloned());

    Ok(UpgradePlan::Managed { install, reexec })
}

/// Spawn a child with inherited standard I/O and the suppression flag set;
/// returns the child's exit code once it has fully exited.
#[cfg(feature = "tui")]
async fn run_inherited(command: &[String], skip_env: &str) -> Result<i32> {
    let status = tokio::process::Command::new(&command[0])
        .args(&command[1..])
        .env(skip_env, "true")
        .status()
        .await?;
    Ok(status.code().unwrap_or(1))
}

/// Run an install command with captured output; non-zero exit is fatal.
#[cfg(feature = "tui")]
async fn run_captured(command: &[String], skip_env: &str) -> Result<(), Error> {
    let output = tokio::process::Command::new(&command[0])
        .args(&command[1..])
        .env(skip_env, "true")
        .output()
        .await
        .map_err(|e| Error::Subprocess {
            command: command.join(" "),
            code: e.raw_os_error().unwrap_or(1),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
        return Err(Error::Subprocess {
            command: command.join(" "),
            code: output.status.code().unwrap_or(1),
        });
    }
    Ok(())
}

/// Run the self-update state machine ahead of the primary command.
///
/// Returns `Proceed` whenever this run should continue on the current
/// version: check not due, registry unreachable, already latest, or the user
/// declined. Returns `Completed` when a child process replaced this
/// invocation, carrying its exit code.
#[cfg(feature = "tui")]
pub async fn run_update_flow<C: ProductConfig>(
    config: &C,
    current_version: &str,
    argv: &[String],
) -> Result<UpgradeOutcome> {
    let gate = VersionGate::for_product(config);
    if !gate.should_check() {
        return Ok(UpgradeOutcome::Proceed);
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking for updates...");
    let result = match UpdateChecker::from_config(config) {
        Ok(checker) => checker.fetch_latest(config.name(), current_version).await,
        Err(e) => Err(e),
    };
    // Written regardless of outcome so repeated failures don't cause
    // repeated network calls within the TTL window.
    gate.record_check();

    let info = match result {
        Ok(info) => info,
        Err(_) => {
            spinner.stop("Could not check for updates");
            return Ok(UpgradeOutcome::Proceed);
        }
    };

    if !info.is_outdated() {
        spinner.stop("CLI is up to date");
        return Ok(UpgradeOutcome::Proceed);
    }
    spinner.stop(format!("Version {} is available", info.latest_display()));

    let upgrade: bool =
        cliclack::confirm("A new version of the CLI is available. Would you like to upgrade?")
            .initial_value(true)
            .interact()?;
    if !upgrade {
        return Ok(UpgradeOutcome::Proceed);
    }

    let installation = detect::detect(config.name());
    match plan_upgrade(installation, config.name(), argv)? {
        UpgradePlan::OneShot { command } => {
            cliclack::log::success(format!(
                "Now using CLI version {}. Continuing execution...",
                info.latest_display()
            ))?;
            let code = run_inherited(&command, config.skip_env()).await?;
            Ok(UpgradeOutcome::Completed(code))
        }
        UpgradePlan::Managed { install, reexec } => {
            let spinner = cliclack::spinner();
            spinner.start(format!("Upgrading CLI to version {}...", info.latest_display()));
            match run_captured(&install, config.skip_env()).await {
                Ok(()) => {}
                Err(e) => {
                    spinner.stop("Upgrade failed");
                    return Err(e.into());
                }
            }
            spinner.stop(format!(
                "Successfully upgraded CLI to version {}. Continuing execution...",
                info.latest_display()
            ));
            let code = run_inherited(&reexec, config.skip_env()).await?;
            Ok(UpgradeOutcome::Completed(code))
        }
    }
}
