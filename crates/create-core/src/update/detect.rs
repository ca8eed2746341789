//! Installation detection: local vs. global, and the governing backend
//!
//! Local project-scoped installs take precedence over global ones, since
//! upgrading the wrong scope silently fixes nothing for the user's actual
//! invocation path.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Package-manager backend responsible for an installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn command(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    /// Lockfiles each backend leaves behind, in probe order
    pub const LOCKFILES: &'static [(&'static str, PackageManager)] = &[
        ("package-lock.json", PackageManager::Npm),
        ("yarn.lock", PackageManager::Yarn),
        ("pnpm-lock.yaml", PackageManager::Pnpm),
    ];

    /// Backend identified by a lockfile present in `dir`, probed in fixed order
    pub fn from_lockfile(dir: &Path) -> Option<Self> {
        Self::LOCKFILES
            .iter()
            .find(|(name, _)| dir.join(name).is_file())
            .map(|(_, backend)| *backend)
    }

    /// Backend the user invoked us through, from `npm_config_user_agent`
    /// (set by npm, yarn, and pnpm when running package scripts)
    pub fn from_user_agent_env() -> Self {
        match std::env::var("npm_config_user_agent") {
            Ok(agent) if agent.starts_with("yarn") => PackageManager::Yarn,
            Ok(agent) if agent.starts_with("pnpm") => PackageManager::Pnpm,
            _ => PackageManager::Npm,
        }
    }

    /// Command to add `package` to the project in the current directory
    pub fn add_command(&self, package: &str) -> Vec<String> {
        let owned = |parts: &[&str]| parts.iter().map(|s| s.to_string()).collect();
        match self {
            PackageManager::Npm => owned(&["npm", "install", package]),
            PackageManager::Yarn => owned(&["yarn", "add", package]),
            PackageManager::Pnpm => owned(&["pnpm", "add", package]),
        }
    }
}

impl std::fmt::Display for PackageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// Where the CLI is installed, recomputed on each upgrade attempt
///
/// `Absent` is a first-class case: the upgrade flow then defers to a one-shot
/// run of the latest release through the runner instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Installation {
    /// Listed in a project manifest; `None` means the governing lockfile
    /// could not be identified
    Local(Option<PackageManager>),
    Global(PackageManager),
    Absent,
}

/// Subset of package.json needed to spot a dependency
#[derive(Debug, Deserialize)]
struct ProjectManifest {
    #[serde(default)]
    dependencies: BTreeMap<String, String>,
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, String>,
}

impl ProjectManifest {
    fn depends_on(&self, package: &str) -> bool {
        self.dependencies.contains_key(package) || self.dev_dependencies.contains_key(package)
    }
}

/// Detect where `package` is installed, checking local evidence first and
/// then the global registries of each backend in fixed order.
pub fn detect(package: &str) -> Installation {
    let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    if let Some(local) = detect_local(&cwd, package) {
        return local;
    }
    if let Some(backend) = detect_global(package) {
        return Installation::Global(backend);
    }
    Installation::Absent
}

/// Walk up from `start`; the first directory whose manifest lists `package`
/// wins, with the backend identified by the lockfile beside it.
pub fn detect_local(start: &Path, package: &str) -> Option<Installation> {
    for dir in start.ancestors() {
        let manifest_path = dir.join("package.json");
        let Ok(content) = std::fs::read_to_string(&manifest_path) else {
            continue;
        };
        let Ok(manifest) = serde_json::from_str::<ProjectManifest>(&content) else {
            continue;
        };
        if manifest.depends_on(package) {
            return Some(Installation::Local(PackageManager::from_lockfile(dir)));
        }
    }
    None
}

/// Probe each backend's global registry for `package`, npm first
fn detect_global(package: &str) -> Option<PackageManager> {
    if probe(&["npm", "ls", "-g", "--depth=0", package], package) {
        return Some(PackageManager::Npm);
    }
    if probe(&["yarn", "global", "list", "--depth=0"], package) {
        return Some(PackageManager::Yarn);
    }
    if probe(&["pnpm", "ls", "-g", package], package) {
        return Some(PackageManager::Pnpm);
    }
    None
}

/// Run a listing command; a hit is a zero exit with the package named in
/// stdout (yarn and pnpm exit zero even on empty listings)
fn probe(command: &[&str], package: &str) -> bool {
    Command::new(command[0])
        .args(&command[1..])
        .output()
        .map(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).contains(package)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PKG: &str = "forgelab";

    fn write_manifest(dir: &Path, dev: bool) {
        let manifest = if dev {
            format!(r#"{{"devDependencies": {{"{}": "^0.2.0"}}}}"#, PKG)
        } else {
            format!(r#"{{"dependencies": {{"{}": "^0.2.0"}}}}"#, PKG)
        };
        fs::write(dir.join("package.json"), manifest).unwrap();
    }

    #[test]
    fn lockfile_identifies_each_backend() {
        for (lockfile, expected) in PackageManager::LOCKFILES {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join(lockfile), "").unwrap();
            assert_eq!(PackageManager::from_lockfile(dir.path()), Some(*expected));
        }
    }

    #[test]
    fn npm_lockfile_wins_when_several_are_present() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        assert_eq!(
            PackageManager::from_lockfile(dir.path()),
            Some(PackageManager::Npm)
        );
    }

    #[test]
    fn local_install_found_with_backend() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), false);
        fs::write(dir.path().join("yarn.lock"), "").unwrap();
        assert_eq!(
            detect_local(dir.path(), PKG),
            Some(Installation::Local(Some(PackageManager::Yarn)))
        );
    }

    #[test]
    fn dev_dependency_counts_as_local_evidence() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), true);
        fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(
            detect_local(dir.path(), PKG),
            Some(Installation::Local(Some(PackageManager::Pnpm)))
        );
    }

    #[test]
    fn missing_lockfile_leaves_backend_unknown() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), false);
        assert_eq!(
            detect_local(dir.path(), PKG),
            Some(Installation::Local(None))
        );
    }

    #[test]
    fn detection_walks_up_to_the_project_root() {
        let dir = tempfile::tempdir().unwrap();
        write_manifest(dir.path(), false);
        fs::write(dir.path().join("package-lock.json"), "{}").unwrap();
        let nested = dir.path().join("src").join("components");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            detect_local(&nested, PKG),
            Some(Installation::Local(Some(PackageManager::Npm)))
        );
    }

    #[test]
    fn unrelated_manifest_is_not_evidence() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"dependencies": {"react": "^18.0.0"}}"#,
        )
        .unwrap();
        assert_eq!(detect_local(dir.path(), PKG), None);
    }

    #[test]
    fn malformed_manifest_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("package.json"), "{ not json").unwrap();
        assert_eq!(detect_local(dir.path(), PKG), None);
    }
}
