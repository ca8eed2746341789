//! Scaffold writer seam
//!
//! Materializing a project's file tree from a resolved configuration is an
//! external concern; the pipeline only knows this trait. The bundled
//! implementation wires up dependencies with the chosen package manager.

use crate::error::Error;
use crate::scaffold::request::ScaffoldRequest;
use anyhow::{Context, Result};
use std::process::Command;

/// External collaborator that materializes a project from a resolved request
pub trait ScaffoldWriter {
    fn write(&self, request: &ScaffoldRequest) -> Result<()>;
}

/// Default writer: ensures the destination exists and installs dependencies
/// when the project tree declares any.
pub struct DependencyInstaller;

impl ScaffoldWriter for DependencyInstaller {
    fn write(&self, request: &ScaffoldRequest) -> Result<()> {
        std::fs::create_dir_all(&request.project_path).with_context(|| {
            format!(
                "Failed to create project directory: {}",
                request.project_path.display()
            )
        })?;

        // Nothing to wire up until a template (or the user) adds a manifest.
        if !request.project_path.join("package.json").is_file() {
            return Ok(());
        }

        let program = request.package_manager.command();
        let status = Command::new(program)
            .arg("install")
            .current_dir(&request.project_path)
            .status()
            .with_context(|| format!("Failed to run {} install", program))?;

        if !status.success() {
            return Err(Error::Subprocess {
                command: format!("{} install", program),
                code: status.code().unwrap_or(1),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Records requests instead of touching the filesystem
    #[derive(Default)]
    pub struct RecordingWriter {
        pub requests: RefCell<Vec<ScaffoldRequest>>,
    }

    impl ScaffoldWriter for RecordingWriter {
        fn write(&self, request: &ScaffoldRequest) -> Result<()> {
            self.requests.borrow_mut().push(request.clone());
            Ok(())
        }
    }
}
