//! Error taxonomy shared by the scaffolding and self-update flows
//!
//! Binaries print these as plain messages and exit 1; anything else escapes
//! through `anyhow` with full detail. `Download` is the one kind callers
//! catch and recover from at the top level.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Project name violates the package naming rules.
    #[error("could not create a project called \"{name}\" because of naming restrictions")]
    Validation { name: String, problems: Vec<String> },

    /// Package-manager backend could not be identified; no automatic fallback.
    #[error("{0}")]
    Detection(String),

    /// An install or re-exec child exited non-zero.
    #[error("`{command}` exited with status {code}")]
    Subprocess { command: String, code: i32 },

    /// Template acquisition failed (transport, archive, or extraction).
    #[error("failed to download template \"{template}\"")]
    Download {
        template: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Full user-facing message, including the enumerated naming problems
    /// and the download cause, without a backtrace.
    pub fn detail(&self) -> String {
        match self {
            Error::Validation { name, problems } => {
                let mut out = format!(
                    "Could not create a project called \"{}\" because of naming restrictions:",
                    name
                );
                for problem in problems {
                    out.push_str(&format!("\n    * {}", problem));
                }
                out
            }
            Error::Download { template, source } => {
                format!("Failed to download template \"{}\": {}", template, source)
            }
            other => other.to_string(),
        }
    }
}
