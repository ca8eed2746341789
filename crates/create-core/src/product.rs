//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface that each product (forgelab, dappmint)
//! must implement to configure the scaffolding and self-update behavior for
//! their specific needs.

use crate::scaffold::request::{Framework, ScaffoldRequest};
use std::path::Path;

/// Configuration trait for different CLI products
///
/// Each product (forgelab, dappmint) implements this trait to define:
/// - Product identity (name, display name, banner)
/// - Registry and template source URLs
/// - The framework and chain feature set
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (package name on the registry, binary name)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// ASCII banner printed on startup
    fn banner(&self) -> &'static str;

    /// Environment variable that suppresses the banner and the update flow;
    /// set on child processes during re-exec
    fn skip_env(&self) -> &'static str;

    /// Default package registry queried for the latest published version
    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    /// Environment variable name for overriding the registry URL
    fn registry_url_env(&self) -> &'static str;

    /// Default base URL for downloading template archives
    fn default_template_url(&self) -> &'static str;

    /// Environment variable name for overriding the template URL
    fn template_url_env(&self) -> &'static str;

    /// Browsable gallery of official templates, shown in help and errors
    fn examples_url(&self) -> &'static str;

    /// SDK package wired into projects by the `install` subcommand
    fn sdk_package(&self) -> &'static str;

    /// Frameworks this product can scaffold
    fn frameworks(&self) -> &'static [Framework];

    /// Chain targets this product supports; the first entry is the default
    fn chains(&self) -> &'static [&'static str];

    /// Default project name offered by the path prompt
    fn default_project_name(&self) -> String {
        format!("{}-app", self.name())
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, request: &ScaffoldRequest) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
