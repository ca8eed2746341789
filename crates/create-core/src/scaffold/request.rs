//! Resolved scaffolding configuration
//!
//! A `ScaffoldRequest` is built incrementally from CLI flags and prompts,
//! validated as a whole, and immutable once handed to the scaffold writer.

use crate::update::detect::PackageManager;
use std::path::PathBuf;

/// Frameworks the scaffolder can provision; which ones a given product
/// offers comes from its `ProductConfig`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framework {
    Next,
    Cra,
    Vite,
    Node,
    Express,
    ReactNative,
}

impl Framework {
    pub fn display_name(&self) -> &'static str {
        match self {
            Framework::Next => "Next.js",
            Framework::Cra => "Create React App",
            Framework::Vite => "Vite",
            Framework::Node => "Node.js",
            Framework::Express => "Express",
            Framework::ReactNative => "React Native",
        }
    }

    /// Identifier used by the `--framework` flag
    pub fn id(&self) -> &'static str {
        match self {
            Framework::Next => "next",
            Framework::Cra => "cra",
            Framework::Vite => "vite",
            Framework::Node => "node",
            Framework::Express => "express",
            Framework::ReactNative => "react-native",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_lowercase().as_str() {
            "next" | "nextjs" => Some(Framework::Next),
            "cra" => Some(Framework::Cra),
            "vite" => Some(Framework::Vite),
            "node" | "nodejs" => Some(Framework::Node),
            "express" => Some(Framework::Express),
            "react-native" | "reactnative" => Some(Framework::ReactNative),
            _ => None,
        }
    }

    /// Mobile targets swap the general language prompt for a runtime
    /// flavor prompt
    pub fn is_mobile(&self) -> bool {
        matches!(self, Framework::ReactNative)
    }
}

impl std::fmt::Display for Framework {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Project language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Javascript,
    Typescript,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Javascript => "JavaScript",
            Language::Typescript => "TypeScript",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Language::Javascript => "javascript",
            Language::Typescript => "typescript",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Fully resolved configuration handed to the scaffold writer
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    /// Absolute destination path
    pub project_path: PathBuf,
    /// Validated package name (the destination's base name)
    pub project_name: String,
    pub framework: Framework,
    pub language: Language,
    /// Template repository name, when one was requested
    pub template: Option<String>,
    /// Chain target; fixed default, selectable by flag only
    pub chain: String,
    pub package_manager: PackageManager,
}

/// Inputs to the create flow, mapped from each binary's clap surface.
/// Fields a product doesn't expose simply stay at their defaults.
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Positional project type (`app`)
    pub project_type: Option<String>,
    /// Positional destination path
    pub path: Option<PathBuf>,
    pub typescript: bool,
    pub javascript: bool,
    pub next: bool,
    pub cra: bool,
    pub vite: bool,
    pub node: bool,
    pub express: bool,
    pub react_native: bool,
    /// Framework by name, overriding the shorthand flags
    pub framework: Option<String>,
    pub use_npm: bool,
    pub use_pnpm: bool,
    pub template: Option<String>,
    pub solana: bool,
    pub evm: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framework_ids_round_trip() {
        for fw in [
            Framework::Next,
            Framework::Cra,
            Framework::Vite,
            Framework::Node,
            Framework::Express,
            Framework::ReactNative,
        ] {
            assert_eq!(Framework::from_id(fw.id()), Some(fw));
        }
    }

    #[test]
    fn framework_ids_are_case_insensitive() {
        assert_eq!(Framework::from_id("Next"), Some(Framework::Next));
        assert_eq!(Framework::from_id(" REACT-NATIVE "), Some(Framework::ReactNative));
        assert_eq!(Framework::from_id("svelte"), None);
    }

    #[test]
    fn only_mobile_frameworks_swap_the_language_prompt() {
        assert!(Framework::ReactNative.is_mobile());
        assert!(!Framework::Next.is_mobile());
        assert!(!Framework::Express.is_mobile());
    }
}
