//! Project scaffolding pipeline
//!
//! Resolves the destination path, framework, language, chain, and package
//! manager from CLI flags (falling back to interactive prompts), validates
//! the result as a whole, and hands the immutable request to the template
//! fetcher and scaffold writer.

pub mod request;
pub mod validate;
pub mod writer;

pub use request::{CreateArgs, Framework, Language, ScaffoldRequest};
pub use validate::validate_project_name;
pub use writer::{DependencyInstaller, ScaffoldWriter};

use crate::product::ProductConfig;
use crate::update::detect::PackageManager;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[cfg(feature = "tui")]
use crate::error::Error;
#[cfg(feature = "tui")]
use crate::templates::TemplateFetcher;

const PROJECT_NAME_PROMPT: &str = "What is your project named?";
const FRAMEWORK_PROMPT: &str = "What framework do you want to use?";
const LANGUAGE_PROMPT: &str = "What language do you want to use?";
const MOBILE_FLAVOR_PROMPT: &str = "What type of mobile project do you want to create?";

/// Framework selected through flags, if any. The `--framework <name>`
/// spelling overrides the shorthand flags.
fn framework_from_flags(args: &CreateArgs) -> Result<Option<Framework>> {
    if let Some(name) = &args.framework {
        return match Framework::from_id(name) {
            Some(fw) => Ok(Some(fw)),
            None => anyhow::bail!(
                "Unknown framework \"{}\". Valid options: next, cra, vite, node, express, react-native",
                name
            ),
        };
    }

    let shorthands = [
        (args.next, Framework::Next),
        (args.cra, Framework::Cra),
        (args.vite, Framework::Vite),
        (args.node, Framework::Node),
        (args.express, Framework::Express),
        (args.react_native, Framework::ReactNative),
    ];
    Ok(shorthands.iter().find(|(set, _)| *set).map(|(_, fw)| *fw))
}

fn ensure_supported<C: ProductConfig>(config: &C, framework: Framework) -> Result<()> {
    if config.frameworks().contains(&framework) {
        Ok(())
    } else {
        anyhow::bail!(
            "{} projects are not supported by {}",
            framework.display_name(),
            config.display_name()
        )
    }
}

fn language_from_flags(args: &CreateArgs) -> Option<Language> {
    if args.typescript {
        Some(Language::Typescript)
    } else if args.javascript {
        Some(Language::Javascript)
    } else {
        None
    }
}

/// Absolute destination and the package name derived from its base name.
/// A relative input resolves against `base`; the final path segment can
/// differ from the raw input, so the name is re-validated afterwards.
fn resolve_identity(base: &Path, input: &Path) -> (PathBuf, String) {
    let project_path = if input.is_absolute() {
        input.to_path_buf()
    } else {
        base.join(input)
    };
    let project_name = project_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    (project_path, project_name)
}

fn resolve_chain<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<String> {
    if args.solana {
        if !config.chains().contains(&"solana") {
            anyhow::bail!(
                "Solana projects are not supported by {}",
                config.display_name()
            );
        }
        return Ok("solana".to_string());
    }
    Ok(config.chains()[0].to_string())
}

fn resolve_package_manager(args: &CreateArgs) -> PackageManager {
    if args.use_npm {
        PackageManager::Npm
    } else if args.use_pnpm {
        PackageManager::Pnpm
    } else {
        PackageManager::from_user_agent_env()
    }
}

/// Run the create flow: resolve, validate, fetch, write.
///
/// A `Error::Download` from the fetch step suppresses the writer and is
/// reported without a trace at the process boundary; any other error
/// propagates verbatim.
#[cfg(feature = "tui")]
pub async fn create<C: ProductConfig>(
    config: &C,
    args: CreateArgs,
    writer: &dyn ScaffoldWriter,
) -> Result<()> {
    cliclack::intro(config.display_name())?;

    let raw_path = match &args.path {
        Some(path) => path.clone(),
        None => prompt_for_path(config, &args)?,
    };

    let framework = match framework_from_flags(&args)? {
        Some(fw) => {
            ensure_supported(config, fw)?;
            fw
        }
        None => prompt_for_framework(config)?,
    };

    let language = match language_from_flags(&args) {
        Some(lang) => lang,
        None => prompt_for_language(framework)?,
    };

    let cwd = std::env::current_dir()?;
    let (project_path, project_name) = resolve_identity(&cwd, &raw_path);
    if let Err(problems) = validate_project_name(&project_name) {
        return Err(Error::Validation {
            name: project_name,
            problems,
        }
        .into());
    }

    let request = ScaffoldRequest {
        project_path,
        project_name,
        framework,
        language,
        template: args.template.clone(),
        chain: resolve_chain(config, &args)?,
        package_manager: resolve_package_manager(&args),
    };

    if let Some(template) = &request.template {
        let fetcher = TemplateFetcher::from_config(config)?;
        let spinner = cliclack::spinner();
        spinner.start(format!("Downloading template {}...", template));
        match fetcher.fetch(template, &request.project_path).await {
            Ok(count) => spinner.stop(format!(
                "Created {} files in {}",
                count,
                request.project_path.display()
            )),
            Err(e) => {
                spinner.stop(format!(
                    "Download failed. Browse available templates: {}",
                    config.examples_url()
                ));
                return Err(e.into());
            }
        }
    }

    writer.write(&request)?;

    print_next_steps(config, &request)?;
    Ok(())
}

#[cfg(feature = "tui")]
fn prompt_for_path<C: ProductConfig>(config: &C, args: &CreateArgs) -> Result<PathBuf> {
    let default_name = args
        .template
        .clone()
        .unwrap_or_else(|| config.default_project_name());

    let input: String = cliclack::input(PROJECT_NAME_PROMPT)
        .default_input(&default_name)
        .validate(|value: &String| {
            let lowered = value.trim().to_lowercase();
            let (_, name) = resolve_identity(Path::new(""), Path::new(&lowered));
            match validate_project_name(&name) {
                Ok(()) => Ok(()),
                Err(problems) => Err(format!("Invalid project name: {}", problems[0])),
            }
        })
        .interact()?;

    Ok(PathBuf::from(input.trim().to_lowercase()))
}

#[cfg(feature = "tui")]
fn prompt_for_framework<C: ProductConfig>(config: &C) -> Result<Framework> {
    let mut select = cliclack::select(FRAMEWORK_PROMPT);
    for framework in config.frameworks() {
        select = select.item(*framework, framework.display_name(), "");
    }
    Ok(select.interact()?)
}

#[cfg(feature = "tui")]
fn prompt_for_language(framework: Framework) -> Result<Language> {
    // Mobile targets pick a runtime flavor; the flavor implies the language.
    if framework.is_mobile() {
        let language: Language = cliclack::select(MOBILE_FLAVOR_PROMPT)
            .item(Language::Javascript, "Expo Project", "")
            .item(Language::Typescript, "React Native CLI", "")
            .interact()?;
        return Ok(language);
    }

    Ok(cliclack::select(LANGUAGE_PROMPT)
        .item(Language::Javascript, "JavaScript", "")
        .item(Language::Typescript, "TypeScript", "")
        .interact()?)
}

#[cfg(feature = "tui")]
fn print_next_steps<C: ProductConfig>(config: &C, request: &ScaffoldRequest) -> Result<()> {
    let steps = config.next_steps(&request.project_path, request);

    println!();
    println!("  Next steps");
    println!();
    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy building!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "forgelab"
        }
        fn display_name(&self) -> &'static str {
            "Forgelab"
        }
        fn cli_description(&self) -> &'static str {
            "test CLI"
        }
        fn banner(&self) -> &'static str {
            ""
        }
        fn skip_env(&self) -> &'static str {
            "FORGELAB_CLI_SKIP_INTRO"
        }
        fn registry_url_env(&self) -> &'static str {
            "TEST_SCAFFOLD_REGISTRY_URL"
        }
        fn default_template_url(&self) -> &'static str {
            "https://codeload.github.com/forgelab-example"
        }
        fn template_url_env(&self) -> &'static str {
            "TEST_SCAFFOLD_TEMPLATE_URL"
        }
        fn examples_url(&self) -> &'static str {
            "https://github.com/forgelab-example"
        }
        fn sdk_package(&self) -> &'static str {
            "@forgelab/sdk"
        }
        fn frameworks(&self) -> &'static [Framework] {
            &[Framework::Next, Framework::Cra, Framework::Node]
        }
        fn chains(&self) -> &'static [&'static str] {
            &["evm", "solana"]
        }
        fn next_steps(&self, _dir: &Path, _request: &ScaffoldRequest) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn unsupported_framework_is_rejected() {
        assert!(ensure_supported(&TestConfig, Framework::Next).is_ok());
        assert!(ensure_supported(&TestConfig, Framework::Vite).is_err());
    }

    #[test]
    fn chain_defaults_to_the_first_supported_entry() {
        let chain = resolve_chain(&TestConfig, &CreateArgs::default()).unwrap();
        assert_eq!(chain, "evm");
    }

    #[test]
    fn solana_flag_selects_the_solana_chain() {
        let args = CreateArgs {
            solana: true,
            ..Default::default()
        };
        assert_eq!(resolve_chain(&TestConfig, &args).unwrap(), "solana");
    }

    #[test]
    fn shorthand_flags_select_a_framework() {
        let args = CreateArgs {
            cra: true,
            ..Default::default()
        };
        assert_eq!(framework_from_flags(&args).unwrap(), Some(Framework::Cra));
    }

    #[test]
    fn framework_name_overrides_shorthand_flags() {
        let args = CreateArgs {
            next: true,
            framework: Some("vite".to_string()),
            ..Default::default()
        };
        assert_eq!(framework_from_flags(&args).unwrap(), Some(Framework::Vite));
    }

    #[test]
    fn unknown_framework_name_is_an_error() {
        let args = CreateArgs {
            framework: Some("svelte".to_string()),
            ..Default::default()
        };
        assert!(framework_from_flags(&args).is_err());
    }

    #[test]
    fn no_flags_means_no_framework_yet() {
        assert_eq!(framework_from_flags(&CreateArgs::default()).unwrap(), None);
    }

    #[test]
    fn language_flags_resolve_with_typescript_priority() {
        let args = CreateArgs {
            typescript: true,
            javascript: true,
            ..Default::default()
        };
        assert_eq!(language_from_flags(&args), Some(Language::Typescript));
        assert_eq!(language_from_flags(&CreateArgs::default()), None);
    }

    #[test]
    fn relative_paths_resolve_against_the_base() {
        let (path, name) = resolve_identity(Path::new("/work"), Path::new("apps/my-app"));
        assert_eq!(path, PathBuf::from("/work/apps/my-app"));
        assert_eq!(name, "my-app");
    }

    #[test]
    fn absolute_paths_are_kept_as_is() {
        let (path, name) = resolve_identity(Path::new("/work"), Path::new("/srv/my-app"));
        assert_eq!(path, PathBuf::from("/srv/my-app"));
        assert_eq!(name, "my-app");
    }

    #[test]
    fn resolved_name_can_differ_from_the_raw_input() {
        // The final segment, not the typed string, is what gets validated.
        let (_, name) = resolve_identity(Path::new("/work"), Path::new("nested/My App"));
        assert_eq!(name, "My App");
        assert!(validate_project_name(&name).is_err());
    }

    #[test]
    fn package_manager_flags_override_the_environment() {
        let args = CreateArgs {
            use_pnpm: true,
            ..Default::default()
        };
        assert_eq!(resolve_package_manager(&args), PackageManager::Pnpm);

        let args = CreateArgs {
            use_npm: true,
            ..Default::default()
        };
        assert_eq!(resolve_package_manager(&args), PackageManager::Npm);
    }

    #[cfg(feature = "tui")]
    mod flow {
        use super::*;
        use crate::scaffold::writer::testing::RecordingWriter;

        #[tokio::test]
        async fn fully_flagged_create_skips_prompts_and_invokes_the_writer() {
            let dir = tempfile::tempdir().unwrap();
            let args = CreateArgs {
                path: Some(dir.path().join("my-app")),
                next: true,
                typescript: true,
                use_npm: true,
                ..Default::default()
            };
            let writer = RecordingWriter::default();

            create(&TestConfig, args, &writer).await.unwrap();

            let requests = writer.requests.borrow();
            assert_eq!(requests.len(), 1);
            let request = &requests[0];
            assert!(request.project_path.is_absolute());
            assert_eq!(request.project_name, "my-app");
            assert_eq!(request.framework, Framework::Next);
            assert_eq!(request.language, Language::Typescript);
            assert_eq!(request.chain, "evm");
            assert_eq!(request.package_manager, PackageManager::Npm);
            assert_eq!(request.template, None);
        }

        #[tokio::test]
        async fn invalid_resolved_name_is_fatal_with_every_problem_listed() {
            let dir = tempfile::tempdir().unwrap();
            let args = CreateArgs {
                path: Some(dir.path().join("My App")),
                next: true,
                javascript: true,
                use_npm: true,
                ..Default::default()
            };
            let writer = RecordingWriter::default();

            let err = create(&TestConfig, args, &writer).await.unwrap_err();

            match err.downcast_ref::<Error>() {
                Some(Error::Validation { name, problems }) => {
                    assert_eq!(name, "My App");
                    assert_eq!(problems.len(), 2);
                }
                other => panic!("expected validation error, got {:?}", other),
            }
            assert!(writer.requests.borrow().is_empty());
        }

        #[tokio::test]
        async fn download_failure_suppresses_the_writer() {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/no-such-template/zip/refs/heads/main")
                .with_status(404)
                .create_async()
                .await;
            std::env::set_var("TEST_SCAFFOLD_TEMPLATE_URL", server.url());

            let dir = tempfile::tempdir().unwrap();
            let args = CreateArgs {
                path: Some(dir.path().join("my-app")),
                next: true,
                javascript: true,
                use_npm: true,
                template: Some("no-such-template".to_string()),
                ..Default::default()
            };
            let writer = RecordingWriter::default();

            let err = create(&TestConfig, args, &writer).await.unwrap_err();

            assert!(matches!(
                err.downcast_ref::<Error>(),
                Some(Error::Download { .. })
            ));
            assert!(writer.requests.borrow().is_empty());
        }
    }
}
