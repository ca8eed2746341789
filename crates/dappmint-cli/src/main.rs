//! Dappmint CLI - scaffold web3 apps from official templates

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use create_core::install::InstallArgs;
use create_core::scaffold::{CreateArgs, DependencyInstaller, Framework, ScaffoldRequest};
use create_core::update::UpgradeOutcome;
use create_core::{Error, ProductConfig};
use std::path::{Path, PathBuf};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

const BANNER: &str = r#"
    ____                              _       __
   / __ \____ _____  ____  ____ ___  (_)___  / /_
  / / / / __ `/ __ \/ __ \/ __ `__ \/ / __ \/ __/
 / /_/ / /_/ / /_/ / /_/ / / / / / / / / / / /_
/_____/\__,_/ .___/ .___/_/ /_/ /_/_/_/ /_/\__/
           /_/   /_/"#;

/// Dappmint product configuration
#[derive(Clone)]
pub struct DappmintConfig;

impl ProductConfig for DappmintConfig {
    fn name(&self) -> &'static str {
        "dappmint"
    }

    fn display_name(&self) -> &'static str {
        "Dappmint"
    }

    fn cli_description(&self) -> &'static str {
        "Official Dappmint command line interface"
    }

    fn banner(&self) -> &'static str {
        BANNER
    }

    fn skip_env(&self) -> &'static str {
        "DAPPMINT_CLI_SKIP_INTRO"
    }

    fn registry_url_env(&self) -> &'static str {
        "DAPPMINT_REGISTRY_URL"
    }

    fn default_template_url(&self) -> &'static str {
        "https://codeload.github.com/dappmint-example"
    }

    fn template_url_env(&self) -> &'static str {
        "DAPPMINT_TEMPLATE_URL"
    }

    fn examples_url(&self) -> &'static str {
        "https://github.com/dappmint-example"
    }

    fn sdk_package(&self) -> &'static str {
        "@dappmint/sdk"
    }

    fn frameworks(&self) -> &'static [Framework] {
        &[Framework::Next, Framework::Cra, Framework::Node]
    }

    fn chains(&self) -> &'static [&'static str] {
        &["evm"]
    }

    fn next_steps(&self, dir: &Path, request: &ScaffoldRequest) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        let pm = request.package_manager;
        let run = match request.framework {
            Framework::Next => format!("{} run dev", pm),
            _ => format!("{} start", pm),
        };
        steps.push(run);

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "dappmint")]
#[command(about = "Official Dappmint command line interface")]
#[command(version = CLI_VERSION)]
pub struct Args {
    /// Skip check for auto updates
    #[arg(long)]
    pub skip_update_check: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a web3 app from any of our official templates
    Create(CliCreateArgs),
    /// Install the Dappmint SDK into your project. If no path is specified,
    /// the current directory will be used.
    Install(CliInstallArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Type of project to create (app)
    pub project_type: Option<String>,

    /// Directory to create the project in
    pub project_path: Option<PathBuf>,

    /// Create a web3 app
    #[arg(long)]
    pub app: bool,

    /// Initialize as a TypeScript project
    #[arg(long = "typescript", alias = "ts")]
    pub typescript: bool,

    /// Initialize as a JavaScript project
    #[arg(long = "javascript", alias = "js")]
    pub javascript: bool,

    /// Initialize as a Create React App project
    #[arg(long)]
    pub cra: bool,

    /// Initialize as a Next.js project
    #[arg(long)]
    pub next: bool,

    /// Initialize as a Node project
    #[arg(long)]
    pub node: bool,

    /// Explicitly tell the CLI to bootstrap the app using npm
    #[arg(long = "use-npm")]
    pub use_npm: bool,

    /// Explicitly tell the CLI to bootstrap the app using pnpm
    #[arg(long = "use-pnpm")]
    pub use_pnpm: bool,

    /// The preferred framework
    #[arg(long)]
    pub framework: Option<String>,

    /// A template to start your project from. You can use a template
    /// repository name from the official dappmint-example org.
    #[arg(short, long)]
    pub template: Option<String>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            project_type: args.project_type,
            path: args.project_path,
            typescript: args.typescript,
            javascript: args.javascript,
            next: args.next,
            cra: args.cra,
            node: args.node,
            framework: args.framework,
            use_npm: args.use_npm,
            use_pnpm: args.use_pnpm,
            template: args.template,
            ..Default::default()
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliInstallArgs {
    /// Project to install the SDK into
    pub project_path: Option<PathBuf>,

    /// Install the nightly version of packages
    #[arg(long)]
    pub nightly: bool,

    /// Install the dev version of packages
    #[arg(long)]
    pub dev: bool,
}

impl From<CliInstallArgs> for InstallArgs {
    fn from(args: CliInstallArgs) -> Self {
        InstallArgs {
            path: args.project_path,
            nightly: args.nightly,
            dev: args.dev,
        }
    }
}

async fn run(config: &DappmintConfig, args: Args, argv: &[String]) -> Result<()> {
    let suppressed = create_core::intro_suppressed(config);

    if !suppressed {
        println!("{}", config.banner().magenta());
        println!("\n Welcome to the {} CLI! v{}\n", config.display_name(), CLI_VERSION);
    }

    if !suppressed && !args.skip_update_check {
        match create_core::update::run_update_flow(config, CLI_VERSION, argv).await? {
            UpgradeOutcome::Proceed => {}
            UpgradeOutcome::Completed(code) => {
                let _ = console::Term::stderr().show_cursor();
                std::process::exit(code);
            }
        }
    }

    match args.command {
        Some(Command::Create(create_args)) => {
            create_core::scaffold::create(config, create_args.into(), &DependencyInstaller).await
        }
        Some(Command::Install(install_args)) => {
            create_core::install::install(config, install_args.into()).await
        }
        None => {
            // No subcommand provided, default to create behavior (interactive mode)
            create_core::scaffold::create(config, CreateArgs::default(), &DependencyInstaller).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    // Captured before parsing: re-exec must see the literal original argv
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let args = Args::parse();
    let config = DappmintConfig;

    let result = run(&config, args, &argv).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    match result {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast_ref::<Error>() {
            // Known failures print their message and exit 1, no trace
            Some(core) => {
                eprintln!("{}", core.detail().red());
                std::process::exit(1);
            }
            None => Err(e),
        },
    }
}
