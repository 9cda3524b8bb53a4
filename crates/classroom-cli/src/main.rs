//! Classroom CLI
//!
//! Runs a creation wizard in the terminal and submits it to the backend.

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use classroom_cli::prompt::Prompter;
use classroom_cli::runner::{load_courses, run_batch, run_interactive};
use classroom_client::{ClassroomClient, Session};
use classroom_wizard::{Config, Flow, FormState, Wizard};
use tracing_subscriber::EnvFilter;

/// Classroom - create classes, courses, lessons and slides
///
/// Walks through the chosen wizard step by step, validating each step
/// before moving on, then submits the result to the Classroom backend.
#[derive(Parser, Debug)]
#[command(name = "classroom")]
#[command(version, about, long_about = None)]
struct Args {
    /// What to create
    #[arg(value_enum, value_name = "FLOW")]
    flow: FlowArg,

    /// Path to configuration file (default: classroom.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// JSON file with field values to prefill
    #[arg(short, long, value_name = "FILE")]
    form: Option<String>,

    /// Base URL of the backend API (overrides apiBaseUrl)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Do not prompt; the form file must contain every required field
    #[arg(long)]
    no_interactive: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FlowArg {
    Class,
    Course,
    Lesson,
    Slide,
}

impl From<FlowArg> for Flow {
    fn from(arg: FlowArg) -> Self {
        match arg {
            FlowArg::Class => Self::Class,
            FlowArg::Course => Self::Course,
            FlowArg::Lesson => Self::Lesson,
            FlowArg::Slide => Self::Slide,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(config = ?args.config, form = ?args.form, "Arguments");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref api_url) = args.api_url {
        config.api_base_url.clone_from(api_url);
    }
    if args.no_interactive {
        config.interactive = false;
    }
    config.validate()?;

    let flow = Flow::from(args.flow);
    let session = Session::from_env(&config.token_env);
    if !session.is_authenticated() {
        tracing::warn!(
            token_env = %config.token_env,
            "No API token set; requests are sent without credentials"
        );
    }
    let client = ClassroomClient::from_config(&config, session)?;

    let mut wizard = Wizard::new(flow.definition()?);
    if let Some(ref path) = args.form {
        wizard.prefill(load_form(Path::new(path))?)?;
    }

    println!("Creating a {flow} at {}", client.base_url());

    let created = if config.interactive {
        let courses = if flow == Flow::Class {
            load_courses(&client, &mut std::io::stdout()).await?
        } else {
            Vec::new()
        };
        let stdin = std::io::stdin();
        let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
        run_interactive(&mut wizard, &mut prompter, &client, flow, &courses).await?
    } else {
        Some(run_batch(&mut wizard, &client, flow).await?)
    };

    match created {
        Some(created) => println!("Created {} {}", created.flow(), created.id()),
        None => println!("Cancelled, nothing was submitted"),
    }
    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<Config> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => Config::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Reads a JSON object of field values.
fn load_form(path: &Path) -> anyhow::Result<FormState> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read form file: {e}\n\nPath: {}", path.display())
    })?;
    FormState::from_json(&contents).map_err(|e| {
        anyhow::anyhow!(
            "Form file must be a JSON object of field values: {e}\n\nPath: {}",
            path.display()
        )
    })
}
