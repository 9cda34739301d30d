use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};

use scenarios::mutator::DryRunMutators;
use scenarios::settings::DEFAULT_WARM_UP_COUNT;
use scenarios::telemetry::{self, LogFormat};
use scenarios::{DistributionInspector, InvocationSettings, Invoker, ScenarioLoader};

/// Resolve Gradle profiler benchmark scenarios
///
/// Reads a scenario file (or synthesizes a single "default" scenario from
/// the command line) and prints every resolved scenario without running
/// anything.
#[derive(Parser)]
#[command(name = "profiler-scenarios")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log output format (verbosity follows `RUST_LOG`)
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve and print scenarios
    ///
    /// TARGETS are the tasks to run. With --scenario-file they also select
    /// which scenarios to resolve.
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// Tasks to run, or scenario names when a scenario file is given
    targets: Vec<String>,

    /// Scenario file describing one or more named scenarios
    #[arg(long, env = "PROFILER_SCENARIO_FILE")]
    scenario_file: Option<PathBuf>,

    /// Project directory; mutator source files resolve against it
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Gradle version or installation directory (repeatable)
    #[arg(long = "gradle-version")]
    versions: Vec<String>,

    /// Warm-up builds before measurement
    #[arg(long, default_value_t = DEFAULT_WARM_UP_COUNT)]
    warm_ups: u32,

    /// System property passed to every build, as key=value (repeatable)
    #[arg(short = 'D', value_name = "KEY=VALUE")]
    system_properties: Vec<String>,

    /// Run builds without the Gradle daemon
    #[arg(long, conflicts_with = "tooling_api")]
    no_daemon: bool,

    /// Run builds through the tooling API
    #[arg(long)]
    tooling_api: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.log_format);

    match cli.command {
        Commands::Resolve(args) => resolve(&args),
    }
}

fn resolve(args: &ResolveArgs) -> Result<()> {
    let settings = settings(args)?;
    let loader = ScenarioLoader::new(
        DistributionInspector::new(settings.project_dir()),
        Arc::new(DryRunMutators),
    );
    let scenarios = loader
        .load_scenarios(&settings)
        .context("failed to resolve scenarios")?;

    match args.format {
        OutputFormat::Text => {
            for scenario in &scenarios {
                println!("{scenario}");
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&scenarios)?);
        }
    }
    Ok(())
}

fn settings(args: &ResolveArgs) -> Result<InvocationSettings> {
    let invoker = if args.no_daemon {
        Invoker::NoDaemon
    } else if args.tooling_api {
        Invoker::ToolingApi
    } else {
        Invoker::Daemon
    };

    let mut builder = InvocationSettings::builder(&args.project_dir)
        .invoker(invoker)
        .targets(&args.targets)
        .versions(&args.versions)
        .warm_up_count(args.warm_ups);
    if let Some(file) = &args.scenario_file {
        builder = builder.scenario_file(file).scenario_filter(&args.targets);
    }
    for property in &args.system_properties {
        let Some((key, value)) = property.split_once('=') else {
            bail!("system property '{property}' is not of the form key=value");
        };
        builder = builder.system_property(key, value);
    }
    Ok(builder.build())
}
