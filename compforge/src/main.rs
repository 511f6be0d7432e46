mod commands;
mod formatting;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use compforge_core::builder::Parallelism;
use owo_colors::OwoColorize;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use commands::BuildArgs;

#[derive(Parser)]
#[command(name = "compforge", version)]
#[command(about = "Builds component SDKs and plugin components into distributable packages")]
#[command(group(
    ArgGroup::new("inputs")
        .required(true)
        .multiple(true)
        .args([
            "cpp_sdk_src",
            "java_sdk_src",
            "python_sdk_src",
            "components",
            "package_json",
            "clean",
            "clean_only",
        ])
))]
struct Cli {
    /// Path to the C++ component SDK source
    #[arg(long, value_name = "DIR")]
    cpp_sdk_src: Option<PathBuf>,

    /// Path to the Java component SDK source
    #[arg(long, value_name = "DIR")]
    java_sdk_src: Option<PathBuf>,

    /// Path to the Python component SDK source
    #[arg(long, value_name = "DIR")]
    python_sdk_src: Option<PathBuf>,

    /// Root directory for build output
    #[arg(short = 'b', long, value_name = "DIR", default_value = "mpf-build")]
    build_dir: PathBuf,

    /// Colon-separated directories searched for components
    #[arg(long, value_name = "PATHS")]
    component_search_path: Option<String>,

    /// Colon-separated list of components to build
    #[arg(short = 'c', long, value_name = "COMPONENTS")]
    components: Option<String>,

    /// JSON package file listing the components to build
    #[arg(long, value_name = "FILE")]
    package_json: Option<PathBuf>,

    /// Clean before building
    #[arg(long, action)]
    clean: bool,

    /// Clean without building
    #[arg(long, action)]
    clean_only: bool,

    /// Simultaneous project builds; unbounded when given without a value
    #[arg(short = 'p', long, value_name = "N", num_args = 0..=1)]
    parallel: Option<Option<usize>>,

    /// Jobs passed to make; unbounded when given without a value
    #[arg(short = 'j', long, value_name = "N", num_args = 0..=1)]
    jobs: Option<Option<usize>>,

    /// Configuration file (defaults to ./compforge.toml when present)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, action)]
    quiet: bool,
}

fn parallelism_arg(value: Option<Option<usize>>) -> Option<Parallelism> {
    value.map(|limit| match limit {
        Some(n) => Parallelism::Limited(n),
        None => Parallelism::Unbounded,
    })
}

impl From<Cli> for BuildArgs {
    fn from(cli: Cli) -> Self {
        Self {
            cpp_sdk_src: cli.cpp_sdk_src,
            java_sdk_src: cli.java_sdk_src,
            python_sdk_src: cli.python_sdk_src,
            build_dir: cli.build_dir,
            component_search_path: cli.component_search_path,
            components: cli.components,
            package_json: cli.package_json,
            clean: cli.clean,
            clean_only: cli.clean_only,
            parallel: parallelism_arg(cli.parallel),
            jobs: parallelism_arg(cli.jobs),
            config: cli.config,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    // RUST_LOG, when set, overrides -v and -q.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match commands::cmd_build(cli.into()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", format!("Error: {:#}", err).red());
            ExitCode::FAILURE
        }
    }
}
