//! Main CLI entry point for agiros-bloom

use std::path::PathBuf;

use agiros_bloom_core::ExitClass;
use agiros_bloom_rosdep::RosdepError;
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{BackendArg, OutputFormat};

/// Configuration file used when `--config` is not given
const DEFAULT_CONFIG: &str = "agiros-bloom.yaml";

/// agiros-bloom - Resolve rosdep keys and generate AGIROS packaging substitutions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    quiet: u8,

    /// Configuration file path (global option)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve rosdep keys for a platform
    Resolve {
        /// Rosdep keys to resolve
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,

        /// Override AGIROS distribution (e.g. "loong", "pixiu")
        #[arg(long, value_name = "DISTRO")]
        rosdistro: Option<String>,

        /// Override OS name
        #[arg(long, value_name = "OS")]
        os_name: Option<String>,

        /// Override OS version
        #[arg(long, value_name = "VERSION")]
        os_version: Option<String>,

        /// Package released together with the keys' owner
        #[arg(long = "peer", value_name = "PACKAGE")]
        peers: Vec<String>,

        /// Never offer to refresh the rosdep data
        #[arg(long)]
        non_interactive: bool,
    },

    /// Generate substitutions for the packages under a path
    Generate {
        /// Packaging backend
        #[arg(value_enum)]
        backend: BackendArg,

        /// Package or workspace directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        package_path: PathBuf,

        /// Override OS version
        #[arg(long, value_name = "VERSION")]
        os_version: Option<String>,

        /// Release increment
        #[arg(short = 'i', long, value_name = "N", default_value_t = 0)]
        increment: u32,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,

        /// Never offer to refresh the rosdep data
        #[arg(long)]
        non_interactive: bool,
    },

    /// Validate configuration, rosdistro index and rosdep sources
    Validate,

    /// Initialize a new configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG)]
        output: PathBuf,

        /// Force overwrite existing file
        #[arg(short, long)]
        force: bool,

        /// Initialize for specific AGIROS distro
        #[arg(long, value_name = "DISTRO", default_value = "loong")]
        rosdistro: String,
    },
}

fn main() -> Result<()> {
    // Install color-eyre for better error reports
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet)?;

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));

    let result = match cli.command {
        Commands::Resolve { keys, rosdistro, os_name, os_version, peers, non_interactive } => {
            commands::ResolveCommand::new(config_path, keys)
                .with_platform(rosdistro, os_name, os_version)
                .with_peers(peers)
                .interactive(!non_interactive)
                .execute()
        }

        Commands::Generate { backend, package_path, os_version, increment, format, non_interactive } => {
            commands::GenerateCommand::new(config_path, backend, package_path)
                .with_os_version(os_version)
                .with_increment(increment)
                .with_format(format)
                .interactive(!non_interactive)
                .execute()
        }

        Commands::Validate => commands::ValidateCommand::new(config_path).execute(),

        Commands::Init { output, force, rosdistro } => {
            commands::InitCommand::new(output, force, rosdistro).execute()
        }
    };

    if let Err(report) = result {
        let class = exit_class(&report);
        tracing::error!("Command failed: {report:#}");
        if class != ExitClass::Unknown {
            tracing::error!("Exiting with {class}");
        }
        std::process::exit(class.code());
    }

    Ok(())
}

/// Exit class of the first rosdep failure in the error chain
fn exit_class(report: &color_eyre::Report) -> ExitClass {
    report
        .chain()
        .find_map(|e| e.downcast_ref::<RosdepError>())
        .map_or(ExitClass::Unknown, RosdepError::exit_class)
}

fn setup_logging(verbose: u8, quiet: u8) -> Result<()> {
    let log_level = match (verbose, quiet) {
        (0, 0) => "info",
        (1, 0) => "debug",
        (2, 0) => "trace",
        (v, 0) if v > 2 => "trace",
        (0, 1) => "warn",
        (0, 2) => "error",
        (0, q) if q > 2 => "off",
        _ => "info", // If both are set, default to info
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
