use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "updater")]
#[command(about = "Keep local files in sync with repository-hosted manifests")]
#[command(version)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true, env = "UPDATER_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update every configured dependency
    Update {
        /// Concurrent file downloads per dependency
        #[arg(short = 'j', long)]
        jobs: Option<usize>,
    },
    /// List configured dependencies
    List,
    /// Track a new dependency
    Add {
        /// Repository owner
        username: String,
        /// Repository name
        repository: String,
        /// Manifest name without the .json suffix
        manifest: String,
        /// Branch the manifest is read from
        #[arg(short, long, default_value = "master")]
        branch: String,
        /// Path fragment mapping file URLs to local directories (repeatable)
        #[arg(short, long = "env")]
        environment: Vec<String>,
    },
    /// Print the SHA-512 checksum of a local file
    Checksum {
        /// File to hash
        file: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Update { jobs } => cli::update::run(config_path, jobs).await,
        Commands::List => cli::list::run(config_path),
        Commands::Add {
            username,
            repository,
            manifest,
            branch,
            environment,
        } => cli::add::run(
            config_path,
            cli::add::AddOptions {
                username,
                repository,
                manifest,
                branch,
                environment,
            },
        ),
        Commands::Checksum { file } => cli::checksum::run(&file).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\n{}", updater::core::format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
