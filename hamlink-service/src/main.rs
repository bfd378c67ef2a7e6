use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hamlink_service::{commands, PolicyArgs, ServiceConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "hamlink")]
#[command(about = "Hamlink - Hamming(15,11) noisy link hop", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept segments over HTTP and forward corrected payloads
    Serve {
        /// Listen address
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Downstream endpoint for processed segments
        #[arg(long)]
        forward_url: Option<String>,

        /// Pipeline workers
        #[arg(long)]
        workers: Option<usize>,

        /// Segments that may wait for a worker
        #[arg(long)]
        queue_depth: Option<usize>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Run the pipeline repeatedly over one payload and report statistics
    Simulate {
        /// Input payload file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Number of runs
        #[arg(long, default_value = "10000")]
        runs: usize,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        /// Show a progress bar
        #[arg(long)]
        progress: bool,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Print the Hamming frames of a payload
    Encode {
        /// Input payload file ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// Output file for the frame listing
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = ServiceConfig::load(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Serve {
            listen,
            forward_url,
            workers,
            queue_depth,
            policy,
        } => {
            policy.apply(&mut config);
            if let Some(v) = listen {
                config.listen = v;
            }
            if let Some(v) = forward_url {
                config.forward_url = v;
            }
            if let Some(v) = workers {
                config.workers = v;
            }
            if let Some(v) = queue_depth {
                config.queue_depth = v;
            }
            commands::serve::execute(config).await
        }

        Commands::Simulate {
            input,
            runs,
            json,
            progress,
            policy,
        } => {
            policy.apply(&mut config);
            commands::simulate::execute(&input, &config, runs, json, progress)
        }

        Commands::Encode { input, output } => {
            commands::encode::execute(&input, output.as_deref(), config.max_payload)
        }
    }
}
