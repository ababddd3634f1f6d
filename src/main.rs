//! swordctl - developer tooling for the storage element controller
//!
//! One binary, two halves. The client half talks Redfish/Swordfish to
//! a running element controller: interactive shells for storage,
//! events, and telemetry, plus the batch allocate and cycle flows. The
//! patch half rewrites openapi-generator output so the generated Go
//! server compiles; it never touches the network.

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swordctl::client::{EVENT_SERVICE, STORAGE_SERVICE, TELEMETRY_SERVICE};
use swordctl::patch::{constants, models, platform, yaml};
use swordctl::units::byte_size_value_parser;
use swordctl::{provision, shell, Result, ServerArgs};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Developer tooling for the Redfish/Swordfish storage element controller
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive storage service shell
    Shell {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Interactive event service shell
    Events {
        #[command(flatten)]
        server: ServerArgs,

        /// Bind address for the push-delivery event listener
        #[arg(long, env = "SWORDCTL_LISTEN", default_value = "0.0.0.0:8093")]
        bind: SocketAddr,
    },

    /// Interactive telemetry service shell
    Telemetry {
        #[command(flatten)]
        server: ServerArgs,
    },

    /// Allocate a storage pool and group for each compute node
    Allocate {
        #[command(flatten)]
        server: ServerArgs,

        /// Compute node to allocate for; repeat for several, omit for all
        #[arg(long = "node", value_parser = clap::value_parser!(u8).range(0..16))]
        nodes: Vec<u8>,

        /// Capacity of each storage pool
        #[arg(long, value_parser = byte_size_value_parser, default_value = "500GB")]
        size: u64,
    },

    /// Storage group create/delete soak loop
    Cycle {
        #[command(flatten)]
        server: ServerArgs,

        /// Capacity of the storage pool cycled against
        #[arg(long, value_parser = byte_size_value_parser, default_value = "500GiB")]
        size: u64,

        /// Server endpoint the storage groups attach to
        #[arg(long, default_value = "0")]
        endpoint: String,

        /// Seconds to pause after each create and delete
        #[arg(long, default_value = "5")]
        pause: u64,
    },

    /// Rewrite openapi-generator output
    #[command(subcommand)]
    Patch(PatchCommand),
}

#[derive(Subcommand, Debug)]
enum PatchCommand {
    /// Collapse duplicated schema names in the bundled openapi yaml
    Yaml {
        /// Bundled schema file
        src: PathBuf,

        /// Patched output file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rename generated enum constants so they stop colliding
    Constants {
        /// Generated models directory
        dir: PathBuf,
    },

    /// Qualify model references with the models package
    Models {
        /// Service implementation directory
        dir: PathBuf,

        /// Restrict the patch to one file name
        #[arg(long)]
        file: Option<String>,

        /// Import path of the generated models package
        #[arg(long, default_value = models::DEFAULT_MODELS_IMPORT)]
        import_path: String,
    },

    /// Split the storage-platform controller out of the default one
    Platform {
        /// Generated router directory
        dir: PathBuf,

        /// Custom storage-platform source file
        #[arg(long, default_value = platform::DEFAULT_SRC)]
        src: String,

        /// Generated default controller file
        #[arg(long = "default", default_value = platform::DEFAULT_API)]
        default_api: String,

        /// Storage-platform controller file to write
        #[arg(long, default_value = platform::DEFAULT_DEST)]
        dest: String,
    },
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args);

    if let Err(e) = run(args.command).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Shell { server } => {
            let conn = server.connect(STORAGE_SERVICE);
            shell::storage::run(&conn).await
        }
        Command::Events { server, bind } => {
            let conn = server.connect(EVENT_SERVICE);
            shell::events::run(&conn, bind).await
        }
        Command::Telemetry { server } => {
            let conn = server.connect(TELEMETRY_SERVICE);
            shell::telemetry::run(&conn).await
        }
        Command::Allocate {
            server,
            nodes,
            size,
        } => {
            let conn = server.connect(STORAGE_SERVICE);
            let nodes = if nodes.is_empty() {
                (0..16).collect()
            } else {
                nodes
            };
            provision::allocate(&conn, &nodes, size).await
        }
        Command::Cycle {
            server,
            size,
            endpoint,
            pause,
        } => {
            let conn = server.connect(STORAGE_SERVICE);
            provision::cycle(&conn, size, &endpoint, pause).await
        }
        Command::Patch(patch) => match patch {
            PatchCommand::Yaml { src, output } => yaml::run(&src, output.as_deref()),
            PatchCommand::Constants { dir } => constants::run(&dir),
            PatchCommand::Models {
                dir,
                file,
                import_path,
            } => models::run(&dir, file.as_deref(), &import_path),
            PatchCommand::Platform {
                dir,
                src,
                default_api,
                dest,
            } => platform::run(&dir, &src, &default_api, &dest),
        },
    }
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().unwrap())
        .add_directive("reqwest=warn".parse().unwrap())
        .add_directive("rustyline=warn".parse().unwrap());

    // Logs go to stderr; stdout belongs to the shells and monitors.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}
