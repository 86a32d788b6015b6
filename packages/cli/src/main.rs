#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the dispatch map connector.
//!
//! `run` performs a single fetch-and-submit cycle and exits non-zero if
//! any agency failed. `poll` repeats that cycle on the configured
//! interval. `schema` prints the input or output JSON schema, and `serve`
//! starts the webhook receiver.

use std::future::Future;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dispatch_map_client::{DispatchClient, DispatchSource};
use dispatch_map_config::DispatchConfig;
use dispatch_map_config::schema::{self, DataFlow, SchemaKind};
use dispatch_map_dispatch_models::DataType;
use dispatch_map_pipeline::{FeatureSink, RunFailure, run, sink};
use tokio::time::MissedTickBehavior;

#[derive(Parser)]
#[command(name = "dispatch_map", about = "Dispatch incident and unit map connector")]
struct Cli {
    /// Path to the TOML config file (overrides `DISPATCH_MAP_CONFIG`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every configured agency once and submit the collection
    Run,
    /// Run repeatedly on the configured poll interval until interrupted
    Poll {
        /// Poll interval in seconds (overrides `PollIntervalSecs`)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Print the input or output JSON schema
    Schema {
        /// Which schema to print: `input` or `output`
        #[arg(long, default_value = "input")]
        kind: SchemaKind,
        /// `incoming` or `outgoing`; outgoing flows carry no records
        #[arg(long, default_value = "incoming")]
        flow: DataFlow,
        /// Data type for the output schema. When omitted it is read from
        /// the configuration.
        #[arg(long)]
        data_type: Option<DataType>,
    },
    /// Start the webhook receiver
    Serve {
        /// Log every received payload (also enabled by `DISPATCH_MAP_DEBUG`)
        #[arg(long)]
        debug: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = dispatch_map_config::load(cli.config.as_deref())?;
            let client = DispatchClient::from_config(&config)?;
            let sink = sink::from_config(&config.sink)?;

            if let Err(e) = run_once(&config, &client, sink.as_ref()).await {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Commands::Poll { interval } => {
            let mut config = dispatch_map_config::load(cli.config.as_deref())?;
            if let Some(secs) = interval {
                config.poll_interval = std::time::Duration::from_secs(secs.max(1));
            }
            poll(&config).await?;
        }
        Commands::Schema {
            kind,
            flow,
            data_type,
        } => {
            let data_type = match (kind, data_type) {
                (_, Some(data_type)) => data_type,
                (SchemaKind::Input, None) => DataType::default(),
                (SchemaKind::Output, None) => {
                    dispatch_map_config::load(cli.config.as_deref())?.data_type
                }
            };
            let schema = schema::schema(kind, flow, data_type);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Serve { debug } => {
            let debug =
                debug || dispatch_map_config::debug_from_env(|key| std::env::var(key).ok())?;
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(dispatch_map_server::run_server(debug))
            })
            .await??;
        }
    }

    Ok(())
}

async fn run_once(
    config: &DispatchConfig,
    source: &dyn DispatchSource,
    sink: &dyn FeatureSink,
) -> Result<(), RunFailure> {
    let report = run(config, source, sink).await?;
    log::info!(
        "Run started {} finished: {} feature(s) from {} agenc{} in {:.1}s",
        report.started_at.to_rfc3339(),
        report.features,
        report.agencies,
        if report.agencies == 1 { "y" } else { "ies" },
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

async fn poll(config: &DispatchConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = DispatchClient::from_config(config)?;
    let sink = sink::from_config(&config.sink)?;

    log::info!(
        "Polling {} every {}s (Ctrl-C to stop)",
        config.data_type,
        config.poll_interval.as_secs()
    );

    poll_until(config, &client, sink.as_ref(), ctrl_c()).await;
    Ok(())
}

/// Resolves on Ctrl-C. If the signal handler cannot be installed the
/// poller keeps running.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

/// Runs on every tick of `config.poll_interval` until `shutdown` resolves.
///
/// `shutdown` is also raced against a run in progress, which is dropped
/// without submitting.
async fn poll_until(
    config: &DispatchConfig,
    source: &dyn DispatchSource,
    sink: &dyn FeatureSink,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    let mut ticker = tokio::time::interval(config.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            () = &mut shutdown => {
                log::info!("Interrupted, stopping poller");
                return;
            }
        }

        tokio::select! {
            result = run_once(config, source, sink) => {
                if let Err(e) = result {
                    log::error!("Run failed: {e}");
                }
            }
            () = &mut shutdown => {
                log::info!("Interrupted during a run, stopping poller");
                return;
            }
        }
    }
}
