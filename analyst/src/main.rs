use anyhow::{bail, Context};
use chaoscore::gateway::GeminiGateway;
use chaoscore::orchestrator::ViewState;
use chaoscore::view::filter_catalog;
use clap::Parser;
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::AnalystConfig;
use workflow::report::{analysis_report, comparison_report};
use workflow::runner::Runner;

mod http_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Headless driver for the circuit unpredictability index")]
struct Args {
    /// Load settings from a YAML config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Analyze one circuit by catalog id and print the report
    #[arg(long)]
    circuit: Option<String>,
    /// Rank the leading catalog circuits against each other
    #[arg(long, default_value_t = false)]
    compare: bool,
    /// Print the catalog, optionally filtered by name or country
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    list: Option<String>,
    /// Keep the HTTP bridge alive until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
    /// Override the model name
    #[arg(long)]
    model: Option<String>,
    /// Reject payloads missing schema-required fields
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            AnalystConfig::load(path)?.override_with(args.model.clone(), args.strict, args.bind)
        }
        None => AnalystConfig::from_args(args.model.clone(), args.strict, args.bind),
    };

    if let Some(query) = &args.list {
        for circuit in filter_catalog(&config.catalog(), query) {
            println!(
                "{:<12} {:<36} {}, {}",
                circuit.id, circuit.name, circuit.location, circuit.country
            );
        }
    }

    if args.circuit.is_none() && !args.compare && !args.serve {
        return Ok(());
    }

    let gateway = GeminiGateway::new(config.gateway.clone()).context("creating model gateway")?;
    let runner = Runner::new(&config, Arc::new(gateway));
    info!("using model {}", runner.model_name());

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating tokio runtime")?;

    runtime.block_on(async {
        if let Some(circuit_id) = &args.circuit {
            runner
                .select(circuit_id)
                .await
                .with_context(|| format!("selecting circuit {circuit_id}"))?;
            match runner.snapshot().single {
                ViewState::Ready(analysis) => {
                    let circuit = runner.resolve_circuit(circuit_id);
                    println!("{}", analysis_report(&analysis, circuit));
                }
                ViewState::Failed(message) => bail!(message),
                _ => {}
            }
        }

        if args.compare {
            runner.compare().await.context("requesting comparison")?;
            match runner.snapshot().comparison {
                ViewState::Ready(data) => {
                    println!("{}", comparison_report(&data, &config.catalog()));
                }
                ViewState::Failed(message) => bail!(message),
                _ => {}
            }
        }

        if args.serve {
            http_bridge::bridge::serve(runner.clone(), config.bind).await?;
        }
        Ok::<(), anyhow::Error>(())
    })
}
