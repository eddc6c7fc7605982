//! FaunaLens
//!
//! Serves `POST /api/classify`, which forwards an uploaded photo to a
//! multimodal model and returns a structured taxonomic classification, and
//! provides a `classify` command that uploads a local file to a running
//! server and prints the report.

use anyhow::Result;
use clap::Parser;
use faunalens_core::report;
use faunalens_server::cli::{ClassifyArgs, Cli, Commands, ServeArgs};
use faunalens_server::client::ClassifyClient;
use faunalens_server::{create_router, AppState, ServerConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Classify(args) => classify_file(args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    init_tracing(args.verbose);

    info!("Starting FaunaLens server");

    // Load configuration
    let config = ServerConfig::load(&args.config, &args)?;
    info!("Configuration loaded successfully");
    info!("Model: {}", config.provider.model);
    info!("Inference timeout: {:?}", config.request_timeout());

    let metrics_handle = init_metrics()?;

    let addr: SocketAddr = format!("{}:{}", config.listen, config.port).parse()?;
    let state = AppState::new(config, metrics_handle)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn classify_file(args: ClassifyArgs) -> Result<()> {
    init_tracing(args.verbose);

    let client = ClassifyClient::new(&args.server);
    let result = match client.classify_path(&args.file).await {
        Ok(result) => result,
        Err(e) => {
            debug!("Classification failed: {}", e);
            anyhow::bail!(e.user_message());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render(&result));
    }

    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("faunalens=debug,faunalens_server=debug,faunalens_core=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("faunalens=info,faunalens_server=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "faunalens_requests_total",
        "Total number of classification requests received"
    );
    metrics::describe_counter!(
        "faunalens_classifications_total",
        "Successful classifications by outcome"
    );
    metrics::describe_counter!("faunalens_errors_total", "Failed requests by error kind");
    metrics::describe_histogram!(
        "faunalens_inference_latency_ms",
        metrics::Unit::Milliseconds,
        "Inference provider latency in milliseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
