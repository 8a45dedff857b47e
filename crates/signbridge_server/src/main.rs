//! Signbridge gateway server.
//!
//! Serves sentence generation and landmark prediction over HTTP.

use clap::Parser;
use signbridge_error::{ServerError, SignbridgeResult};
use signbridge_models::{Classifier, LinearClassifier};
use signbridge_rate_limit::RetryController;
use signbridge_server::{
    AppState, GatewayConfig, ObservabilityConfig, SentenceGateway, create_router, gemini_backend,
    init_observability, shutdown_observability,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Command-line arguments for the gateway.
#[derive(Parser, Debug)]
#[command(name = "signbridge-server")]
#[command(about = "Signbridge gateway - sign-language keywords to sentences")]
#[command(version)]
struct Args {
    /// Configuration file (defaults to the layered search)
    #[arg(short, long, env = "SIGNBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// Classifier artifact
    #[arg(long, env = "SIGNBRIDGE_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,

    /// Export spans to stdout
    #[arg(long)]
    otel_stdout: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Gateway stopped");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> SignbridgeResult<()> {
    // .env must be read before anything looks at the environment.
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let observability = ObservabilityConfig::default()
        .with_log_level(if args.verbose { "debug" } else { "info" })
        .with_json_logs(args.json_logs)
        .with_otel_stdout(args.otel_stdout);
    let provider = init_observability(&observability)?;

    let result = serve(args).await;
    shutdown_observability(provider);
    result
}

async fn serve(args: Args) -> SignbridgeResult<()> {
    info!("Starting Signbridge gateway");

    let config = match &args.config {
        Some(path) => GatewayConfig::from_file(path)?,
        None => GatewayConfig::load()?,
    };

    let mut server = config.server().clone();
    if let Some(host) = args.host {
        server = server.with_host(host);
    }
    if let Some(port) = args.port {
        server = server.with_port(port);
    }
    if let Some(model_path) = args.model_path {
        server = server.with_model_path(model_path);
    }
    let config = config.with_server(server);

    let backend = gemini_backend(config.upstream())?;
    info!(model = %config.upstream().model(), "Upstream client ready");

    let classifier = LinearClassifier::from_file(config.server().model_path())?;
    info!(
        path = %config.server().model_path().display(),
        input_dim = classifier.input_dim(),
        "Classifier loaded"
    );

    let gateway = SentenceGateway::new(Arc::new(backend), RetryController::new(*config.retry()));
    let state = AppState::new(Arc::new(gateway), Arc::new(classifier));
    let app = create_router(state, config.server().cors_origins());

    let address = config.server().bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServerError::new(format!("Failed to bind {}: {}", address, e)))?;
    info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(format!("Server error: {}", e)))?;

    info!("Gateway shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
