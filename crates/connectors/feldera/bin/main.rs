use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use feldera_datasource::instances::InstanceManager;
use feldera_datasource::routes::{create_router, ServerState};
use feldera_datasource::state::create_state;

#[derive(Debug, Parser)]
#[command(about = "Serve the Feldera data source to a dashboard host")]
struct ServerOptions {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,
    #[arg(long, env = "PORT", default_value_t = 8081)]
    port: u16,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let server_options = ServerOptions::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(error) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{error}");
        return ExitCode::FAILURE;
    }

    match serve(server_options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn serve(server_options: ServerOptions) -> anyhow::Result<()> {
    let address: SocketAddr = format!("{}:{}", server_options.host, server_options.port)
        .parse()
        .context("invalid listen address")?;

    let mut registry = prometheus::Registry::new();
    let state = create_state(&mut registry).await?;
    let instances = Arc::new(InstanceManager::new(state));

    let router = create_router(ServerState {
        instances: instances.clone(),
        registry,
    });

    tracing::info!(
        meta.signal_type = "log",
        event.domain = "feldera",
        event.name = "Server started",
        %address,
    );

    axum::Server::try_bind(&address)
        .with_context(|| format!("unable to listen on {address}"))?
        .serve(router.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server error")?;

    instances.dispose_all().await;
    tracing::info!(
        meta.signal_type = "log",
        event.domain = "feldera",
        event.name = "Server stopped",
    );

    Ok(())
}
