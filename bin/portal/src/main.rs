use std::path::PathBuf;
use std::sync::Arc;

use bank_portal::{config::PortalConfig, navigator::TerminalNavigator, shell::Shell};
use bank_portal_http::HttpAuthBackend;
use bank_portal_session::{AuthFlows, RouteGuard, RouteTable, SessionBootstrapper, SessionStore};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "bank-portal", about = "Terminal client for the bank portal")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, env = "BANK_PORTAL_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PortalConfig::load(cli.config.as_deref()).expect("failed to load configuration");
    tracing::info!(base_url = %config.backend.base_url, "Loaded configuration");

    let backend = Arc::new(
        HttpAuthBackend::new(config.backend.clone()).expect("failed to build bank API client"),
    );
    let store = SessionStore::new();

    let bootstrapper = SessionBootstrapper::new(backend.clone(), store.clone());
    tokio::spawn(async move {
        bootstrapper.run().await;
    });

    let flows = AuthFlows::new(backend, store.clone(), config.navigation.clone());
    let home = config.navigation.dashboard_path.clone();
    let routes = RouteTable::bank(&config.navigation);
    let navigator = TerminalNavigator::new(config.navigation.clone());
    let guard = RouteGuard::new(store.clone(), routes, config.navigation);
    let shell = Arc::new(Shell::new(flows, guard, navigator));
    let watcher = shell.spawn_watcher();

    shell.open(&home);

    tokio::select! {
        () = shell.run(BufReader::new(tokio::io::stdin())) => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::warn!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("Interrupted, shutting down");
        }
    }

    store.teardown();
    if let Err(e) = watcher.await {
        tracing::warn!(error = %e, "view watcher panicked");
    }
}
