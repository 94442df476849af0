use mimalloc::MiMalloc;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use strongbox::VaultError;
use strongbox::auth::{AuthGate, TerminalPrompter};
use strongbox::config::Config;
use strongbox::router::{VaultState, vault_router};
use strongbox::service::{self, VaultOps};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        key_file = %cfg.key_file.display(),
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel
    );

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "strongbox terminated");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cfg: Config) -> Result<(), VaultError> {
    let mut gate = AuthGate::new(cfg.master_key.clone());
    let mut prompter = TerminalPrompter;
    let prompt_result = tokio::task::block_in_place(|| gate.run(&mut prompter))?;
    let Some(unlocked) = prompt_result else {
        println!("Exiting program...");
        return Ok(());
    };
    println!("Welcome to your Password Manager");

    let ops = VaultOps::open(unlocked, &cfg).await?;
    let vault = service::spawn(ops).await?;

    let state = VaultState::new(vault.clone(), Arc::from(cfg.master_key.as_str()));
    let app = vault_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    vault.stop();
    info!("vault closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
