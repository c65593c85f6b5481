//! Bootstrap: load config, construct Store, Dispatcher,
//! Frontend; start the Store thread, then the Dispatcher task, then the RPC
//! server; signal readiness; wait for termination; `Stop` the Store.
//!
//! Thin by design: all route logic lives in `routes.rs`, all shared state
//! in `state.rs`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use rsch_config::Config;
use rsch_dispatcher::{Dispatcher, DispatcherConfig};
use rsch_remote::{RedditClient, RedditCredentials};
use rsch_store::Store;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config_or_exit();
    init_tracing(config.general.debug);

    let db_path = rsch_config::db_path().context("could not resolve DB_PATH")?;

    let (store, store_join) = Store::spawn(&db_path).context("failed to start store")?;

    let remote: Arc<RedditClient> = Arc::new(RedditClient::new(RedditCredentials {
        username: config.reddit.username.clone(),
        password: config.reddit.password.clone(),
        client_id: config.reddit.client_id.clone(),
        client_secret: config.reddit.client_secret.clone(),
    }));

    let dispatcher = Dispatcher::new(
        store.clone(),
        remote.clone(),
        DispatcherConfig {
            step_interval: Duration::from_secs_f64(config.general.post_interval),
            dry_run: config.general.dry_run,
            tmp_dir: DispatcherConfig::default_tmp_dir(),
        },
    );
    tokio::spawn(dispatcher.run());

    let state = Arc::new(rsch_daemon::AppState::new(store.clone(), remote));
    let app = rsch_daemon::routes::build_router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.general.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("reddit-schedulerd listening on {}", addr);

    notify_ready();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    store.stop().await;
    let _ = store_join.join();
    Ok(())
}

fn load_config_or_exit() -> Config {
    match rsch_config::load() {
        Ok(c) => c,
        Err(err) => {
            eprintln!("fatal: could not load configuration: {err:#}");
            std::process::exit(1);
        }
    }
}

/// `elevated` is `true` when either `DEBUG=1` or the config's `[General]
/// Debug` key set the threshold to debug-level; `rsch_config::load` already
/// folds the env override into `GeneralConfig.debug`.
fn init_tracing(elevated: bool) {
    let default_filter = if elevated { "debug" } else { "info" };
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_STDOUT").is_ok() {
        builder.with_writer(std::io::stdout).init();
    } else {
        builder.init();
    }
}

/// Best-effort `READY=1` notification. A no-op off Linux or
/// without a notify socket.
fn notify_ready() {
    if let Err(err) = sd_notify::notify(false, &[sd_notify::NotifyState::Ready]) {
        tracing::debug!(error = ?err, "sd_notify unavailable, skipping readiness notification");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining");
}
