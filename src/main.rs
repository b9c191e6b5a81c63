use std::sync::Arc;

use bookshelf::app::App;
use bookshelf::config::{Cli, Config, default_config_dir, default_config_path};
use bookshelf::db::Database;
use bookshelf::handler::AppState;
use bookshelf::kv::KeyValueStore;
use bookshelf::search::SearchClient;
use bookshelf::theme::ThemeStore;
use bookshelf::{router, store};
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    let _ = dotenvy::dotenv();

    // With --config, data (database, store file) lives next to the config file.
    // Otherwise both live in ~/.bookshelf/.
    let (config_path, data_dir) = match &args.config_path {
        Some(path) => {
            let path = std::path::PathBuf::from(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| std::path::PathBuf::from("."));
            (path, dir)
        }
        None => (default_config_path(), default_config_dir()),
    };

    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        eprintln!("failed to create data directory {:?}: {}", data_dir, e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookshelf.svc starting");

    let mut cfg = Config::new(&config_path).unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config file");
        std::process::exit(1);
    });
    cfg.apply_cli(&args);

    let db = Arc::new(
        Database::open(data_dir.join(&cfg.favorites.database))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "failed to setup database");
                std::process::exit(1);
            }),
    );

    let kv = Arc::new(KeyValueStore::new(data_dir.join(&cfg.favorites.store_file)));
    let search = SearchClient::new(&cfg.search).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup search client");
        std::process::exit(1);
    });
    let favorites = store::from_config(&cfg, kv.clone()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup favorites store");
        std::process::exit(1);
    });
    let app = Arc::new(App::new(search, favorites, ThemeStore::new(kv)));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    // In server mode the favorites endpoint is this process, so the initial
    // load has to wait until the listener exists.
    let startup = app.clone();
    tokio::spawn(async move {
        startup.startup().await;
    });

    let app_router = router(AppState { db, app });

    tracing::info!("bookshelf.svc running on {}", &address);
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
    };

    if let Err(err) = axum::serve(listener, app_router)
        .with_graceful_shutdown(shutdown)
        .await
    {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("bookshelf.svc going off, graceful shutdown complete");
}
