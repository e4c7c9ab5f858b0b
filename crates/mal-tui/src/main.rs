mod app;
mod message;
mod theme;
mod widget;
mod widgets;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = mal_core::config::Config::from_env()
        .context("set MAL_CLIENT_ID to a MyAnimeList API client id")?;

    let data_dir = mal_core::config::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("malwatch.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress
    // connection-level DEBUG from HTTP client internals.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // The terminal itself is taken over by the TUI; tell the operator where
    // the log went before that happens.
    eprintln!("malwatch log: {}", log_path.display());

    tracing::info!("malwatch starting…");

    app::App::new(config).run().await
}
