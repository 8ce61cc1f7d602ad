use clap::Parser;
use log::info;
use server::config::ServerConfig;
use server::network::{BoxError, Server};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();

    let words = config.word_source()?;
    match &config.words_file {
        Some(path) => info!("Using word list {}", path.display()),
        None => info!("Using built-in word list"),
    }

    let mut server = Server::new(&config, words).await?;

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
