use crate::words::{RandomWords, WordSource, WordSourceError};
use clap::Parser;
use std::path::PathBuf;

/// Word Wall session server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(short = 'H', long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Maximum concurrent connections
    #[arg(short, long, env = "MAX_CLIENTS", default_value_t = 64)]
    pub max_clients: usize,

    /// Events buffered per connection before new ones are dropped
    #[arg(long, env = "OUTBOUND_BUFFER", default_value_t = 64)]
    pub outbound_buffer: usize,

    /// File with one word per line; the built-in list is used when absent
    #[arg(short, long, env = "WORDS_FILE")]
    pub words_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            max_clients: 64,
            outbound_buffer: 64,
            words_file: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn word_source(&self) -> Result<Box<dyn WordSource>, WordSourceError> {
        match &self.words_file {
            Some(path) => Ok(Box::new(RandomWords::from_file(path)?)),
            None => Ok(Box::new(RandomWords::builtin())),
        }
    }
}
