//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "countdown-server")]
#[command(about = "A countdown timer with start/pause/reset control over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial countdown minutes
    #[arg(short, long, default_value = "0")]
    pub minutes: u64,

    /// Initial countdown seconds, added to the minutes
    #[arg(short, long, default_value = "0")]
    pub seconds: u64,

    /// Tick period in milliseconds
    #[arg(long = "tick-ms", default_value = "1000")]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Initial remaining time in seconds
    pub fn initial_seconds(&self) -> u64 {
        self.minutes
            .saturating_mul(60)
            .saturating_add(self.seconds)
    }

    /// Get the tick period as a duration
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}
