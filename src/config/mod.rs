pub mod command;

use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::path::PathBuf;

use nexus_client::api::DEFAULT_BASE_URL;

pub use command::*;

#[derive(Debug, Clone, Parser)]
#[command(name = "nexus", version, about)]
pub struct Config {
    /// Backend API address
    #[arg(long, env = "NEXUS_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
    /// Directory the session is kept in between runs
    #[arg(long, env = "NEXUS_STORAGE", default_value = "./.nexus")]
    storage: PathBuf,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
    pub const fn storage(&self) -> &PathBuf {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = Config::try_parse_from(["nexus", "whoami"]).unwrap();
        assert_eq!(config.api_url(), DEFAULT_BASE_URL);
        assert_eq!(config.storage(), &PathBuf::from("./.nexus"));
        assert!(matches!(config.command, Command::Whoami));
    }

    #[test]
    fn parses_nested_commands() {
        let config =
            Config::try_parse_from(["nexus", "connections", "accept", "12"]).unwrap();
        assert!(matches!(
            config.command,
            Command::Connections {
                action: Some(ConnectionsCommand::Accept { id: 12 })
            }
        ));
    }
}
