//! # chat-cli
//!
//! Command-line chat client for the parley protocol.
//!
//! ## Example
//!
//! ```bash
//! # Chat as Alice in the default room
//! parley Alice
//!
//! # Pick a service address and room
//! parley Alice --server chat.example.net:50051 --room dev
//! ```
//!
//! Typed lines are sent to the room; `exit` (or closing stdin) leaves the
//! room and quits. Messages from other participants print as
//! `author: text` while a background task keeps the room in sync.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use parley_chat_client::{ChatClient, TcpTransport};
use parley_chat_types::User;
use tracing_subscriber::EnvFilter;

mod session;

use session::Settings;

/// Command-line chat client for the parley protocol.
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Display name to chat as
    #[arg(default_value = "Tommy")]
    name: String,

    /// Address of the chat service
    #[arg(long, default_value = "127.0.0.1:50051")]
    server: String,

    /// Room to join, created if it does not exist
    #[arg(long, default_value = "main")]
    room: String,

    /// Seconds between background message pulls
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,

    /// Seconds before an in-flight pull is abandoned until the next tick
    /// (0 waits indefinitely)
    #[arg(long, default_value_t = 30)]
    pull_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let transport = TcpTransport::new(&cli.server);
    let client = ChatClient::new(User::new(&cli.name), transport);

    let settings = Settings {
        room: cli.room,
        pull_interval: Duration::from_secs(cli.interval),
        pull_timeout: (cli.pull_timeout > 0).then(|| Duration::from_secs(cli.pull_timeout)),
    };

    session::run(client, settings).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_service_conventions() {
        let cli = Cli::parse_from(["parley"]);
        assert_eq!(cli.name, "Tommy");
        assert_eq!(cli.server, "127.0.0.1:50051");
        assert_eq!(cli.room, "main");
        assert_eq!(cli.interval, 1);
        assert_eq!(cli.pull_timeout, 30);
    }

    #[test]
    fn positional_name_overrides_default() {
        let cli = Cli::parse_from(["parley", "Alice", "--room", "dev"]);
        assert_eq!(cli.name, "Alice");
        assert_eq!(cli.room, "dev");
    }
}
