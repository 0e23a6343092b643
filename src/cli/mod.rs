pub mod commands;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Config, SourceMode};
use crate::gateway::proxy::Platform;

#[derive(Parser)]
#[command(name = "smart-encyclopedia")]
#[command(about = "Encyclopedia article lookup over a local dataset or Wikipedia", long_about = None)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Content source to resolve articles from
    #[arg(short, long, value_enum, global = true)]
    pub mode: Option<SourceMode>,

    /// Platform the client pretends to run on
    #[arg(long, value_enum, global = true)]
    pub platform: Option<Platform>,

    /// Hostname used for the proxy decision
    #[arg(long, global = true)]
    pub hostname: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flags win over the config file and environment.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(mode) = self.mode {
            config.content.mode = mode;
        }
        if let Some(platform) = self.platform {
            config.platform.kind = platform;
        }
        if let Some(hostname) = &self.hostname {
            config.platform.hostname = hostname.clone();
        }
        if let Commands::Serve {
            listen: Some(addr), ..
        } = &self.command
        {
            config.edge.listen = *addr;
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search articles
    Search {
        /// Search text, at least two characters
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show an article
    Show {
        /// Article title or slug
        title: String,
    },
    /// Open an article's page in the browser
    Open {
        /// Article title or slug
        title: String,
    },
    /// List categories
    Categories,
    /// List local articles in a category
    Browse {
        /// Category name
        category: String,
    },
    /// Run the Wikipedia summary proxy
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "smart-encyclopedia",
            "--mode",
            "remote",
            "--platform",
            "web",
            "--hostname",
            "smartencyclopedia.uk",
            "show",
            "Black hole",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.content.mode, SourceMode::Remote);
        assert_eq!(config.platform.kind, Platform::Web);
        assert_eq!(config.platform.hostname, "smartencyclopedia.uk");
        assert!(matches!(cli.command, Commands::Show { ref title } if title == "Black hole"));
    }

    #[test]
    fn test_serve_listen_override() {
        let cli = Cli::parse_from(["smart-encyclopedia", "serve", "--listen", "0.0.0.0:9000"]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.edge.listen, "0.0.0.0:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.content.mode, SourceMode::Local);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["smart-encyclopedia", "search", "quantum", "--mode", "local", "-l", "5"]);
        assert_eq!(cli.mode, Some(SourceMode::Local));
        assert!(matches!(cli.command, Commands::Search { limit: Some(5), .. }));
    }
}
