use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "paramsync",
    about = "paramsync - multi-master parameter synchronization",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub overrides: Overrides,
}

/// Values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(short, long, global = true, env = "PARAMSYNC_CONFIG", help = "Path to the config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, env = "PARAMSYNC_STORE", help = "JSON file backing the local store")]
    pub store: Option<PathBuf>,

    #[arg(long, global = true, env = "PARAMSYNC_RATE", help = "Ticks per second")]
    pub rate: Option<f64>,

    #[arg(
        long,
        global = true,
        env = "PARAMSYNC_MAX_LIFETIME",
        allow_hyphen_values = true,
        help = "Seconds of broadcasting before going listen-only (<= 0 disables)"
    )]
    pub max_lifetime: Option<f64>,

    #[arg(long = "allow", global = true, help = "Allow pattern (repeatable); replaces the file's list")]
    pub allow: Vec<String>,

    #[arg(long = "deny", global = true, help = "Deny pattern (repeatable); replaces the file's list")]
    pub deny: Vec<String>,

    #[arg(long, global = true, help = "Use a plain sleep between ticks instead of the rate limiter")]
    pub alternate_timer: bool,

    #[arg(short, long, global = true, env = "PARAMSYNC_VERBOSE", help = "Log per-key decisions")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the sync daemon (default if no command specified)")]
    Run,

    #[command(subcommand, about = "View and initialize configuration")]
    Config(ConfigCommands),

    #[command(about = "Show whether keys pass the admission filter")]
    Check {
        #[arg(required = true, help = "Parameter keys, e.g. /robot/arm/gain")]
        keys: Vec<String>,
    },

    #[command(about = "Print the wire encoding of a JSON value")]
    Encode {
        #[arg(help = "JSON value, e.g. '{\"gains\": [1, 2.5]}'")]
        value: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write the effective configuration to the config file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::parse_from(["paramsync"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "paramsync",
            "check",
            "/a",
            "/b",
            "--deny",
            "/a*",
            "--deny",
            "/c",
            "--max-lifetime",
            "-1",
        ]);

        assert_eq!(cli.overrides.deny, vec!["/a*".to_string(), "/c".to_string()]);
        assert_eq!(cli.overrides.max_lifetime, Some(-1.0));
        match cli.command {
            Some(Commands::Check { keys }) => assert_eq!(keys, vec!["/a", "/b"]),
            _ => panic!("expected check"),
        }
    }
}
