//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level arguments of the `govbrnews` binary.
#[derive(Parser, Debug)]
#[command(name = "govbrnews", author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "GOVBRNEWS_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute (defaults to `serve`).
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Commands of the `govbrnews` binary.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the MCP server over stdin/stdout.
    Serve,

    /// Check that the Typesense node answers.
    Health,

    /// Print version information.
    Version,

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Get a configuration value by dotted key.
    Get {
        /// Dotted key (e.g., "typesense.host").
        key: String,
    },

    /// Set a configuration value by dotted key.
    Set {
        /// Dotted key (e.g., "typesense.port").
        key: String,

        /// Value to set.
        value: String,
    },

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker `-e` flags.
        #[arg(long)]
        docker_env: bool,

        /// Print the API key instead of a masked value.
        #[arg(long)]
        reveal_secrets: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_args_default() {
        let args = CliArgs::parse_from(["govbrnews"]);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_cli_args_flags() {
        let args = CliArgs::parse_from(["govbrnews", "-v", "--config", "/etc/govbrnews.toml"]);
        assert!(args.verbose);
        assert_eq!(args.config.as_deref(), Some("/etc/govbrnews.toml"));

        let args = CliArgs::parse_from(["govbrnews", "--quiet", "health"]);
        assert!(args.quiet);
        assert!(matches!(args.command, Some(Command::Health)));
    }

    #[test]
    fn test_serve_and_version_commands() {
        let args = CliArgs::parse_from(["govbrnews", "serve"]);
        assert!(matches!(args.command, Some(Command::Serve)));

        let args = CliArgs::parse_from(["govbrnews", "version"]);
        assert!(matches!(args.command, Some(Command::Version)));
    }

    #[test]
    fn test_serve_takes_no_port() {
        assert!(CliArgs::try_parse_from(["govbrnews", "serve", "--port", "3000"]).is_err());
    }

    // ------------------------------------------------------------------------
    // Config command tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_config_get_command() {
        let args = CliArgs::parse_from(["govbrnews", "config", "get", "typesense.host"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Get { key },
            })) => assert_eq!(key, "typesense.host"),
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_set_command() {
        let args = CliArgs::parse_from(["govbrnews", "config", "set", "typesense.port", "8109"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Set { key, value },
            })) => {
                assert_eq!(key, "typesense.port");
                assert_eq!(value, "8109");
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_init_command() {
        let args = CliArgs::parse_from(["govbrnews", "config", "init", "--force"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command: ConfigAction::Init { file, force },
            })) => {
                assert!(file.is_none());
                assert!(force);
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_export_command() {
        let args = CliArgs::parse_from(["govbrnews", "config", "export", "--docker-env"]);
        match args.command {
            Some(Command::Config(ConfigCommand {
                command:
                    ConfigAction::Export {
                        docker_env,
                        reveal_secrets,
                    },
            })) => {
                assert!(docker_env);
                assert!(!reveal_secrets);
            }
            other => unreachable!("unexpected command: {other:?}"),
        }
    }
}
