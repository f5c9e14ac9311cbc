//! The `govbrnews` application.
//!
//! Loads configuration, initialises logging and dispatches commands.

use std::sync::Arc;

use govbrnews_core::traits::ConfigProvider;
use govbrnews_core::{Error, Result};
use govbrnews_mcp::GovBrNewsServer;
use govbrnews_search::{SearchBackend, TypesenseClient};
use tracing_subscriber::EnvFilter;

use crate::cli::{CliArgs, Command};
use crate::config::GovBrNewsConfig;
use crate::config_handlers;

// ============================================================================
// GovBrNewsCli
// ============================================================================

/// The application behind the `govbrnews` binary.
pub struct GovBrNewsCli {
    name: String,
    config: GovBrNewsConfig,
    version: String,
}

impl GovBrNewsCli {
    /// Create from CLI args, loading config from file/env.
    ///
    /// # Errors
    ///
    /// Fails when the configuration cannot be loaded.
    pub fn from_args(args: &CliArgs) -> Result<Self> {
        let config = GovBrNewsConfig::load(args.config.as_deref())?;
        Ok(Self::new(config))
    }

    /// Create an application over an already loaded configuration.
    pub fn new(config: GovBrNewsConfig) -> Self {
        Self {
            name: "govbrnews".to_string(),
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &GovBrNewsConfig {
        &self.config
    }

    /// Initialise tracing-based logging on stderr.
    ///
    /// `RUST_LOG` wins when set; otherwise the verbosity flags, then
    /// `logging.level`.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let rust_log = std::env::var("RUST_LOG").ok();
        let filter = EnvFilter::new(log_directive(
            rust_log.as_deref(),
            verbose,
            quiet,
            &self.config.logging.level,
        ));

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Run the command selected by `args`; no command means `serve`.
    ///
    /// # Errors
    ///
    /// Propagates configuration, connection and transport failures.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command.unwrap_or(Command::Serve) {
            Command::Serve => self.serve().await,
            Command::Health => {
                let url = self.config.typesense_url()?;
                if self.check_health().await? {
                    println!("{}: healthy ({url})", self.name);
                    Ok(())
                } else {
                    println!("{}: unhealthy ({url})", self.name);
                    Err(Error::backend(format!("Typesense at {url} is not healthy")))
                }
            }
            Command::Version => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Command::Config(config_cmd) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
        }
    }

    async fn serve(&self) -> Result<()> {
        let backend = connect(&self.config)?;
        if !backend.health().await {
            log::warn!("Typesense is not answering; tools will report errors until it does");
        }
        let temporal = self.config.temporal_config()?;
        log::info!(
            "Serving collection '{}' (timezone {}, concurrency {})",
            self.config.collection(),
            temporal.timezone,
            temporal.max_concurrency
        );
        GovBrNewsServer::new(backend, temporal).serve_stdio().await
    }

    async fn check_health(&self) -> Result<bool> {
        Ok(connect(&self.config)?.health().await)
    }
}

/// Builds the Typesense backend described by `config`.
///
/// # Errors
///
/// Fails when the URL or API key is not configured.
pub fn connect<C: ConfigProvider>(config: &C) -> Result<Arc<dyn SearchBackend>> {
    Ok(Arc::new(TypesenseClient::from_config(config)?))
}

fn log_directive(rust_log: Option<&str>, verbose: bool, quiet: bool, configured: &str) -> String {
    match rust_log {
        Some(directive) if !directive.is_empty() => directive.to_string(),
        _ if quiet => "warn".to_string(),
        _ if verbose => "debug".to_string(),
        _ if configured.trim().is_empty() => "info".to_string(),
        _ => configured.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
