//! Core traits for GovBRNews configuration abstraction.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where the
//! search engine lives and how to talk to it. The CLI's file/env backed
//! configuration implements it; tests implement it with plain structs.

use std::time::Duration;

use crate::Result;

/// Trait for the configuration every GovBRNews component needs.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use govbrnews_core::traits::ConfigProvider;
/// use govbrnews_core::Result;
///
/// #[derive(Clone)]
/// struct LocalConfig;
///
/// impl ConfigProvider for LocalConfig {
///     fn project_name(&self) -> &str {
///         "govbrnews"
///     }
///
///     fn typesense_url(&self) -> Result<String> {
///         Ok("http://localhost:8108".to_string())
///     }
///
///     fn api_key(&self) -> Result<String> {
///         Ok("xyz".to_string())
///     }
/// }
///
/// let config = LocalConfig;
/// assert_eq!(config.collection(), "news");
/// assert_eq!(config.connection_timeout(), Duration::from_secs(10));
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used for env var prefixes and default paths.
    fn project_name(&self) -> &str;

    /// Base URL of the Typesense node, e.g. `http://localhost:8108`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host, port or protocol are not usable.
    fn typesense_url(&self) -> Result<String>;

    /// API key sent as `X-TYPESENSE-API-KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error when no key was configured.
    fn api_key(&self) -> Result<String>;

    /// Name of the news collection.
    fn collection(&self) -> &str {
        "news"
    }

    /// Timeout for establishing a connection to the engine.
    fn connection_timeout(&self) -> Duration {
        Duration::from_secs(10)
    }
}
