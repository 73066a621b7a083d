//! Crawler configuration and its JSON loader.
//!
//! Loading is deliberately forgiving: [`ConfigurationLoader::load`] and
//! [`ConfigurationLoader::read`] fall back to
//! [`CrawlerConfiguration::default`] when the source is missing or malformed,
//! logging the reason. Use the `try_` variants to get the typed error instead.

pub mod configuration;
pub mod error;
pub mod loader;

pub use configuration::{Builder, CrawlerConfiguration};
pub use error::{ConfigError, Result};
pub use loader::ConfigurationLoader;
