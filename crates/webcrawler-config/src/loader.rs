//! Loading configuration from JSON.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

use crate::configuration::{Builder, CrawlerConfiguration};
use crate::error::Result;

/// Loads a [`CrawlerConfiguration`] from a JSON file.
#[derive(Debug, Clone)]
pub struct ConfigurationLoader {
    path: PathBuf,
}

impl ConfigurationLoader {
    /// Create a loader for the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the configuration, falling back to defaults on any failure.
    #[must_use]
    pub fn load(&self) -> CrawlerConfiguration {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(
                path = %self.path.display(),
                "Failed to load crawler configuration, using defaults: {}",
                e
            );
            CrawlerConfiguration::default()
        })
    }

    /// Load the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError`](crate::ConfigError) if the file cannot be read, is not
    /// valid JSON, or holds an invalid pattern.
    pub fn try_load(&self) -> Result<CrawlerConfiguration> {
        let file = File::open(&self.path)?;
        Self::try_read(BufReader::new(file))
    }

    /// Read a configuration from JSON, falling back to defaults on any failure.
    ///
    /// The reader is consumed but not closed; pass `&mut reader` to keep it.
    #[must_use]
    pub fn read<R: Read>(reader: R) -> CrawlerConfiguration {
        Self::try_read(reader).unwrap_or_else(|e| {
            tracing::warn!("Failed to read configuration, using defaults: {e}");
            CrawlerConfiguration::default()
        })
    }

    /// Read a configuration from JSON.
    ///
    /// # Errors
    ///
    /// [`ConfigError`](crate::ConfigError) if the input is not valid JSON or
    /// holds an invalid pattern.
    pub fn try_read<R: Read>(reader: R) -> Result<CrawlerConfiguration> {
        let builder: Builder = serde_json::from_reader(reader)?;
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn read_recognizes_every_option() {
        let json = r#"{
            "startPages": ["http://example.com", "http://example.com/about"],
            "ignoredUrls": ["http://example\\.com/private.*"],
            "ignoredWords": ["^.{1,3}$"],
            "parallelism": 3,
            "implementationOverride": "SequentialCrawler",
            "parserImplementationOverride": "WhitespaceParser",
            "maxDepth": 10,
            "timeoutSeconds": 7,
            "popularWordCount": 3,
            "profileOutputPath": "profileData.txt",
            "resultPath": "crawlResults.json"
        }"#;

        let config = ConfigurationLoader::try_read(json.as_bytes()).unwrap();

        assert_eq!(config.start_pages.len(), 2);
        assert!(config.is_ignored_url("http://example.com/private/1"));
        assert!(config.is_ignored_word("and"));
        assert_eq!(config.parallelism, 3);
        assert_eq!(
            config.implementation_override.as_deref(),
            Some("SequentialCrawler")
        );
        assert_eq!(config.max_depth, 10);
        assert_eq!(config.timeout, Duration::from_secs(7));
        assert_eq!(config.popular_word_count, 3);
        assert_eq!(
            config.profile_output_path,
            Some(PathBuf::from("profileData.txt"))
        );
        assert_eq!(config.result_path, Some(PathBuf::from("crawlResults.json")));
    }

    #[test]
    fn missing_options_take_defaults_and_unknown_ones_are_ignored() {
        let config =
            ConfigurationLoader::try_read(r#"{"maxDepth": 2, "colour": "blue"}"#.as_bytes())
                .unwrap();

        assert_eq!(config.max_depth, 2);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.start_pages.is_empty());
    }

    #[test]
    fn malformed_json_degrades_to_defaults() {
        assert!(matches!(
            ConfigurationLoader::try_read("{ not json".as_bytes()),
            Err(ConfigError::Json(_))
        ));

        let config = ConfigurationLoader::read("{ not json".as_bytes());
        assert_eq!(config.max_depth, 0);
        assert!(config.start_pages.is_empty());
    }

    #[test]
    fn wrong_type_degrades_to_defaults() {
        let config = ConfigurationLoader::read(r#"{"maxDepth": "deep"}"#.as_bytes());
        assert_eq!(config.max_depth, 0);
    }

    #[test]
    fn invalid_pattern_degrades_to_defaults() {
        let config = ConfigurationLoader::read(
            r#"{"startPages": ["http://a"], "ignoredWords": ["("]}"#.as_bytes(),
        );
        assert!(config.start_pages.is_empty());
        assert!(config.ignored_words.is_empty());
    }

    #[test]
    fn reader_stays_usable_after_read() {
        let mut reader: &[u8] = br#"{"maxDepth": 1}"#;
        let config = ConfigurationLoader::read(&mut reader);
        assert_eq!(config.max_depth, 1);
        assert!(reader.is_empty());
    }
}
