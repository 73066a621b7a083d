//! Crawler configuration values.

use std::path::PathBuf;
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Settings for one crawl.
#[derive(Debug, Clone)]
pub struct CrawlerConfiguration {
    /// Pages the crawl starts from.
    pub start_pages: Vec<String>,
    /// Pages whose URL matches any of these are skipped.
    pub ignored_urls: Vec<Regex>,
    /// Words matching any of these are not counted.
    pub ignored_words: Vec<Regex>,
    /// Worker threads to crawl with.
    pub parallelism: usize,
    /// Name of the crawler implementation to use instead of the default.
    pub implementation_override: Option<String>,
    /// Name of the page parser implementation to use instead of the default.
    pub parser_implementation_override: Option<String>,
    /// How many links deep to follow from a start page.
    pub max_depth: usize,
    /// Overall crawl deadline.
    pub timeout: Duration,
    /// Number of most frequent words to report.
    pub popular_word_count: usize,
    /// Where the profile report is appended. `None` means stdout.
    pub profile_output_path: Option<PathBuf>,
    /// Where the crawl result is written. `None` means stdout.
    pub result_path: Option<PathBuf>,
}

impl Default for CrawlerConfiguration {
    fn default() -> Self {
        Self {
            start_pages: Vec::new(),
            ignored_urls: Vec::new(),
            ignored_words: Vec::new(),
            parallelism: default_parallelism(),
            implementation_override: None,
            parser_implementation_override: None,
            max_depth: 0,
            timeout: DEFAULT_TIMEOUT,
            popular_word_count: 0,
            profile_output_path: None,
            result_path: None,
        }
    }
}

impl CrawlerConfiguration {
    /// Start building a configuration from defaults.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Check if `url` matches an ignored-URL pattern.
    #[must_use]
    pub fn is_ignored_url(&self, url: &str) -> bool {
        self.ignored_urls
            .iter()
            .any(|pattern| pattern.is_match(url))
    }

    /// Check if `word` matches an ignored-word pattern.
    #[must_use]
    pub fn is_ignored_word(&self, word: &str) -> bool {
        self.ignored_words
            .iter()
            .any(|pattern| pattern.is_match(word))
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map_or(1, std::num::NonZeroUsize::get)
}

/// Builder for [`CrawlerConfiguration`].
///
/// Patterns are kept as text until [`Builder::build`] compiles them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Builder {
    start_pages: Vec<String>,
    ignored_urls: Vec<String>,
    ignored_words: Vec<String>,
    parallelism: Option<usize>,
    implementation_override: Option<String>,
    parser_implementation_override: Option<String>,
    max_depth: usize,
    timeout_seconds: Option<u64>,
    popular_word_count: usize,
    profile_output_path: Option<PathBuf>,
    result_path: Option<PathBuf>,
}

impl Builder {
    /// Add start pages.
    #[must_use]
    pub fn add_start_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.start_pages.extend(pages.into_iter().map(Into::into));
        self
    }

    /// Add ignored-URL patterns.
    #[must_use]
    pub fn add_ignored_urls<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_urls
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Add ignored-word patterns.
    #[must_use]
    pub fn add_ignored_words<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_words
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Set the worker thread count. Zero means "use available parallelism".
    #[must_use]
    pub const fn parallelism(mut self, threads: usize) -> Self {
        self.parallelism = Some(threads);
        self
    }

    /// Set the crawler implementation name.
    #[must_use]
    pub fn implementation_override(mut self, name: impl Into<String>) -> Self {
        self.implementation_override = Some(name.into());
        self
    }

    /// Set the page parser implementation name.
    #[must_use]
    pub fn parser_implementation_override(mut self, name: impl Into<String>) -> Self {
        self.parser_implementation_override = Some(name.into());
        self
    }

    /// Set the maximum link depth.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the crawl timeout, in whole seconds.
    #[must_use]
    pub const fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Set how many popular words to report.
    #[must_use]
    pub const fn popular_word_count(mut self, count: usize) -> Self {
        self.popular_word_count = count;
        self
    }

    /// Set the profile report path.
    #[must_use]
    pub fn profile_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile_output_path = Some(path.into());
        self
    }

    /// Set the crawl result path.
    #[must_use]
    pub fn result_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.result_path = Some(path.into());
        self
    }

    /// Compile patterns and produce the configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Pattern`] if an ignored-URL or ignored-word pattern is
    /// not a valid regular expression.
    pub fn build(self) -> Result<CrawlerConfiguration> {
        Ok(CrawlerConfiguration {
            start_pages: self.start_pages,
            ignored_urls: compile_patterns(self.ignored_urls)?,
            ignored_words: compile_patterns(self.ignored_words)?,
            parallelism: match self.parallelism {
                Some(0) | None => default_parallelism(),
                Some(threads) => threads,
            },
            implementation_override: non_empty(self.implementation_override),
            parser_implementation_override: non_empty(self.parser_implementation_override),
            max_depth: self.max_depth,
            timeout: self
                .timeout_seconds
                .map_or(DEFAULT_TIMEOUT, Duration::from_secs),
            popular_word_count: self.popular_word_count,
            profile_output_path: self
                .profile_output_path
                .filter(|p| !p.as_os_str().is_empty()),
            result_path: self.result_path.filter(|p| !p.as_os_str().is_empty()),
        })
    }
}

fn compile_patterns(patterns: Vec<String>) -> Result<Vec<Regex>> {
    patterns
        .into_iter()
        .map(|pattern| {
            Regex::new(&pattern)
                .map_err(|source| ConfigError::Pattern { pattern, source })
        })
        .collect()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CrawlerConfiguration::default();

        assert!(config.start_pages.is_empty());
        assert!(config.parallelism >= 1);
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.result_path.is_none());
    }

    #[test]
    fn builder_sets_every_field() {
        let config = CrawlerConfiguration::builder()
            .add_start_pages(["http://example.com"])
            .add_ignored_urls([r"http://example\.com/ads/.*"])
            .add_ignored_words(["^.{1,3}$"])
            .parallelism(4)
            .implementation_override("SequentialCrawler")
            .parser_implementation_override("WhitespaceParser")
            .max_depth(2)
            .timeout_seconds(5)
            .popular_word_count(10)
            .profile_output_path("profile.txt")
            .result_path("result.json")
            .build()
            .unwrap();

        assert_eq!(config.start_pages, ["http://example.com"]);
        assert!(config.is_ignored_url("http://example.com/ads/banner"));
        assert!(!config.is_ignored_url("http://example.com/news"));
        assert!(config.is_ignored_word("the"));
        assert!(!config.is_ignored_word("crawler"));
        assert_eq!(config.parallelism, 4);
        assert_eq!(
            config.implementation_override.as_deref(),
            Some("SequentialCrawler")
        );
        assert_eq!(
            config.parser_implementation_override.as_deref(),
            Some("WhitespaceParser")
        );
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.popular_word_count, 10);
        assert_eq!(
            config.profile_output_path,
            Some(PathBuf::from("profile.txt"))
        );
        assert_eq!(config.result_path, Some(PathBuf::from("result.json")));
    }

    #[test]
    fn empty_paths_mean_stdout() {
        let config = CrawlerConfiguration::builder()
            .profile_output_path("")
            .result_path("")
            .build()
            .unwrap();

        assert!(config.profile_output_path.is_none());
        assert!(config.result_path.is_none());
    }

    #[test]
    fn bad_pattern_is_reported() {
        let err = CrawlerConfiguration::builder()
            .add_ignored_words(["(unclosed"])
            .build()
            .unwrap_err();

        assert!(matches!(err, ConfigError::Pattern { ref pattern, .. } if pattern == "(unclosed"));
    }
}
