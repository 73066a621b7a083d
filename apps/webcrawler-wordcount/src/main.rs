//! Profiled word count over locally stored pages.
//!
//! Loads a crawler configuration, crawls the configured start pages (local
//! files or `file://` URLs) and reports the most popular words. The page
//! parser and the crawler are both wrapped in a profiler, and the timing
//! report is appended to the configured profile path.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p webcrawler-wordcount -- config.json
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., info, debug, trace)

mod crawler;
mod parser;
mod result;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;
use webcrawler_config::{ConfigurationLoader, CrawlerConfiguration};
use webcrawler_profiler::Profiler;

use crate::crawler::WebCrawler;
use crate::parser::PageParser;
use crate::result::CrawlResult;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the result and report.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .context("Usage: webcrawler-wordcount <config.json>")?;
    let config = Arc::new(ConfigurationLoader::new(config_path).load());

    let profiler = Profiler::system();
    let result = run(&config, &profiler)?;

    match &config.result_path {
        Some(path) => {
            result
                .write_to_path(path)
                .with_context(|| format!("Failed to write crawl result to {}", path.display()))?;
            info!(path = %path.display(), "wrote crawl result");
        }
        None => result.write(&mut io::stdout().lock())?,
    }

    match &config.profile_output_path {
        Some(path) => profiler.write_data_to_path(path)?,
        None => {
            let mut stdout = io::stdout().lock();
            profiler.write_data(&mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Build the profiled parser and crawler named by `config` and crawl.
fn run(config: &Arc<CrawlerConfiguration>, profiler: &Profiler) -> anyhow::Result<CrawlResult> {
    let parser = parser::from_name(config.parser_implementation_override.as_deref())?;
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap::<dyn PageParser, _>(parser)?);

    let crawler = crawler::from_name(
        config.implementation_override.as_deref(),
        Arc::clone(config),
        parser,
    )?;
    let crawler = profiler.wrap::<dyn WebCrawler, _>(crawler)?;

    info!(
        pages = config.start_pages.len(),
        threads = crawler.max_parallelism(),
        "starting crawl"
    );
    let result = crawler.crawl(&config.start_pages);
    info!(urls_visited = result.urls_visited, "crawl finished");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use chrono::DateTime;
    use webcrawler_profiler::FakeClock;

    use super::*;

    #[test]
    fn run_profiles_parser_and_crawler() {
        let dir = tempfile::tempdir().unwrap();
        let page = dir.path().join("page.txt");
        fs::write(&page, "profiling profiling words").unwrap();

        let config = Arc::new(
            CrawlerConfiguration::builder()
                .add_start_pages([page.to_string_lossy()])
                .implementation_override("SequentialWebCrawler")
                .parser_implementation_override("PlainTextParser")
                .max_depth(1)
                .timeout_seconds(30)
                .popular_word_count(1)
                .build()
                .unwrap(),
        );
        let start = DateTime::parse_from_rfc3339("2026-10-18T09:30:00+00:00").unwrap();
        let clock = Arc::new(FakeClock::new(start));
        let profiler = Profiler::new(clock.clone());

        let result = run(&config, &profiler).unwrap();
        assert_eq!(result.word_counts, [("profiling".to_string(), 2)]);

        let stats = profiler.state().snapshot();
        let lines: Vec<_> = stats.iter().map(|s| s.report_line()).collect();
        assert_eq!(
            lines,
            [
                "webcrawler_wordcount::parser::PlainTextParser#parse took 0m 0s 0ms",
                "webcrawler_wordcount::crawler::SequentialWebCrawler#crawl took 0m 0s 0ms",
            ]
        );
        assert!(stats.iter().all(|s| s.total == Duration::ZERO));
    }
}
