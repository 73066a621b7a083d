//! Crawler implementations.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rayon::prelude::*;
use webcrawler_config::CrawlerConfiguration;
use webcrawler_profiler::profiled_trait;

use crate::parser::PageParser;
use crate::result::{popular_words, CrawlResult};

profiled_trait! {
    /// Visits pages reachable from a set of start pages and counts words.
    pub trait WebCrawler: Send + Sync {
        /// Crawl from `start_pages`.
        #[profiled]
        fn crawl(&self, start_pages: &[String]) -> CrawlResult;

        /// Worker threads this crawler uses at most.
        fn max_parallelism(&self) -> usize;
    }
}

/// Pick a crawler by configured name. `None` selects [`ParallelWebCrawler`].
pub fn from_name(
    name: Option<&str>,
    config: Arc<CrawlerConfiguration>,
    parser: Arc<dyn PageParser>,
) -> anyhow::Result<Box<dyn WebCrawler>> {
    match name {
        None | Some(ParallelWebCrawler::NAME) => Ok(Box::new(ParallelWebCrawler::new(config, parser)?)),
        Some(SequentialWebCrawler::NAME) => Ok(Box::new(SequentialWebCrawler::new(config, parser))),
        Some(other) => anyhow::bail!("Unknown crawler implementation: {other}"),
    }
}

/// State of one crawl, shared by every worker.
struct Crawl<'a> {
    config: &'a CrawlerConfiguration,
    parser: &'a dyn PageParser,
    deadline: Instant,
    visited: Mutex<HashSet<String>>,
    counts: Mutex<HashMap<String, usize>>,
}

impl<'a> Crawl<'a> {
    fn new(config: &'a CrawlerConfiguration, parser: &'a dyn PageParser) -> Self {
        Self {
            config,
            parser,
            deadline: Instant::now() + config.timeout,
            visited: Mutex::new(HashSet::new()),
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Visit one page, returning the links to follow.
    fn visit(&self, url: &str) -> Vec<String> {
        if Instant::now() >= self.deadline || self.config.is_ignored_url(url) {
            return Vec::new();
        }
        if !self.visited.lock().insert(url.to_string()) {
            return Vec::new();
        }

        match self.parser.parse(url) {
            Ok(page) => {
                let mut counts = self.counts.lock();
                for word in page.words {
                    if !self.config.is_ignored_word(&word) {
                        *counts.entry(word).or_insert(0) += 1;
                    }
                }
                page.links
            }
            Err(e) => {
                tracing::warn!(url, "Failed to parse page: {}", e);
                Vec::new()
            }
        }
    }

    /// Walk `max_depth` levels, expanding each level with `expand`.
    fn run(
        self,
        start_pages: &[String],
        expand: impl Fn(&Self, &[String]) -> Vec<String>,
    ) -> CrawlResult {
        let mut frontier = start_pages.to_vec();
        for depth in 0..self.config.max_depth {
            if frontier.is_empty() || Instant::now() >= self.deadline {
                break;
            }
            tracing::debug!(depth, pages = frontier.len(), "crawling level");
            frontier = expand(&self, &frontier);
        }

        CrawlResult {
            word_counts: popular_words(self.counts.into_inner(), self.config.popular_word_count),
            urls_visited: self.visited.into_inner().len(),
        }
    }
}

/// Crawls one page at a time on the calling thread.
pub struct SequentialWebCrawler {
    config: Arc<CrawlerConfiguration>,
    parser: Arc<dyn PageParser>,
}

impl SequentialWebCrawler {
    /// Configuration name.
    pub const NAME: &'static str = "SequentialWebCrawler";

    /// Create a crawler.
    #[must_use]
    pub fn new(config: Arc<CrawlerConfiguration>, parser: Arc<dyn PageParser>) -> Self {
        Self { config, parser }
    }
}

impl WebCrawler for SequentialWebCrawler {
    fn crawl(&self, start_pages: &[String]) -> CrawlResult {
        let crawl = Crawl::new(&self.config, self.parser.as_ref());
        crawl.run(start_pages, |crawl, frontier| {
            frontier.iter().flat_map(|url| crawl.visit(url)).collect()
        })
    }

    fn max_parallelism(&self) -> usize {
        1
    }
}

/// Crawls each level of pages on a dedicated thread pool.
pub struct ParallelWebCrawler {
    config: Arc<CrawlerConfiguration>,
    parser: Arc<dyn PageParser>,
    pool: rayon::ThreadPool,
}

impl ParallelWebCrawler {
    /// Configuration name.
    pub const NAME: &'static str = "ParallelWebCrawler";

    /// Create a crawler with `config.parallelism` worker threads.
    ///
    /// # Errors
    ///
    /// Fails if the worker pool cannot be started.
    pub fn new(
        config: Arc<CrawlerConfiguration>,
        parser: Arc<dyn PageParser>,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallelism)
            .thread_name(|i| format!("crawler-{i}"))
            .build()?;
        Ok(Self {
            config,
            parser,
            pool,
        })
    }
}

impl WebCrawler for ParallelWebCrawler {
    fn crawl(&self, start_pages: &[String]) -> CrawlResult {
        let crawl = Crawl::new(&self.config, self.parser.as_ref());
        crawl.run(start_pages, |crawl, frontier| {
            self.pool.install(|| {
                frontier
                    .par_iter()
                    .flat_map_iter(|url| crawl.visit(url))
                    .collect::<Vec<_>>()
            })
        })
    }

    fn max_parallelism(&self) -> usize {
        self.pool.current_num_threads()
    }
}
