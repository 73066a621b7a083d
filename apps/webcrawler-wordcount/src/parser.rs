//! Page parsers.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use webcrawler_profiler::profiled_trait;

/// Words and outgoing links found on one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContent {
    /// Lower-cased words in document order.
    pub words: Vec<String>,
    /// Resolved link targets.
    pub links: Vec<String>,
}

profiled_trait! {
    /// Extracts words and links from a page.
    pub trait PageParser: Send + Sync {
        /// Read and parse the page at `url`.
        #[profiled]
        fn parse(&self, url: &str) -> io::Result<PageContent>;

        /// Name used to select this parser in configuration.
        fn name(&self) -> &'static str;
    }
}

/// Pick a parser by configured name. `None` selects [`HtmlParser`].
pub fn from_name(name: Option<&str>) -> anyhow::Result<Box<dyn PageParser>> {
    match name {
        None | Some(HtmlParser::NAME) => Ok(Box::new(HtmlParser::new()?)),
        Some(PlainTextParser::NAME) => Ok(Box::new(PlainTextParser)),
        Some(other) => anyhow::bail!("Unknown page parser implementation: {other}"),
    }
}

/// Filesystem path a page URL refers to.
fn page_path(url: &str) -> &Path {
    Path::new(url.strip_prefix("file://").unwrap_or(url))
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Parses HTML: strips tags and follows `href` links relative to the page.
#[derive(Debug, Clone)]
pub struct HtmlParser {
    tag: Regex,
    href: Regex,
}

impl HtmlParser {
    /// Configuration name.
    pub const NAME: &'static str = "HtmlParser";

    /// Create a parser.
    ///
    /// # Errors
    ///
    /// Fails if a built-in pattern does not compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tag: Regex::new(r"<[^>]*>")?,
            href: Regex::new(r##"href\s*=\s*"([^"#]+)""##)?,
        })
    }

    fn resolve(page: &Path, target: &str) -> String {
        if target.contains("://") || target.starts_with('/') {
            return target.to_string();
        }
        let base = page.parent().map_or_else(PathBuf::new, Path::to_path_buf);
        base.join(target).to_string_lossy().into_owned()
    }
}

impl PageParser for HtmlParser {
    fn parse(&self, url: &str) -> io::Result<PageContent> {
        let path = page_path(url);
        let body = fs::read_to_string(path)?;

        let links = self
            .href
            .captures_iter(&body)
            .map(|caps| Self::resolve(path, &caps[1]))
            .collect();
        let text = self.tag.replace_all(&body, " ");

        Ok(PageContent {
            words: words(&text),
            links,
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}

/// Treats every page as plain text with no links.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextParser;

impl PlainTextParser {
    /// Configuration name.
    pub const NAME: &'static str = "PlainTextParser";
}

impl PageParser for PlainTextParser {
    fn parse(&self, url: &str) -> io::Result<PageContent> {
        let body = fs::read_to_string(page_path(url))?;
        Ok(PageContent {
            words: words(&body),
            links: Vec::new(),
        })
    }

    fn name(&self) -> &'static str {
        Self::NAME
    }
}
