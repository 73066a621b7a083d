//! Crawl results and their JSON output.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Serialize, Serializer};

/// Outcome of one crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlResult {
    /// Most frequent words, most popular first.
    #[serde(serialize_with = "ordered_map")]
    pub word_counts: Vec<(String, usize)>,
    /// Number of distinct pages visited.
    pub urls_visited: usize,
}

fn ordered_map<S: Serializer>(
    entries: &[(String, usize)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(entries.iter().map(|(w, n)| (w, n)))
}

/// The `limit` most frequent words.
///
/// Ties are broken by longer word first, then alphabetically.
#[must_use]
pub fn popular_words(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|(a_word, a_count), (b_word, b_count)| {
        b_count
            .cmp(a_count)
            .then_with(|| b_word.len().cmp(&a_word.len()))
            .then_with(|| a_word.cmp(b_word))
    });
    sorted.truncate(limit);
    sorted
}

impl CrawlResult {
    /// Write as pretty JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the write fails.
    pub fn write<W: Write + ?Sized>(&self, writer: &mut W) -> anyhow::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Append to the file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, written or flushed.
    pub fn write_to_path(&self, path: &Path) -> anyhow::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
