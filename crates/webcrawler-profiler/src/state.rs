//! Aggregation of method timings.

use std::io::Write;
use std::time::Duration;

use hashbrown::HashMap;
use parking_lot::Mutex;

/// Key identifying one profiled method on one concrete delegate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MethodKey {
    owner: &'static str,
    signature: &'static str,
}

/// Accumulated timing for one method on one delegate type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodStats {
    /// Concrete type the method was invoked on.
    pub owner: &'static str,
    /// Method name as declared on the interface.
    pub method: &'static str,
    /// Sum of all recorded durations.
    pub total: Duration,
    /// Number of recorded invocations.
    pub calls: u64,
}

impl MethodStats {
    /// Report line for this entry, without the line terminator.
    #[must_use]
    pub fn report_line(&self) -> String {
        format!(
            "{}#{} took {}",
            self.owner,
            self.method,
            format_duration(self.total)
        )
    }
}

#[derive(Debug, Default)]
struct Table {
    index: HashMap<MethodKey, usize>,
    entries: Vec<MethodStats>,
}

/// Thread-safe table of per-method total durations.
///
/// Entries keep the order in which their key was first recorded, so two
/// states fed the same samples render identical reports.
#[derive(Debug, Default)]
pub struct ProfilingState {
    table: Mutex<Table>,
}

impl ProfilingState {
    /// Create an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `duration` to the total for `owner`'s `method`.
    ///
    /// `signature` identifies the method; `method` is the name shown in the
    /// report.
    pub fn record(
        &self,
        owner: &'static str,
        method: &'static str,
        signature: &'static str,
        duration: Duration,
    ) {
        let key = MethodKey { owner, signature };
        let mut table = self.table.lock();
        let Table { index, entries } = &mut *table;

        let slot = *index.entry(key).or_insert_with(|| {
            tracing::trace!(owner, method, "new profiled method");
            entries.push(MethodStats {
                owner,
                method,
                total: Duration::ZERO,
                calls: 0,
            });
            entries.len() - 1
        });

        let stats = &mut entries[slot];
        stats.total = stats.total.saturating_add(duration);
        stats.calls += 1;
    }

    /// Copy of every entry in first-recorded order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MethodStats> {
        self.table.lock().entries.clone()
    }

    /// Number of distinct methods recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    /// Check if nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render every entry, one line each.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for stats in self.snapshot() {
            out.push_str(&stats.report_line());
            out.push('\n');
        }
        out
    }

    /// Write the rendered entries to `sink`.
    ///
    /// The table is copied before any I/O happens, so writers are never
    /// blocked on a slow sink.
    pub fn write<W: Write + ?Sized>(&self, sink: &mut W) -> std::io::Result<()> {
        sink.write_all(self.render().as_bytes())
    }
}

/// Format a duration as whole minutes, seconds part and milliseconds part.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{}m {}s {}ms",
        secs / 60,
        secs % 60,
        duration.subsec_millis()
    )
}
