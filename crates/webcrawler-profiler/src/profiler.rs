//! Profiler façade: wrapping delegates and writing reports.

use std::fmt;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::clock::{Clock, SystemClock};
use crate::error::{ProfilerError, Result};
use crate::interceptor::MethodInterceptor;
use crate::interface::Interface;
use crate::state::ProfilingState;

/// Creates profiled wrappers that all report into one shared state.
pub struct Profiler {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
    start_time: DateTime<FixedOffset>,
}

impl Profiler {
    /// Create a profiler driven by `clock`. The run start time is read once,
    /// here.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let start_time = clock.now();
        Self {
            clock,
            state: Arc::new(ProfilingState::new()),
            start_time,
        }
    }

    /// Create a profiler driven by the system clock.
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock::new()))
    }

    /// Wrap `delegate` so calls through interface `I` are profiled.
    ///
    /// The wrapper implements exactly `I`, and only when `D` does.
    ///
    /// # Errors
    ///
    /// [`ProfilerError::InvalidTarget`] if `I` has no `#[profiled]` method.
    pub fn wrap<I, D>(&self, delegate: D) -> Result<Profiled<I, D>>
    where
        I: Interface + ?Sized,
    {
        if !I::has_profiled_methods() {
            return Err(ProfilerError::InvalidTarget { interface: I::NAME });
        }

        tracing::debug!(
            interface = I::NAME,
            delegate = std::any::type_name::<D>(),
            "wrapping delegate"
        );

        Ok(Profiled {
            delegate,
            interceptor: MethodInterceptor::new(Arc::clone(&self.clock), Arc::clone(&self.state)),
            _interface: PhantomData,
        })
    }

    /// Write a report block to an open sink.
    ///
    /// The sink stays owned by the caller and is not flushed.
    ///
    /// # Errors
    ///
    /// [`ProfilerError::Io`] if the sink rejects a write.
    pub fn write_data<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writeln!(writer, "Run at {}", self.start_time.to_rfc2822())?;
        self.state.write(writer)?;
        writeln!(writer)?;
        Ok(())
    }

    /// Append a report block to the file at `path`, creating it if needed.
    ///
    /// # Errors
    ///
    /// [`ProfilerError::ReportWrite`] if the file cannot be opened, written
    /// or flushed. The file handle is released in every case.
    pub fn write_data_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let report_error = |source| ProfilerError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(report_error)?;
        let mut writer = BufWriter::new(file);

        match self.write_data(&mut writer) {
            Ok(()) => {}
            Err(ProfilerError::Io(source)) => return Err(report_error(source)),
            Err(other) => return Err(other),
        }
        writer.flush().map_err(report_error)?;

        tracing::info!(
            path = %path.display(),
            methods = self.state.len(),
            "wrote profile report"
        );
        Ok(())
    }

    /// Start time of this profiling run.
    #[must_use]
    pub const fn start_time(&self) -> DateTime<FixedOffset> {
        self.start_time
    }

    /// Shared timing table.
    #[must_use]
    pub fn state(&self) -> &Arc<ProfilingState> {
        &self.state
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::system()
    }
}

impl fmt::Debug for Profiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiler")
            .field("start_time", &self.start_time)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// A delegate wrapped by [`Profiler::wrap`].
///
/// Implements interface `I` whenever `D` does; the implementation is
/// generated by [`profiled_trait!`](crate::profiled_trait).
pub struct Profiled<I: ?Sized, D> {
    delegate: D,
    interceptor: MethodInterceptor,
    _interface: PhantomData<fn(&I)>,
}

impl<I: ?Sized, D> Profiled<I, D> {
    /// The wrapped delegate.
    #[must_use]
    pub const fn delegate(&self) -> &D {
        &self.delegate
    }

    #[doc(hidden)]
    pub const fn __interceptor(&self) -> &MethodInterceptor {
        &self.interceptor
    }
}

impl<I: ?Sized, D: fmt::Debug> fmt::Debug for Profiled<I, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profiled")
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::clock::FakeClock;
    use crate::interface::MethodSpec;

    struct Nothing;

    impl Interface for Nothing {
        const NAME: &'static str = "Nothing";
        const METHODS: &'static [MethodSpec] = &[];
    }

    /// Accepts `budget` bytes, then rejects every write.
    struct FullSink {
        budget: usize,
    }

    impl Write for FullSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.budget == 0 {
                return Err(std::io::Error::other("sink is full"));
            }
            let accepted = buf.len().min(self.budget);
            self.budget -= accepted;
            Ok(accepted)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn profiler() -> Profiler {
        let start = DateTime::parse_from_rfc3339("2026-10-18T09:30:00+02:00").unwrap();
        Profiler::new(Arc::new(FakeClock::new(start)))
    }

    #[test]
    fn wrap_rejects_interface_without_methods() {
        let err = profiler().wrap::<Nothing, _>(()).unwrap_err();
        assert!(matches!(
            err,
            ProfilerError::InvalidTarget {
                interface: "Nothing"
            }
        ));
    }

    #[test]
    fn empty_report_is_header_and_separator() {
        let mut out = Vec::new();
        profiler().write_data(&mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Run at Sun, 18 Oct 2026 09:30:00 +0200\n\n"
        );
    }

    #[test]
    fn header_timestamp_parses_back() {
        let profiler = profiler();
        let mut out = Vec::new();
        profiler.write_data(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let stamp = text
            .lines()
            .next()
            .unwrap()
            .strip_prefix("Run at ")
            .unwrap();
        assert_eq!(
            DateTime::parse_from_rfc2822(stamp).unwrap(),
            profiler.start_time()
        );
    }

    #[test]
    fn write_to_missing_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("profile.txt");

        let err = profiler().write_data_to_path(&path).unwrap_err();
        match err {
            ProfilerError::ReportWrite { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejected_header_is_an_io_error() {
        let mut sink = FullSink { budget: 0 };

        let err = profiler().write_data(&mut sink).unwrap_err();
        assert!(matches!(err, ProfilerError::Io(_)), "got {err:?}");
    }

    #[test]
    fn sink_filling_up_mid_report_is_an_io_error() {
        let profiler = profiler();
        let signature = "fn fetch(&self)";
        profiler
            .state()
            .record("Fetcher", "fetch", signature, Duration::from_secs(1));
        let header = "Run at Sun, 18 Oct 2026 09:30:00 +0200\n";
        let mut sink = FullSink {
            budget: header.len(),
        };

        let err = profiler.write_data(&mut sink).unwrap_err();
        assert!(matches!(err, ProfilerError::Io(_)), "got {err:?}");
        assert_eq!(sink.budget, 0);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn failed_flush_after_open_is_reported() {
        // Opening /dev/full succeeds, every write to it fails.
        let path = Path::new("/dev/full");
        if !path.exists() {
            return;
        }
        let profiler = profiler();
        profiler
            .state()
            .record("Fetcher", "fetch", "fn fetch(&self)", Duration::ZERO);

        let err = profiler.write_data_to_path(path).unwrap_err();
        match err {
            ProfilerError::ReportWrite { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
