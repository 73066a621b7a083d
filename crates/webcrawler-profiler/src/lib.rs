//! Method-call profiling for capability traits.
//!
//! A capability trait is declared with [`profiled_trait!`], marking the
//! methods worth timing with `#[profiled]`. A [`Profiler`] then wraps any
//! implementor in a decorator that implements the same trait, forwards every
//! call unchanged, and adds the duration of marked calls to a shared
//! [`ProfilingState`].
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use chrono::DateTime;
//! use webcrawler_profiler::{profiled_trait, FakeClock, Profiler};
//!
//! profiled_trait! {
//!     pub trait Greeter: Send + Sync {
//!         #[profiled]
//!         fn greet(&self, name: &str) -> String;
//!     }
//! }
//!
//! struct English(Arc<FakeClock>);
//!
//! impl Greeter for English {
//!     fn greet(&self, name: &str) -> String {
//!         self.0.advance(Duration::from_secs(2));
//!         format!("Hello, {name}")
//!     }
//! }
//!
//! let clock = Arc::new(FakeClock::new(
//!     DateTime::parse_from_rfc3339("2026-10-18T09:30:00+00:00").unwrap(),
//! ));
//! let profiler = Profiler::new(clock.clone());
//! let greeter = profiler.wrap::<dyn Greeter, _>(English(clock)).unwrap();
//!
//! assert_eq!(greeter.greet("Ann"), "Hello, Ann");
//!
//! let mut report = Vec::new();
//! profiler.write_data(&mut report).unwrap();
//! let report = String::from_utf8(report).unwrap();
//! assert!(report.contains("English#greet took 0m 2s 0ms"));
//! ```
//!
//! Reports are appended, so repeated runs accumulate in one file:
//!
//! ```ignore
//! profiler.write_data_to_path("profile.txt")?;
//! ```

mod clock;
mod error;
mod interceptor;
mod interface;
mod macros;
mod profiler;
mod state;

// Re-export public API
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ProfilerError, Result};
pub use interceptor::MethodInterceptor;
pub use interface::{Interface, MethodSpec};
pub use profiler::{Profiled, Profiler};
pub use state::{format_duration, MethodStats, ProfilingState};
