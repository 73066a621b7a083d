//! Call interception and timing.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::clock::Clock;
use crate::interface::MethodSpec;
use crate::state::ProfilingState;

/// Routes calls on a wrapped instance to its delegate, timing marked methods.
#[derive(Clone)]
pub struct MethodInterceptor {
    clock: Arc<dyn Clock>,
    state: Arc<ProfilingState>,
}

impl MethodInterceptor {
    /// Create an interceptor recording into `state` using `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, state: Arc<ProfilingState>) -> Self {
        Self { clock, state }
    }

    /// Run `call` on behalf of `owner`, timing it if `method` is marked.
    ///
    /// Whatever `call` returns is handed back untouched, `Err` values
    /// included. A panic in `call` keeps unwinding after the attempt has been
    /// recorded.
    #[inline]
    pub fn invoke<R>(
        &self,
        owner: &'static str,
        method: &'static MethodSpec,
        call: impl FnOnce() -> R,
    ) -> R {
        if !method.profiled {
            return call();
        }

        let _guard = TimingGuard::start(self, owner, method);
        call()
    }

    /// State this interceptor records into.
    #[must_use]
    pub fn state(&self) -> &Arc<ProfilingState> {
        &self.state
    }
}

/// RAII guard that records the elapsed time of one call on drop.
struct TimingGuard<'a> {
    interceptor: &'a MethodInterceptor,
    owner: &'static str,
    method: &'static MethodSpec,
    start: DateTime<FixedOffset>,
}

impl<'a> TimingGuard<'a> {
    #[inline]
    fn start(
        interceptor: &'a MethodInterceptor,
        owner: &'static str,
        method: &'static MethodSpec,
    ) -> Self {
        Self {
            interceptor,
            owner,
            method,
            start: interceptor.clock.now(),
        }
    }
}

impl Drop for TimingGuard<'_> {
    fn drop(&mut self) {
        let end = self.interceptor.clock.now();
        let Ok(elapsed) = (end - self.start).to_std() else {
            // Panicking again while unwinding would abort the process.
            if std::thread::panicking() {
                tracing::error!(
                    owner = self.owner,
                    method = self.method.name,
                    "clock ran backwards during a failed call, sample dropped"
                );
                return;
            }
            let (owner, method, start) = (self.owner, self.method.name, self.start);
            panic!("clock ran backwards while timing {owner}#{method}: {start} -> {end}");
        };

        self.interceptor.state.record(
            self.owner,
            self.method.name,
            self.method.signature,
            elapsed,
        );
    }
}
