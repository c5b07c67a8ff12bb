//! Conditional tracing macros (zero-cost when the feature is disabled).
//!
//! With the `tracing` feature enabled these forward to `tracing` spans and
//! events; without it they compile down to nothing, so instrumented code
//! needs no conditional compilation at call sites.

/// Opens an info-level span around a major operation.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::DisabledSpan
    };
}

/// Emits an info-level event carrying key measurements.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        // Values are evaluated and discarded to keep call sites warning-free.
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Stand-in span guard used when tracing is disabled, so
/// `let _guard = trace_span!(...).entered();` works unconditionally.
#[cfg(not(feature = "tracing"))]
pub struct DisabledSpan;

#[cfg(not(feature = "tracing"))]
impl DisabledSpan {
    /// Returns self, mirroring `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}
