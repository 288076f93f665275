//! The shared evaluation context
//!
//! One [`EvalContext`] is built per configuration and shared read-only by
//! any number of concurrent template invocations; per-invocation state
//! lives in [`crate::environment::Environment`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::arith::{ArithmeticEngine, DefaultArithmeticEngine};
use crate::output::{OutputFormat, PlainTextFormat};
use crate::settings::RuntimeSettings;

/// The engine version string reported by the `.version` special variable.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration bundle for template evaluation.
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Default runtime settings; each invocation gets its own mutable copy
    pub settings: RuntimeSettings,

    /// Arithmetic policy for every numeric operation
    pub arithmetic: Arc<dyn ArithmeticEngine>,

    /// The output format interpolations escape into
    pub output_format: Arc<dyn OutputFormat>,

    /// Whether interpolated plain text is escaped through the output format
    pub auto_escaping: bool,

    /// Cooperative cancellation flag. Set it from any thread; the
    /// evaluator polls it at loop boundaries and aborts with
    /// [`crate::error::EvalError::Interrupted`]. Never cleared by the
    /// evaluator.
    pub interrupt: Arc<AtomicBool>,

    /// Macro/function call depth limit
    pub max_call_depth: usize,
}

impl Default for EvalContext {
    fn default() -> Self {
        EvalContext {
            settings: RuntimeSettings::default(),
            arithmetic: Arc::new(DefaultArithmeticEngine),
            output_format: Arc::new(PlainTextFormat),
            auto_escaping: false,
            interrupt: Arc::new(AtomicBool::new(false)),
            max_call_depth: 100,
        }
    }
}

impl EvalContext {
    /// A context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the arithmetic engine.
    pub fn with_arithmetic(mut self, engine: Arc<dyn ArithmeticEngine>) -> Self {
        self.arithmetic = engine;
        self
    }

    /// Replace the output format. Auto-escaping is enabled iff the format
    /// is a markup format.
    pub fn with_output_format(mut self, format: Arc<dyn OutputFormat>) -> Self {
        self.auto_escaping = format.is_markup();
        self.output_format = format;
        self
    }

    /// Replace the default runtime settings.
    pub fn with_settings(mut self, settings: RuntimeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the call depth limit.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Ask all invocations sharing this context to stop.
    pub fn request_interrupt(&self) {
        self.interrupt.store(true, Ordering::Relaxed);
    }

    /// Whether an interrupt has been requested.
    pub fn interrupt_requested(&self) -> bool {
        self.interrupt.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::HtmlFormat;

    #[test]
    fn test_with_output_format_sets_auto_escaping() {
        let ctx = EvalContext::new().with_output_format(Arc::new(HtmlFormat));
        assert!(ctx.auto_escaping);
        let ctx = EvalContext::new().with_output_format(Arc::new(PlainTextFormat));
        assert!(!ctx.auto_escaping);
    }

    #[test]
    fn test_interrupt_round_trip() {
        let ctx = EvalContext::new();
        assert!(!ctx.interrupt_requested());
        ctx.request_interrupt();
        assert!(ctx.interrupt_requested());
    }
}
