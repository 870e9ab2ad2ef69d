use std::fmt::Debug;

/// Sink for warnings produced while rewriting templates.
///
/// The transformer holds one of these behind an `Arc`, so implementations
/// must be shareable across threads.
pub trait ImportLogger: Debug + Send + Sync {
	fn warn(&self, message: &str);
}

/// Default logger. Forwards every warning to `tracing` at `WARN` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ImportLogger for TracingLogger {
	fn warn(&self, message: &str) {
		tracing::warn!("{message}");
	}
}
