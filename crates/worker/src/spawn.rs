use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

/// Background runtime for callers that are not inside one, e.g. a host UI
/// thread driving the session through `tick`.
fn background_runtime() -> &'static Runtime {
	static RUNTIME: OnceLock<Runtime> = OnceLock::new();
	RUNTIME.get_or_init(|| {
		Builder::new_multi_thread()
			.worker_threads(1)
			.thread_name("marginalia-worker")
			.enable_all()
			.build()
			.expect("marginalia-worker: background runtime must build")
	})
}

/// Spawns a fetch, mutation or lookup task.
///
/// Runs on the ambient runtime when there is one, so tests on a
/// current-thread runtime stay deterministic.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	match Handle::try_current() {
		Ok(handle) => handle.spawn(fut),
		Err(_) => background_runtime().spawn(fut),
	}
}
