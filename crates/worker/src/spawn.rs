use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("spellmark-worker")
			.build()
			.expect("failed to build spellmark-worker global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns an async task tagged with a task class.
///
/// Uses the ambient tokio runtime when called from inside one, otherwise a
/// lazily built shared runtime.
pub fn spawn<F>(class: TaskClass, fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().spawn(fut)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_spawn_on_ambient_runtime() {
		let handle = spawn(TaskClass::Interactive, async { 21 * 2 });
		assert_eq!(handle.await.unwrap(), 42);
	}

	#[test]
	fn test_spawn_without_runtime_uses_global() {
		let handle = spawn(TaskClass::Background, async { "done" });
		let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
		assert_eq!(rt.block_on(handle).unwrap(), "done");
	}
}
