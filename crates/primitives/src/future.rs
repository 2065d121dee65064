use std::future::Future;
use std::pin::Pin;

/// Owned future a host hands over for a deferred answer.
///
/// Must be `Send` so scans can run on any runtime worker.
pub type BoxFutureStatic<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;
