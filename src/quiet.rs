// Scoped suppression of model setup chatter.
//
// ONNX Runtime reports session setup through `tracing`, and downloads log
// through it too. When the user asks for quiet output, those calls run under
// a no-op subscriber that is swapped out again when the scope ends, even on
// error or panic. Nothing global is touched.

use std::future::Future;

use tracing::instrument::WithSubscriber;
use tracing::subscriber::NoSubscriber;

/// Run `f`, silencing tracing output for its duration unless `verbose`.
pub fn scoped<T>(verbose: bool, f: impl FnOnce() -> T) -> T {
    if verbose {
        f()
    } else {
        tracing::subscriber::with_default(NoSubscriber::default(), f)
    }
}

/// Async counterpart of [`scoped`]: the no-op subscriber is attached to the
/// future, so it only applies while that future is being polled.
pub async fn scoped_async<F: Future>(verbose: bool, fut: F) -> F::Output {
    if verbose {
        fut.await
    } else {
        fut.with_subscriber(NoSubscriber::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silenced() -> bool {
        tracing::dispatcher::get_default(|d| d.is::<NoSubscriber>())
    }

    #[test]
    fn test_quiet_scope_swaps_subscriber_and_restores() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            assert!(!silenced());
            let inside = scoped(false, silenced);
            assert!(inside, "quiet scope should install the no-op subscriber");
            assert!(!silenced(), "previous subscriber should be back");
        });
    }

    #[test]
    fn test_verbose_scope_leaves_subscriber_alone() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            assert!(!scoped(true, silenced));
        });
    }

    #[test]
    fn test_quiet_scope_restores_after_error() {
        tracing::subscriber::with_default(tracing_subscriber::registry(), || {
            let result: anyhow::Result<()> = scoped(false, || anyhow::bail!("load failed"));
            assert!(result.is_err());
            assert!(!silenced());
        });
    }
}
