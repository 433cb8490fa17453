//! Tying a resource's release to the completion of a scoped body.
//!
//! A body either finishes on the spot or hands back work that is still in
//! flight. [`Completion`] covers both shapes and releases the scoped resource
//! exactly once, after the body is done, whether it succeeded or failed.

use std::future::{self, Future};

use tokio::runtime::Handle;

/// A resource held for the lifetime of a scoped body.
///
/// `release` must be idempotent. Implementors also release on drop, which
/// covers panics and cancelled futures.
pub trait Release {
    /// Error produced when releasing fails.
    type Error;

    /// Releases the resource. Calls after the first are no-ops.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource could not be released.
    fn release(&mut self) -> Result<(), Self::Error>;
}

/// Most scheduler rounds a single [`settle`] waits through.
pub const SETTLE_ROUNDS: usize = 16;

/// Drains the continuations queued on the current scheduler.
///
/// Each round yields once, so every task already runnable is polled before
/// the caller resumes, and whatever those tasks requeue (a spawned task that
/// yields and then writes, say) runs in the following round. Rounds go on
/// while the runtime still has spawned tasks alive, up to [`SETTLE_ROUNDS`].
/// Work parked on timers or I/O readiness does not become runnable during the
/// drain and is not waited for.
pub async fn settle() {
    let mut rounds = 0;
    while rounds < SETTLE_ROUNDS && (rounds == 0 || has_live_tasks()) {
        tokio::task::yield_now().await;
        rounds += 1;
    }
    tracing::trace!(rounds, "settled");
}

fn has_live_tasks() -> bool {
    Handle::try_current().is_ok_and(|handle| handle.metrics().num_alive_tasks() > 0)
}

/// What a scoped body handed back.
pub enum Completion<F: Future> {
    /// The body returned a plain value.
    Ready(F::Output),
    /// The body returned work that is still in flight.
    Pending(F),
}

impl<T> Completion<future::Ready<T>> {
    /// Wraps a value returned synchronously by a body.
    pub const fn ready(value: T) -> Self {
        Self::Ready(value)
    }
}

impl<F: Future> Completion<F> {
    /// Wraps a future returned by a body.
    pub const fn pending(future: F) -> Self {
        Self::Pending(future)
    }

    /// Drives the body to its end, then releases `resource`.
    ///
    /// A ready value is held for one [`settle`] first, so work the body
    /// queued on its way out still sees the resource. A pending future keeps
    /// the resource until it resolves. The body's output is returned
    /// untouched next to the outcome of the release.
    pub async fn finish<R: Release>(self, resource: &mut R) -> (F::Output, Result<(), R::Error>) {
        let output = match self {
            Self::Ready(value) => {
                settle().await;
                value
            }
            Self::Pending(future) => future.await,
        };
        let released = resource.release();
        (output, released)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[derive(Default)]
    struct Counter {
        releases: u32,
    }

    impl Release for Counter {
        type Error = ();

        fn release(&mut self) -> Result<(), ()> {
            self.releases += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn ready_value_waits_for_queued_tasks() {
        let ran = Rc::new(Cell::new(false));
        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let flag = Rc::clone(&ran);
                tokio::task::spawn_local(async move { flag.set(true) });

                let mut counter = Counter::default();
                let (value, released) = Completion::ready(7).finish(&mut counter).await;

                assert_eq!(value, 7);
                assert!(released.is_ok());
                assert!(ran.get(), "spawned task should run before release");
                assert_eq!(counter.releases, 1);
            })
            .await;
    }

    #[tokio::test]
    async fn ready_value_waits_for_requeued_continuations() {
        let steps = Arc::new(AtomicUsize::new(0));
        let worker = Arc::clone(&steps);
        tokio::spawn(async move {
            for _ in 0..3 {
                tokio::task::yield_now().await;
                worker.fetch_add(1, Ordering::SeqCst);
            }
        });

        let mut counter = Counter::default();
        let ((), released) = Completion::ready(()).finish(&mut counter).await;

        assert!(released.is_ok());
        assert_eq!(steps.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn settle_is_bounded_when_tasks_never_finish() {
        let handle = tokio::spawn(std::future::pending::<()>());

        settle().await;

        assert!(!handle.is_finished());
        handle.abort();
    }

    #[tokio::test]
    async fn pending_future_releases_after_resolution_even_on_error() {
        let mut counter = Counter::default();
        let (value, _) = Completion::pending(async {
            tokio::task::yield_now().await;
            Err::<(), _>("boom")
        })
        .finish(&mut counter)
        .await;

        assert_eq!(value, Err("boom"));
        assert_eq!(counter.releases, 1);
    }
}
