use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use std::sync::{Arc, Weak};

use pin_project_lite::pin_project;

use crate::{Cancellable, Error, Promise, Seal};

pin_project! {
    ///A [`Promise`] that can cancel the operation it is waiting on.
    ///
    ///Composes the settlement future with a handle to the underlying
    ///cancellable operation. Downstream consumers await it like any other
    ///promise; additionally [`cancel`](CancellablePromise::cancel) asks the
    ///operation to stop and, if the promise is still pending, rejects it with
    ///[`Error::Cancelled`] so a user-initiated cancellation stays
    ///distinguishable from ordinary failure.
    ///
    ///The operation is held weakly: the promise never keeps it alive past its
    ///natural lifetime just to support a later cancellation request.
    #[derive(Debug)]
    #[must_use = "futures do nothing unless polled"]
    pub struct CancellablePromise<T> {
        #[pin]
        promise: Promise<T>,
        seal: Seal<T>,
        handle: Weak<dyn Cancellable + Send + Sync>,
    }
}

impl<T> CancellablePromise<T> {
    ///Associate a pending promise and its seal with a cancellable operation.
    ///
    ///The caller must guarantee the operation's completion callback settles
    ///the seal exactly once in all non-cancelled cases.
    pub fn new<C>(operation: &Arc<C>, promise: Promise<T>, seal: Seal<T>) -> Self
    where
        C: Cancellable + Send + Sync + 'static,
    {
        let handle = Arc::downgrade(operation) as Weak<dyn Cancellable + Send + Sync>;

        Self { promise, seal, handle }
    }

    ///Request cancellation of the underlying operation.
    ///
    ///Forwards the cancel trigger to the operation (if it is still alive) and
    ///then rejects the promise with [`Error::Cancelled`] if no completion won
    ///the race first. Returns immediately, without waiting for the operation
    ///to acknowledge; safe to call repeatedly and after settlement, where it
    ///is a no-op.
    pub fn cancel(&self) {
        if let Some(operation) = self.handle.upgrade() {
            operation.cancel();
        }

        self.seal.reject(Error::Cancelled);
    }

    ///Check if the underlying operation reports cancellation.
    ///
    ///This reflects the operation's state, not the promise's settlement: the
    ///two can transiently disagree, and once the operation is gone this reads
    ///`false` regardless of how the promise settled.
    pub fn is_cancelled(&self) -> bool {
        self.handle.upgrade().map_or(false, |operation| operation.is_cancelled())
    }
}

impl<T> Future for CancellablePromise<T> {
    type Output = Result<T, Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.project().promise.poll(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeOperation {
        cancelled: AtomicBool,
    }

    impl Cancellable for FakeOperation {
        fn cancel(&self) {
            self.cancelled.store(true, Ordering::SeqCst);
        }

        fn is_cancelled(&self) -> bool {
            self.cancelled.load(Ordering::SeqCst)
        }
    }

    fn cancellable_pending<T>(
        operation: &Arc<FakeOperation>,
    ) -> (CancellablePromise<T>, Seal<T>) {
        let (promise, seal) = Promise::pending();
        let completion = seal.clone();

        (CancellablePromise::new(operation, promise, seal), completion)
    }

    #[tokio::test]
    async fn cancel_rejects_pending_promise() {
        let operation = Arc::new(FakeOperation::default());
        let (promise, _completion) = cancellable_pending::<u32>(&operation);

        promise.cancel();

        assert!(operation.is_cancelled());
        assert!(promise.is_cancelled());
        assert!(promise.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn cancel_after_completion_leaves_settlement_unchanged() {
        let operation = Arc::new(FakeOperation::default());
        let (promise, completion) = cancellable_pending(&operation);

        completion.fulfill(7);
        promise.cancel();

        assert_eq!(promise.await.unwrap(), 7);
    }

    #[tokio::test]
    async fn cancel_is_idempotent() {
        let operation = Arc::new(FakeOperation::default());
        let (promise, _completion) = cancellable_pending::<u32>(&operation);

        promise.cancel();
        promise.cancel();
        promise.cancel();

        assert!(promise.await.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn completion_racing_cancel_settles_exactly_once() {
        for _ in 0..64 {
            let operation = Arc::new(FakeOperation::default());
            let (promise, completion) = cancellable_pending(&operation);

            let canceller = {
                let cancel_seal = completion.clone();
                std::thread::spawn(move || {
                    //same rejection path cancel() takes, raced with completion
                    cancel_seal.reject(Error::Cancelled);
                })
            };
            let completer = std::thread::spawn(move || {
                completion.fulfill(1);
            });

            canceller.join().unwrap();
            completer.join().unwrap();

            //either outcome is fine, as long as there is exactly one
            match promise.await {
                Ok(value) => assert_eq!(value, 1),
                Err(error) => assert!(error.is_cancelled()),
            }
        }
    }

    #[tokio::test]
    async fn dropped_operation_cancel_still_settles() {
        let operation = Arc::new(FakeOperation::default());
        let (promise, _completion) = cancellable_pending::<u32>(&operation);

        drop(operation);

        assert!(!promise.is_cancelled());
        promise.cancel();
        assert!(promise.await.unwrap_err().is_cancelled());
    }
}
