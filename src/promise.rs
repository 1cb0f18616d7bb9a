use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use std::sync::{Arc, Mutex, PoisonError};

use futures::channel::oneshot;
use pin_project_lite::pin_project;

use crate::Error;

type Settlement<T> = Result<T, Error>;

pin_project! {
    ///Single-settlement future produced by the adapter functions.
    ///
    ///A `Promise` is the consumer half of a settlement pair: it stays pending
    ///until the matching [`Seal`] is settled, then resolves exactly once with
    ///the settled value. Continuations are whatever the consumer chains onto
    ///the future; they run on the consumer's executor, never inline in the
    ///context that settled the seal.
    ///
    ///Created with [`Promise::pending`] or [`Promise::new`]
    #[derive(Debug)]
    #[must_use = "futures do nothing unless polled"]
    pub struct Promise<T> {
        #[pin]
        rx: oneshot::Receiver<Settlement<T>>,
    }
}

///Producer half of a settlement pair, shared with anyone who may settle it.
///
///A `Seal` can be cloned freely and settled from any thread; the first caller
///to settle wins and every later attempt is a silent no-op. This is what keeps
///a completion callback and a cancellation request racing on different threads
///from ever producing a second observable settlement.
#[derive(Debug)]
pub struct Seal<T> {
    tx: Arc<Mutex<Option<oneshot::Sender<Settlement<T>>>>>,
}

impl<T> Promise<T> {
    ///Create a pending promise together with the seal that settles it
    pub fn pending() -> (Self, Seal<T>) {
        let (tx, rx) = oneshot::channel();

        (Self { rx }, Seal { tx: Arc::new(Mutex::new(Some(tx))) })
    }

    ///Create a promise from a resolver.
    ///
    ///The resolver is invoked synchronously, before `new` returns, with the
    ///[`Seal`] as its fulfill/reject capability. It is expected to arrange for
    ///exactly one settlement, typically by handing the seal to a one-shot
    ///completion callback.
    ///
    /// # Examples
    /// ```
    /// # use yakusoku::Promise;
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let promise = Promise::new(|seal| {
    ///     std::thread::spawn(move || {
    ///         seal.fulfill(2u32);
    ///     });
    /// });
    ///
    /// assert_eq!(promise.await.unwrap(), 2);
    /// # }
    /// ```
    pub fn new(resolver: impl FnOnce(Seal<T>)) -> Self {
        let (promise, seal) = Self::pending();

        resolver(seal);

        promise
    }
}

impl<T> Future for Promise<T> {
    type Output = Settlement<T>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        match this.rx.poll(cx) {
            Poll::Ready(Ok(settlement)) => Poll::Ready(settlement),
            //every seal was dropped without settling, so the underlying
            //operation broke its fire-exactly-once contract
            Poll::Ready(Err(oneshot::Canceled)) => {
                Poll::Ready(Err(Error::MalformedCompletion("completion callback invocation")))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Seal<T> {
    ///Settle the promise with `settlement`.
    ///
    ///Returns `true` if this call performed the settlement, `false` if the
    ///promise was already settled by an earlier call.
    pub fn settle(&self, settlement: Settlement<T>) -> bool {
        let tx = self.tx.lock().unwrap_or_else(PoisonError::into_inner).take();

        match tx {
            //the receiver may be gone already, the settlement is still spent
            Some(tx) => {
                let _ = tx.send(settlement);
                true
            }
            None => false,
        }
    }

    ///Fulfill the promise with `value`, if it is still pending
    pub fn fulfill(&self, value: T) -> bool {
        self.settle(Ok(value))
    }

    ///Reject the promise with `error`, if it is still pending
    pub fn reject(&self, error: Error) -> bool {
        self.settle(Err(error))
    }

    ///Check if the promise has already been settled
    pub fn is_settled(&self) -> bool {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }
}

//not derived to avoid the spurious `T: Clone` bound
impl<T> Clone for Seal<T> {
    fn clone(&self) -> Self {
        Self { tx: Arc::clone(&self.tx) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_settlement_wins() {
        let (promise, seal) = Promise::pending();
        let other = seal.clone();

        assert!(seal.fulfill(1));
        assert!(!other.fulfill(2));
        assert!(!seal.reject(Error::Cancelled));
        assert!(seal.is_settled());

        assert_eq!(promise.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn racing_settles_settle_exactly_once() {
        let (promise, seal) = Promise::pending();

        let threads: Vec<_> = (0..8)
            .map(|i| {
                let seal = seal.clone();
                std::thread::spawn(move || seal.fulfill(i))
            })
            .collect();

        let wins: usize =
            threads.into_iter().map(|t| t.join().unwrap() as usize).sum();
        assert_eq!(wins, 1);

        let value = promise.await.unwrap();
        assert!(value < 8);
    }

    #[tokio::test]
    async fn resolver_runs_synchronously() {
        let mut ran = false;
        let promise = Promise::new(|seal| {
            ran = true;
            seal.fulfill("done");
        });

        assert!(ran);
        assert_eq!(promise.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn dropped_seal_rejects_as_malformed() {
        let (promise, seal) = Promise::<()>::pending();
        drop(seal);

        match promise.await.unwrap_err() {
            Error::MalformedCompletion(_) => {}
            other => panic!("expected malformed completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rejection_is_observed() {
        let (promise, seal) = Promise::<()>::pending();
        seal.reject(Error::Cancelled);

        assert!(promise.await.unwrap_err().is_cancelled());
    }
}
