//!Adapter functions over [`DownloadRequest`] transports.
//!
//!Same contract as the data adapters: register the single completion
//!callback, return the promise immediately, normalize and settle when the
//!callback fires.

use std::sync::Arc;

use crate::{request::DownloadRequest, response::DownloadSnapshot, CancellablePromise, Promise};

/// An extension trait for [`DownloadRequest`] that provides the
/// promise-returning adapter functions.
///
/// Users are not expected to implement this trait. All types that implement
/// `DownloadRequest` already implement `DownloadRequestExt`.
pub trait DownloadRequestExt: DownloadRequest {
    ///Promise of the download snapshot once the download has finished
    fn response(&self) -> Promise<DownloadSnapshot> {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_snapshot());
            }))
        })
    }

    ///Like [`response`](DownloadRequestExt::response), wrapped as a
    ///[`CancellablePromise`] holding this download as its cancellation handle
    fn response_cancellable(self: Arc<Self>) -> CancellablePromise<DownloadSnapshot>
    where
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_snapshot());
        }));

        CancellablePromise::new(&self, promise, seal)
    }
}

impl<T: ?Sized> DownloadRequestExt for T where T: DownloadRequest {}
