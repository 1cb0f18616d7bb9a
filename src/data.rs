//!Adapter functions over [`DataRequest`] transports.
//!
//!Each adapter registers the transport's single completion callback (starting
//!the request if needed) and returns a promise immediately. When the callback
//!later fires, from whatever worker context the transport uses, the payload is
//!normalized and the promise settled right there; continuations run on the
//!executor driving the consumer's task, which is where context selection
//!happens in this ecosystem.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{
    error::BoxError,
    request::DataRequest,
    response::{RequestHead, ResponseHead, ResponseSnapshot},
    CancellablePromise, Promise,
};

/// An extension trait for [`DataRequest`] that provides the promise-returning
/// adapter functions, one per response shape.
///
/// Users are not expected to implement this trait. All types that implement
/// `DataRequest` already implement `DataRequestExt`.
pub trait DataRequestExt: DataRequest {
    ///Promise of the raw `(request, response, body)` triple once the request
    ///has finished
    fn response(&self) -> Promise<(RequestHead, ResponseHead, Bytes)> {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_parts());
            }))
        })
    }

    ///Promise of the body bytes and a response snapshot once the request has
    ///finished
    fn response_data(&self) -> Promise<(Bytes, ResponseSnapshot)> {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_data());
            }))
        })
    }

    ///Promise of the body decoded as UTF-8 text and a response snapshot once
    ///the request has finished
    fn response_string(&self) -> Promise<(String, ResponseSnapshot)> {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_string());
            }))
        })
    }

    ///Promise of the body parsed as a JSON document and a response snapshot
    ///once the request has finished
    fn response_json(&self) -> Promise<(serde_json::Value, ResponseSnapshot)> {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_json());
            }))
        })
    }

    ///Promise of an application type deserialized from the JSON body once the
    ///request has finished
    fn response_decodable<T>(&self) -> Promise<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.into_decoded());
            }))
        })
    }

    ///Promise of an application type produced by `decoder` from the body
    ///bytes once the request has finished.
    ///
    ///Fetching and decoding stay separate fallible stages: transport failures
    ///reject as [`Error::Transport`](crate::Error::Transport), decoder
    ///failures as [`Error::Decoding`](crate::Error::Decoding) carrying the
    ///decoder's own error.
    fn response_decoded_with<T, D>(&self, decoder: D) -> Promise<T>
    where
        T: Send + 'static,
        D: FnOnce(Bytes) -> Result<T, BoxError> + Send + 'static,
    {
        Promise::new(|seal| {
            self.on_completion(Box::new(move |completion| {
                seal.settle(completion.decode_with(decoder));
            }))
        })
    }

    ///Like [`response`](DataRequestExt::response), wrapped as a
    ///[`CancellablePromise`] holding this request as its cancellation handle
    fn response_cancellable(
        self: Arc<Self>,
    ) -> CancellablePromise<(RequestHead, ResponseHead, Bytes)>
    where
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_parts());
        }));

        CancellablePromise::new(&self, promise, seal)
    }

    ///Like [`response_data`](DataRequestExt::response_data), wrapped as a
    ///[`CancellablePromise`]
    fn response_data_cancellable(self: Arc<Self>) -> CancellablePromise<(Bytes, ResponseSnapshot)>
    where
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_data());
        }));

        CancellablePromise::new(&self, promise, seal)
    }

    ///Like [`response_string`](DataRequestExt::response_string), wrapped as a
    ///[`CancellablePromise`]
    fn response_string_cancellable(
        self: Arc<Self>,
    ) -> CancellablePromise<(String, ResponseSnapshot)>
    where
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_string());
        }));

        CancellablePromise::new(&self, promise, seal)
    }

    ///Like [`response_json`](DataRequestExt::response_json), wrapped as a
    ///[`CancellablePromise`]
    fn response_json_cancellable(
        self: Arc<Self>,
    ) -> CancellablePromise<(serde_json::Value, ResponseSnapshot)>
    where
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_json());
        }));

        CancellablePromise::new(&self, promise, seal)
    }

    ///Like [`response_decodable`](DataRequestExt::response_decodable),
    ///wrapped as a [`CancellablePromise`]
    fn response_decodable_cancellable<T>(self: Arc<Self>) -> CancellablePromise<T>
    where
        T: DeserializeOwned + Send + 'static,
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.into_decoded());
        }));

        CancellablePromise::new(&self, promise, seal)
    }

    ///Like [`response_decoded_with`](DataRequestExt::response_decoded_with),
    ///wrapped as a [`CancellablePromise`]
    fn response_decoded_with_cancellable<T, D>(self: Arc<Self>, decoder: D) -> CancellablePromise<T>
    where
        T: Send + 'static,
        D: FnOnce(Bytes) -> Result<T, BoxError> + Send + 'static,
        Self: Send + Sync + Sized + 'static,
    {
        let (promise, seal) = Promise::pending();

        let completion_seal = seal.clone();
        self.on_completion(Box::new(move |completion| {
            completion_seal.settle(completion.decode_with(decoder));
        }));

        CancellablePromise::new(&self, promise, seal)
    }
}

impl<T: ?Sized> DataRequestExt for T where T: DataRequest {}
