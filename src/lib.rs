//!Cancellable promise bridge for callback-based HTTP clients.
//!
//!Transports that report completion through a one-shot callback are adapted
//!into futures that settle exactly once. A request conforming to the
//![`Cancellable`] capability can additionally be wrapped as a
//![`CancellablePromise`], which lets the consumer cancel the in-flight
//!operation through the promise itself and observe that cancellation as a
//!distinct [`Error::Cancelled`] outcome, never confused with an ordinary
//!failure.
//!
//!The adapter functions come in one flavor per response shape: the raw
//!`(request, response, body)` triple, body bytes, UTF-8 text, a JSON
//!document, or an application type produced by a decoder.
//!
//! # Example
//! ```rust
//! use std::sync::{
//!     atomic::{AtomicBool, Ordering},
//!     Arc, Mutex,
//! };
//!
//! use bytes::Bytes;
//! use http::{HeaderMap, Method, StatusCode, Uri};
//! use yakusoku::{
//!     Cancellable, Completion, CompletionCallback, DataRequest, DataRequestExt, RequestHead,
//!     ResponseHead,
//! };
//!
//! //minimal transport: holds the callback until the response is delivered
//! #[derive(Default)]
//! struct StubRequest {
//!     callback: Mutex<Option<CompletionCallback>>,
//!     cancelled: AtomicBool,
//! }
//!
//! impl Cancellable for StubRequest {
//!     fn cancel(&self) {
//!         self.cancelled.store(true, Ordering::SeqCst);
//!     }
//!
//!     fn is_cancelled(&self) -> bool {
//!         self.cancelled.load(Ordering::SeqCst)
//!     }
//! }
//!
//! impl DataRequest for StubRequest {
//!     fn on_completion(&self, callback: CompletionCallback) {
//!         *self.callback.lock().unwrap() = Some(callback);
//!     }
//! }
//!
//! impl StubRequest {
//!     fn deliver(&self) {
//!         let callback = self.callback.lock().unwrap().take().unwrap();
//!         callback(Completion::success(
//!             RequestHead {
//!                 method: Method::GET,
//!                 uri: Uri::from_static("http://example.com/"),
//!                 headers: HeaderMap::new(),
//!             },
//!             ResponseHead { status: StatusCode::OK, headers: HeaderMap::new() },
//!             Bytes::from_static(br#"{"key1":"value1"}"#),
//!         ));
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let request = Arc::new(StubRequest::default());
//!
//! //returns immediately; the request settles it when the callback fires
//! let promise = request.clone().response_json_cancellable();
//!
//! request.deliver();
//!
//! let (document, snapshot) = promise.await.unwrap();
//! assert_eq!(document["key1"], "value1");
//! assert_eq!(snapshot.response.unwrap().status, StatusCode::OK);
//! # }
//! ```
//!
//!Calling [`cancel`](CancellablePromise::cancel) before the transport
//!delivers rejects the promise with [`Error::Cancelled`] instead; whichever
//!of the two events reaches the settlement first wins, and the loser is
//!dropped silently.

pub mod cancellable;
pub mod cancellable_promise;
pub mod data;
pub mod download;
pub mod error;
pub mod promise;
pub mod request;
pub mod response;

pub use cancellable::Cancellable;
pub use cancellable_promise::CancellablePromise;
pub use data::DataRequestExt;
pub use download::DownloadRequestExt;
pub use error::{BoxError, Error};
pub use promise::{Promise, Seal};
pub use request::{CompletionCallback, DataRequest, DownloadCallback, DownloadRequest};
pub use response::{
    Completion, DownloadCompletion, DownloadSnapshot, RequestHead, ResponseHead, ResponseSnapshot,
    TransferMetrics,
};
