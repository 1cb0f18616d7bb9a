use crate::{
    response::{Completion, DownloadCompletion},
    Cancellable,
};

///One-shot callback a data transport invokes when its request finishes
pub type CompletionCallback = Box<dyn FnOnce(Completion) + Send + 'static>;

///One-shot callback a download transport invokes when its request finishes
pub type DownloadCallback = Box<dyn FnOnce(DownloadCompletion) + Send + 'static>;

///A cancellable in-flight request that buffers its response body in memory.
///
///This is the boundary the adapter functions consume; the transport behind it
///owns connection handling, retries and TLS. Implementations must invoke the
///registered callback exactly once in all non-cancelled cases, from whichever
///worker context finishes the transfer.
pub trait DataRequest: Cancellable {
    ///Register the single completion callback, starting the request if it has
    ///not already started.
    ///
    ///Registering more than one callback on the same request is not
    ///guaranteed safe: the completion contract is single-delivery, and the
    ///adapter functions do not re-validate it.
    fn on_completion(&self, callback: CompletionCallback);
}

///A cancellable in-flight request that streams its response payload to disk
pub trait DownloadRequest: Cancellable {
    ///Register the single completion callback, starting the download if it
    ///has not already started
    fn on_completion(&self, callback: DownloadCallback);
}
