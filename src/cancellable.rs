///Capability a long-running operation exposes to be cancellable.
///
///Conformance is by implementing the trait, not by inheriting from any request
///base type: a concrete request handle implements it directly, or a small
///wrapper holds the request and forwards the two operations.
///
///Cancellation is cooperative and best-effort: [`cancel`](Cancellable::cancel)
///only asks the operation to stop and never fails. Cancelling an operation
///that already finished means there was nothing left to cancel, and is not an
///error.
pub trait Cancellable {
    ///Request early termination of the operation.
    ///
    ///Returns immediately, without waiting for the operation to acknowledge.
    ///Safe to call repeatedly.
    fn cancel(&self);

    ///Check if cancellation has already been requested
    fn is_cancelled(&self) -> bool;
}

#[cfg(feature = "cancellation-token")]
impl Cancellable for tokio_util::sync::CancellationToken {
    fn cancel(&self) {
        tokio_util::sync::CancellationToken::cancel(self)
    }

    fn is_cancelled(&self) -> bool {
        tokio_util::sync::CancellationToken::is_cancelled(self)
    }
}
