use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use yakusoku::{
    Cancellable, Completion, CompletionCallback, DataRequest, DataRequestExt, RequestHead,
    ResponseHead,
};

//fake transport that finishes on a worker thread after a delay
#[derive(Default)]
struct SlowRequest {
    cancelled: Arc<AtomicBool>,
}

impl Cancellable for SlowRequest {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl DataRequest for SlowRequest {
    //registration starts the transfer
    fn on_completion(&self, callback: CompletionCallback) {
        let cancelled = self.cancelled.clone();

        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));

            let completion = if cancelled.load(Ordering::SeqCst) {
                Completion::failure(std::io::Error::new(
                    std::io::ErrorKind::Interrupted,
                    "transfer aborted",
                ))
            } else {
                Completion::success(
                    RequestHead {
                        method: Method::GET,
                        uri: Uri::from_static("http://example.com/greeting"),
                        headers: HeaderMap::new(),
                    },
                    ResponseHead { status: StatusCode::OK, headers: HeaderMap::new() },
                    Bytes::from_static(b"hello from the transport"),
                )
            };

            callback(completion);
        });
    }
}

#[tokio::main]
async fn main() {
    //plain promise: settles when the transport finishes
    let request = Arc::new(SlowRequest::default());
    let (text, snapshot) = request.response_string().await.unwrap();
    println!("fulfilled: {:?} ({})", text, snapshot.response.unwrap().status);

    //cancellable promise: cancelled before the transport can finish
    let request = Arc::new(SlowRequest::default());
    let promise = request.clone().response_string_cancellable();
    promise.cancel();

    match promise.await {
        Ok((text, _)) => println!("unreachable: {:?}", text),
        Err(error) => println!("rejected: {} (cancelled = {})", error, error.is_cancelled()),
    }
}
