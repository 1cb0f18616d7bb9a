use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use yakusoku::{
    Cancellable, Completion, CompletionCallback, DataRequest, DataRequestExt, RequestHead,
    ResponseHead,
};

//fake transport whose transfer time is configurable per request
struct TimedRequest {
    index: usize,
    delay: Duration,
    cancelled: Arc<AtomicBool>,
}

impl TimedRequest {
    fn new(index: usize) -> Arc<Self> {
        Arc::new(Self {
            index,
            //odd requests are slow enough to lose the race
            delay: Duration::from_millis(if index % 2 == 0 { 10 } else { 200 }),
            cancelled: Arc::default(),
        })
    }
}

impl Cancellable for TimedRequest {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl DataRequest for TimedRequest {
    fn on_completion(&self, callback: CompletionCallback) {
        let delay = self.delay;
        let body = Bytes::from(format!("payload #{}", self.index));

        std::thread::spawn(move || {
            std::thread::sleep(delay);

            callback(Completion::success(
                RequestHead {
                    method: Method::GET,
                    uri: Uri::from_static("http://example.com/"),
                    headers: HeaderMap::new(),
                },
                ResponseHead { status: StatusCode::OK, headers: HeaderMap::new() },
                body,
            ));
        });
    }
}

#[tokio::main]
async fn main() {
    //these are here to collect the outcomes at the end
    let (fulfilled_tx, fulfilled_rx) = unbounded_channel();
    let (cancelled_tx, cancelled_rx) = unbounded_channel();

    for index in 0..10 {
        let fulfilled_tx = fulfilled_tx.clone();
        let cancelled_tx = cancelled_tx.clone();

        let request = TimedRequest::new(index);
        let promise = request.clone().response_string_cancellable();

        tokio::spawn(async move {
            //give fast transfers a head start, then cancel whatever is left
            tokio::time::sleep(Duration::from_millis(50)).await;
            promise.cancel();

            match promise.await {
                Ok((text, _)) => {
                    let _ = fulfilled_tx.send((index, text));
                }
                Err(error) if error.is_cancelled() => {
                    let _ = cancelled_tx.send(index);
                }
                Err(error) => panic!("unexpected rejection: {}", error),
            };
        });
    }

    //drop the tx so the collectors finish
    drop(fulfilled_tx);
    drop(cancelled_tx);

    let mut fulfilled = collect_channel(fulfilled_rx).await;
    fulfilled.sort();
    println!("fulfilled: {:?}", fulfilled);

    let mut cancelled = collect_channel(cancelled_rx).await;
    cancelled.sort();
    println!("cancelled: {:?}", cancelled);
}

//collect items from a channel
async fn collect_channel<T>(mut rx: UnboundedReceiver<T>) -> Vec<T> {
    let mut v = Vec::new();

    while let Some(n) = rx.recv().await {
        v.push(n);
    }

    v
}
