use std::{path::PathBuf, time::Duration};

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use serde::de::DeserializeOwned;

use crate::error::{BoxError, Error};

///Descriptor of the request the transport sent
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
}

///Descriptor of the response the transport received
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: StatusCode,
    pub headers: HeaderMap,
}

///Timing metrics for the complete lifecycle of one transfer
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferMetrics {
    ///Request start until the first response byte, when the transport
    ///measured it
    pub first_byte: Option<Duration>,

    ///Request start until completion
    pub total: Duration,
}

///Everything the transport reported about a finished request, minus the
///classified result itself, which the promise carries.
///
///Immutable once constructed; built by the normalizer at the moment the
///completion callback fires and owned by whichever continuation receives it.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    ///The request sent to the server
    pub request: Option<RequestHead>,

    ///The server's response to the request
    pub response: Option<ResponseHead>,

    ///The raw bytes returned by the server
    pub body: Option<Bytes>,

    ///The timing of the transfer
    pub metrics: Option<TransferMetrics>,
}

///Raw payload a data transport delivers to its one-shot completion callback.
///
///`error` is the success/failure discriminator: `None` claims success. The
///normalizer methods consume the payload into exactly one classified result;
///a payload that claims success but lacks a field the requested shape needs
///becomes [`Error::MalformedCompletion`], never a partial success.
#[derive(Debug, Default)]
pub struct Completion {
    pub request: Option<RequestHead>,
    pub response: Option<ResponseHead>,
    pub body: Option<Bytes>,
    pub metrics: Option<TransferMetrics>,
    pub error: Option<BoxError>,
}

impl Completion {
    ///Payload for an operation that failed outright
    pub fn failure(error: impl Into<BoxError>) -> Self {
        Self { error: Some(error.into()), ..Self::default() }
    }

    ///Payload for an operation that finished with a full set of descriptors
    pub fn success(request: RequestHead, response: ResponseHead, body: Bytes) -> Self {
        Self {
            request: Some(request),
            response: Some(response),
            body: Some(body),
            ..Self::default()
        }
    }

    ///Snapshot of the metadata, leaving the classification to the caller
    fn snapshot(&self) -> ResponseSnapshot {
        ResponseSnapshot {
            request: self.request.clone(),
            response: self.response.clone(),
            body: self.body.clone(),
            metrics: self.metrics,
        }
    }

    ///Normalize into the raw `(request, response, body)` triple.
    ///
    ///Requires all three to be present on a success payload.
    pub fn into_parts(self) -> Result<(RequestHead, ResponseHead, Bytes), Error> {
        if let Some(error) = self.error {
            return Err(Error::Transport(error));
        }

        let request = self.request.ok_or(Error::MalformedCompletion("request descriptor"))?;
        let response = self.response.ok_or(Error::MalformedCompletion("response descriptor"))?;
        let body = self.body.ok_or(Error::MalformedCompletion("response body"))?;

        Ok((request, response, body))
    }

    ///Normalize into the body bytes plus a snapshot of the metadata
    pub fn into_data(self) -> Result<(Bytes, ResponseSnapshot), Error> {
        if let Some(error) = self.error {
            return Err(Error::Transport(error));
        }

        let snapshot = self.snapshot();

        match self.body {
            Some(body) => Ok((body, snapshot)),
            None => Err(Error::MalformedCompletion("response body")),
        }
    }

    ///Normalize into UTF-8 text plus a snapshot of the metadata
    pub fn into_string(self) -> Result<(String, ResponseSnapshot), Error> {
        let (body, snapshot) = self.into_data()?;

        let text = std::str::from_utf8(&body)
            .map_err(|error| Error::Decoding(Box::new(error)))?
            .to_owned();

        Ok((text, snapshot))
    }

    ///Normalize into a structured JSON document plus a snapshot of the
    ///metadata
    pub fn into_json(self) -> Result<(serde_json::Value, ResponseSnapshot), Error> {
        let (body, snapshot) = self.into_data()?;

        let document =
            serde_json::from_slice(&body).map_err(|error| Error::Decoding(Box::new(error)))?;

        Ok((document, snapshot))
    }

    ///Normalize into an application type, deserialized from JSON
    pub fn into_decoded<T>(self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let (body, _) = self.into_data()?;

        serde_json::from_slice(&body).map_err(|error| Error::Decoding(Box::new(error)))
    }

    ///Normalize into an application type through a caller-supplied decoder.
    ///
    ///The fetch and the decode are separate fallible stages: a transport
    ///failure rejects as [`Error::Transport`], a decoder failure as
    ///[`Error::Decoding`] carrying the decoder's own error.
    pub fn decode_with<T, D>(self, decoder: D) -> Result<T, Error>
    where
        D: FnOnce(Bytes) -> Result<T, BoxError>,
    {
        let (body, _) = self.into_data()?;

        decoder(body).map_err(Error::Decoding)
    }
}

///Metadata of a finished download, including where the transport stored the
///payload
#[derive(Debug, Clone)]
pub struct DownloadSnapshot {
    pub request: Option<RequestHead>,
    pub response: Option<ResponseHead>,

    ///Destination the transport wrote the payload to, when it did
    pub file_path: Option<PathBuf>,

    pub metrics: Option<TransferMetrics>,
}

///Raw payload a download transport delivers to its one-shot completion
///callback
#[derive(Debug, Default)]
pub struct DownloadCompletion {
    pub request: Option<RequestHead>,
    pub response: Option<ResponseHead>,
    pub file_path: Option<PathBuf>,
    pub metrics: Option<TransferMetrics>,
    pub error: Option<BoxError>,
}

impl DownloadCompletion {
    ///Payload for a download that failed outright
    pub fn failure(error: impl Into<BoxError>) -> Self {
        Self { error: Some(error.into()), ..Self::default() }
    }

    ///Normalize into a download snapshot
    pub fn into_snapshot(self) -> Result<DownloadSnapshot, Error> {
        if let Some(error) = self.error {
            return Err(Error::Transport(error));
        }

        Ok(DownloadSnapshot {
            request: self.request,
            response: self.response,
            file_path: self.file_path,
            metrics: self.metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_pair() -> (RequestHead, ResponseHead) {
        let request = RequestHead {
            method: Method::GET,
            uri: Uri::from_static("http://example.com/"),
            headers: HeaderMap::new(),
        };
        let response = ResponseHead { status: StatusCode::OK, headers: HeaderMap::new() };

        (request, response)
    }

    #[test]
    fn failure_discriminator_takes_precedence() {
        let (request, response) = head_pair();
        let mut completion = Completion::success(request, response, Bytes::from_static(b"ok"));
        completion.error =
            Some(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into());

        match completion.into_parts().unwrap_err() {
            Error::Transport(cause) => {
                //original cause preserved, not rewrapped
                assert!(cause.downcast_ref::<std::io::Error>().is_some());
            }
            other => panic!("expected transport failure, got {:?}", other),
        }
    }

    #[test]
    fn success_with_missing_field_is_malformed() {
        let (request, response) = head_pair();

        let missing_body = Completion {
            request: Some(request.clone()),
            response: Some(response.clone()),
            ..Completion::default()
        };
        assert!(matches!(
            missing_body.into_parts().unwrap_err(),
            Error::MalformedCompletion("response body")
        ));

        let missing_request = Completion {
            response: Some(response),
            body: Some(Bytes::from_static(b"ok")),
            ..Completion::default()
        };
        assert!(matches!(
            missing_request.into_parts().unwrap_err(),
            Error::MalformedCompletion("request descriptor")
        ));
    }

    #[test]
    fn empty_completion_is_malformed_not_success() {
        //neither a value nor an error reported
        assert!(matches!(
            Completion::default().into_data().unwrap_err(),
            Error::MalformedCompletion(_)
        ));
    }

    #[test]
    fn string_decode_failure_is_a_decoding_error() {
        let (request, response) = head_pair();
        let completion =
            Completion::success(request, response, Bytes::from_static(&[0xff, 0xfe]));

        let error = completion.into_string().unwrap_err();
        assert!(error.decoding().is_some());
        assert!(!error.is_cancelled());
    }

    #[test]
    fn json_document_round_trips_metadata() {
        let (request, response) = head_pair();
        let completion = Completion::success(
            request,
            response,
            Bytes::from_static(br#"{"key1":"value1"}"#),
        );

        let (document, snapshot) = completion.into_json().unwrap();
        assert_eq!(document, serde_json::json!({"key1": "value1"}));
        assert_eq!(snapshot.response.unwrap().status, StatusCode::OK);
        assert!(snapshot.body.is_some());
    }

    #[test]
    fn decoder_error_identity_is_preserved() {
        #[derive(Debug, thiserror::Error)]
        #[error("bad payload")]
        struct BadPayload;

        let (request, response) = head_pair();
        let completion = Completion::success(request, response, Bytes::from_static(b"raw"));

        let error = completion
            .decode_with(|_body| Err::<(), _>(BadPayload.into()))
            .unwrap_err();

        assert!(error.decoding().unwrap().downcast_ref::<BadPayload>().is_some());
    }

    #[test]
    fn download_error_rejects_as_transport() {
        let completion = DownloadCompletion::failure(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            "disk full",
        ));

        assert!(matches!(completion.into_snapshot().unwrap_err(), Error::Transport(_)));
    }
}
