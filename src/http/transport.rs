//! Transport adapters that put a rendered response on the wire.
//!
//! # Responsibilities
//! - Define the `TransportSink` contract the response builder sends through
//! - Hand a rendered response to axum/hyper (`ResponseSlot`)
//! - Frame a rendered response as ASGI-style send events (`ChannelSink`)
//!
//! # Design Decisions
//! - Sinks receive the whole body at once; framing is the sink's concern
//! - `Content-Length` is added by the framing sink, not by the builder

use std::future::Future;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::sync::mpsc;

use crate::http::error::TransportError;

/// Default maximum size of a single body frame emitted by `ChannelSink`.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// A fully materialized response: status, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for RenderedResponse {
    fn into_response(self) -> Response {
        let mut res = Response::new(Body::from(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

/// Protocol-level writer for a rendered response.
pub trait TransportSink {
    /// Write the response. Completes once the transport accepted it.
    fn send(
        &mut self,
        response: RenderedResponse,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Sink that keeps the response so axum can serve it.
#[derive(Debug, Default)]
pub struct ResponseSlot {
    response: Option<RenderedResponse>,
}

impl ResponseSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_filled(&self) -> bool {
        self.response.is_some()
    }

    pub fn take(&mut self) -> Option<RenderedResponse> {
        self.response.take()
    }
}

impl TransportSink for ResponseSlot {
    async fn send(&mut self, response: RenderedResponse) -> Result<(), TransportError> {
        if self.response.is_some() {
            return Err(TransportError::AlreadySent);
        }
        self.response = Some(response);
        Ok(())
    }
}

impl IntoResponse for ResponseSlot {
    fn into_response(self) -> Response {
        match self.response {
            Some(response) => response.into_response(),
            None => {
                tracing::error!("Response slot consumed before anything was sent");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

/// Events emitted on an ASGI-style send channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SendEvent {
    /// Status line and headers.
    Start { status: StatusCode, headers: HeaderMap },
    /// A body frame; the last one has `more_body == false`.
    Body { chunk: Bytes, more_body: bool },
}

/// Sink that frames the response into `SendEvent`s over an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SendEvent>,
    chunk_size: usize,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SendEvent>, chunk_size: usize) -> Self {
        Self {
            tx,
            chunk_size: chunk_size.max(1),
        }
    }

    /// Create a sink together with the receiving end of its channel.
    pub fn channel(buffer: usize, chunk_size: usize) -> (Self, mpsc::Receiver<SendEvent>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(tx, chunk_size), rx)
    }

    async fn emit(&self, event: SendEvent) -> Result<(), TransportError> {
        self.tx.send(event).await.map_err(|_| TransportError::Closed)
    }
}

impl TransportSink for ChannelSink {
    async fn send(&mut self, response: RenderedResponse) -> Result<(), TransportError> {
        let RenderedResponse {
            status,
            mut headers,
            body,
        } = response;

        if !headers.contains_key(header::CONTENT_LENGTH) {
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
        self.emit(SendEvent::Start { status, headers }).await?;

        let mut rest = body;
        let mut frames = 0usize;
        loop {
            let chunk = if rest.len() > self.chunk_size {
                rest.split_to(self.chunk_size)
            } else {
                std::mem::take(&mut rest)
            };
            let more_body = !rest.is_empty();
            self.emit(SendEvent::Body { chunk, more_body }).await?;
            frames += 1;
            if !more_body {
                break;
            }
        }

        tracing::trace!(status = %status, frames, "Response framed onto send channel");
        Ok(())
    }
}
