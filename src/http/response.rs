//! Per-request response builder.
//!
//! # Responsibilities
//! - Accumulate status, body content or media, and headers for one request
//! - Derive the final body and content headers (`contents`)
//! - Render once and hand the result to a transport sink
//!
//! # Design Decisions
//! - Raw content takes precedence over media; with neither, the body is `{}`
//! - Status defaults to 200 only when the response is rendered
//! - Rendering consumes the builder, so a response is sent at most once
//! - Headers set by the handler override content-derived ones

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use crate::http::error::ResponseResult;
use crate::http::transport::{RenderedResponse, TransportSink};

const EMPTY_MEDIA: &[u8] = b"{}";

/// Mutable response state owned by a single request handler.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    content: Option<Bytes>,
    media: Option<Value>,
    status: Option<StatusCode>,
    headers: HeaderMap,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Set the raw body. An empty body still counts as set.
    pub fn set_content(&mut self, content: impl Into<Bytes>) -> &mut Self {
        self.content = Some(content.into());
        self
    }

    pub fn media(&self) -> Option<&Value> {
        self.media.as_ref()
    }

    /// Set a structured body, serialized as JSON when no raw content is set.
    pub fn set_media<T: Serialize + ?Sized>(&mut self, media: &T) -> ResponseResult<&mut Self> {
        self.media = Some(serde_json::to_value(media)?);
        Ok(self)
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = Some(status);
        self
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Set a header, replacing any previous values under the same name.
    pub fn insert_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.headers.insert(name, value);
        self
    }

    /// Body and content-derived headers for the current state.
    pub fn contents(&self) -> (Bytes, HeaderMap) {
        if let Some(content) = &self.content {
            return (content.clone(), HeaderMap::new());
        }

        let body = match &self.media {
            Some(media) => Bytes::from(media.to_string()),
            None => Bytes::from_static(EMPTY_MEDIA),
        };
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        (body, headers)
    }

    /// Materialize the final status, headers and body.
    pub fn render(self) -> RenderedResponse {
        let status = self.status.unwrap_or(StatusCode::OK);
        let (body, mut headers) = self.contents();

        for name in self.headers.keys() {
            headers.remove(name);
        }
        for (name, value) in self.headers.iter() {
            headers.append(name.clone(), value.clone());
        }

        RenderedResponse {
            status,
            headers,
            body,
        }
    }

    /// Render the response and write it through `sink`.
    pub async fn send<S: TransportSink>(self, sink: &mut S) -> ResponseResult<()> {
        let response = self.render();
        tracing::debug!(
            status = %response.status,
            body_len = response.body.len(),
            "Sending response"
        );
        sink.send(response).await?;
        Ok(())
    }
}

impl IntoResponse for ResponseBuilder {
    fn into_response(self) -> Response {
        self.render().into_response()
    }
}
