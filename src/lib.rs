//! Minimal response builder for a web micro-framework.
//!
//! Handlers populate a [`ResponseBuilder`] (raw content, JSON media, status,
//! headers or a file attachment) and hand it to a transport sink or return it
//! straight from an axum handler.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::{Attachment, HttpServer, ResponseBuilder, ResponseError};
pub use lifecycle::Shutdown;
