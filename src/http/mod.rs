//! HTTP subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, demo routes)
//!     → request.rs (request ID)
//!     → handler populates response.rs (ResponseBuilder, attachment.rs)
//!     → transport.rs (ResponseSlot / ChannelSink)
//!     → Send to client
//! ```

pub mod attachment;
pub mod error;
pub mod request;
pub mod response;
pub mod server;
pub mod transport;

pub use attachment::Attachment;
pub use error::{ResponseError, ResponseResult, TransportError};
pub use request::X_REQUEST_ID;
pub use response::ResponseBuilder;
pub use server::HttpServer;
pub use transport::{ChannelSink, RenderedResponse, ResponseSlot, SendEvent, TransportSink};
