//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans from tower_http::trace
//!
//! Consumers:
//!     → logging.rs (fmt subscriber on stdout)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through spans via the x-request-id header

pub mod logging;
