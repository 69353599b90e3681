//! Store catalogue library modules.
//!
//! The domain layer owns catalogue semantics and the ports it depends on;
//! `inbound` adapts HTTP onto those ports and `outbound` provides the
//! document-store implementations.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::{Trace, TraceId};
