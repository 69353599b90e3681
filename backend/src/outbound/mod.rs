//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the [`crate::domain::ports::DocumentStore`] port:
//!
//! - **memory**: in-process document store with text, geo and unique indexes
//! - **timeout**: deadline decorator wrapping any document store
//! - **seed**: JSON fixture loader used at startup
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod seed;
pub mod timeout;
