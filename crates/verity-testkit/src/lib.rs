//! Verity testing fixtures
//!
//! Shared helpers for the workspace test suites: a concrete serializable
//! record type and a scripted in-memory ledger publisher.
//!
//! Add to a crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! verity-testkit = { path = "../verity-testkit" }
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod publisher;
pub mod records;

pub use publisher::{PublishOutcome, ScriptedPublisher};
pub use records::TestRecord;
