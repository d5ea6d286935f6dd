//! Tamper-evident log server
//!
//! Orchestrates the append → threshold → publish → record-mapping cycle over
//! an authenticated history tree: every `commit_interval` appended records,
//! the current root digest is anchored in an external ledger, and the
//! resulting commitment becomes the trust anchor for consistency and
//! record-inclusion proofs served to untrusted verifiers.
//!
//! The external ledger appears only through the [`LedgerPublisher`] seam;
//! record payloads stay opaque to everything in this crate.

mod commitments;
mod error;
mod publisher;
mod server;

pub use commitments::CommitmentIndex;
pub use error::{Result, ServerError};
pub use publisher::{LedgerPublisher, PublishError, TransactionRef};
pub use server::{LogServer, ServerConfig, DEFAULT_COMMIT_INTERVAL};
