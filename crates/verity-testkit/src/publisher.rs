//! Scripted ledger publisher
//!
//! An in-memory [`LedgerPublisher`] that replays a scripted sequence of
//! outcomes and captures every digest it successfully anchored. With no
//! script it always succeeds.

use async_trait::async_trait;
use std::sync::Mutex;

use verity_server::{LedgerPublisher, PublishError, TransactionRef};
use verity_tree::Digest;

/// One scripted response
#[derive(Debug, Clone)]
pub enum PublishOutcome {
    /// Anchor the digest and hand out the next transaction id
    Succeed,
    /// Fail with the given error, anchoring nothing
    Fail(PublishError),
}

#[derive(Debug, Default)]
struct Inner {
    script: Vec<PublishOutcome>,
    next: usize,
    published: Vec<Digest>,
}

/// In-memory publisher for server tests
#[derive(Debug, Default)]
pub struct ScriptedPublisher {
    inner: Mutex<Inner>,
}

impl ScriptedPublisher {
    /// Publisher that anchors every digest
    pub fn new() -> Self {
        Self::default()
    }

    /// Publisher that replays `script` in order, then succeeds forever
    pub fn with_script(script: Vec<PublishOutcome>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                script,
                next: 0,
                published: Vec::new(),
            }),
        }
    }

    /// Publisher whose first `n` calls fail with insufficient resources
    pub fn failing_times(n: usize) -> Self {
        Self::with_script(vec![
            PublishOutcome::Fail(PublishError::insufficient_resources(
                "scripted failure"
            ));
            n
        ])
    }

    /// Digests anchored so far, in publish order
    pub fn published(&self) -> Vec<Digest> {
        self.inner.lock().expect("publisher lock").published.clone()
    }

    /// Number of successful publishes
    pub fn publish_count(&self) -> usize {
        self.inner.lock().expect("publisher lock").published.len()
    }
}

#[async_trait]
impl LedgerPublisher for ScriptedPublisher {
    async fn publish(&self, digest: &Digest) -> Result<TransactionRef, PublishError> {
        let mut inner = self.inner.lock().expect("publisher lock");
        let outcome = inner
            .script
            .get(inner.next)
            .cloned()
            .unwrap_or(PublishOutcome::Succeed);
        inner.next += 1;
        match outcome {
            PublishOutcome::Succeed => {
                inner.published.push(*digest);
                Ok(TransactionRef(format!("txn-{}", inner.published.len())))
            }
            PublishOutcome::Fail(error) => Err(error),
        }
    }
}
