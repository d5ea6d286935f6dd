//! Concrete record fixtures
//!
//! A small warehouse-style record family — deposits, withdrawals, and
//! transfers of a named good — matching the shapes the log is deployed
//! against, with bincode payloads.

use serde::{Deserialize, Serialize};

use verity_tree::{MalformedRecord, Record};

/// Test record payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestRecord {
    /// Goods deposited into the warehouse
    Deposit {
        /// Name of the good
        good: String,
        /// Units deposited
        amount: i64,
    },
    /// Goods withdrawn from the warehouse
    Withdrawal {
        /// Name of the good
        good: String,
        /// Units withdrawn
        amount: i64,
    },
    /// Goods moved between accounts; no net change
    Transfer {
        /// Name of the good
        good: String,
        /// Units transferred
        amount: i64,
    },
}

impl TestRecord {
    /// Create a deposit record
    pub fn deposit(good: impl Into<String>, amount: i64) -> Self {
        Self::Deposit {
            good: good.into(),
            amount,
        }
    }

    /// Create a withdrawal record
    pub fn withdrawal(good: impl Into<String>, amount: i64) -> Self {
        Self::Withdrawal {
            good: good.into(),
            amount,
        }
    }

    /// Create a transfer record
    pub fn transfer(good: impl Into<String>, amount: i64) -> Self {
        Self::Transfer {
            good: good.into(),
            amount,
        }
    }

    fn amount(&self) -> i64 {
        match self {
            Self::Deposit { amount, .. }
            | Self::Withdrawal { amount, .. }
            | Self::Transfer { amount, .. } => *amount,
        }
    }
}

impl Record for TestRecord {
    fn to_bytes(&self) -> Vec<u8> {
        bincode::serialize(self).expect("test record serialization is infallible")
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, MalformedRecord> {
        bincode::deserialize(bytes).map_err(|e| MalformedRecord::new(e.to_string()))
    }

    fn net_amount(&self) -> i64 {
        match self {
            Self::Deposit { amount, .. } => *amount,
            Self::Withdrawal { amount, .. } => -amount,
            Self::Transfer { .. } => 0,
        }
    }

    fn total_amount(&self) -> i64 {
        self.amount().abs()
    }
}
