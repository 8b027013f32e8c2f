use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// The transaction container the façade owns and the CRUD layer mutates
/// through validated operations.
///
/// Transactions are kept sorted by `(trade_date, seq)` so matching can
/// walk them in deterministic chronological order; `next_seq` hands out
/// the insertion sequence numbers that break same-date ties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    /// All transactions, sorted ascending by (trade_date, seq)
    pub transactions: Vec<Transaction>,

    /// Next insertion sequence number to assign
    pub next_seq: u64,
}

impl Ledger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next insertion sequence number.
    pub fn allocate_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Insert a transaction at its sorted position in O(log n).
    pub fn insert_sorted(&mut self, transaction: Transaction) {
        let key = (transaction.trade_date, transaction.seq);
        let pos = self
            .transactions
            .binary_search_by_key(&key, |t| (t.trade_date, t.seq))
            .unwrap_or_else(|pos| pos);
        self.transactions.insert(pos, transaction);
    }

    /// Remove and return the transaction with the given id, if present.
    pub fn remove(&mut self, id: uuid::Uuid) -> Option<Transaction> {
        let idx = self.transactions.iter().position(|t| t.id == id)?;
        Some(self.transactions.remove(idx))
    }

    /// Find a transaction by id.
    #[must_use]
    pub fn get(&self, id: uuid::Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
