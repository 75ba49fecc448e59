use chrono::Duration;

use crate::domain::transaction::TransactionRecord;

/// Rolling per-card history.
///
/// Every [`TransactionLedger::insert`] prunes records older than the window,
/// measured from the inserted record's timestamp. Reads never prune.
#[derive(Debug, Clone)]
pub struct TransactionLedger {
    records: Vec<TransactionRecord>,
    window: Duration,
}

impl Default for TransactionLedger {
    fn default() -> Self {
        Self::new(Duration::days(30))
    }
}

impl TransactionLedger {
    pub fn new(window: Duration) -> Self {
        Self {
            records: Vec::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn insert(&mut self, record: TransactionRecord) {
        let cutoff = record.timestamp.checked_sub_signed(self.window);
        self.records.push(record);
        // a window reaching past the calendar keeps everything
        if let Some(cutoff) = cutoff {
            self.records.retain(|r| r.timestamp >= cutoff);
        }
    }

    /// Places an out-of-order record at the front without pruning.
    ///
    /// It stays visible until the next `insert` runs a prune pass.
    pub fn backfill(&mut self, record: TransactionRecord) {
        self.records.insert(0, record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn newest_first(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
