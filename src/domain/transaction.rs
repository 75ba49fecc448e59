use std::fmt;

use chrono::{DateTime, Utc};

use crate::common::money::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: TxKind,
    /// Absent for entries such as the opening balance marker.
    pub amount: Option<Money>,
    pub balance_after: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxKind {
    InitialBalance,
    Deposit,
    Withdrawal,
    TransferIn,
    Penalty,
    Salary,
    Purchase,
}

impl TxKind {
    pub fn label(&self) -> &'static str {
        match self {
            TxKind::InitialBalance => "Opening",
            TxKind::Deposit => "Deposit",
            TxKind::Withdrawal => "Withdrawal",
            TxKind::TransferIn => "Transfer in",
            TxKind::Penalty => "Penalty",
            TxKind::Salary => "Salary",
            TxKind::Purchase => "Purchase",
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl TransactionRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: TxKind,
        amount: Option<Money>,
        balance_after: Money,
    ) -> Self {
        Self {
            timestamp,
            kind,
            amount,
            balance_after,
        }
    }

    /// One row of the history table: `date | kind | amount | balance after`.
    pub fn to_history_row(&self) -> String {
        let amount = match self.amount {
            Some(amount) => amount.to_string_2dp(),
            None => "N/A".to_string(),
        };
        format!(
            "{} | {:<12} | {:>8} | {}",
            self.timestamp.format("%d.%m.%Y %H:%M"),
            self.kind,
            amount,
            self.balance_after
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn history_row_pads_columns() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 9, 7, 0).unwrap();
        let rec = TransactionRecord::new(at, TxKind::Withdrawal, Some(Money::new(50_000)), Money::new(100_000));
        assert_eq!(
            rec.to_history_row(),
            "05.03.2026 09:07 | Withdrawal   |   500.00 | 1000.00"
        );
    }

    #[test]
    fn history_row_without_amount() {
        let at = Utc.with_ymd_and_hms(2026, 3, 5, 9, 7, 0).unwrap();
        let rec = TransactionRecord::new(at, TxKind::InitialBalance, None, Money::new(120_000));
        assert_eq!(
            rec.to_history_row(),
            "05.03.2026 09:07 | Opening      |      N/A | 1200.00"
        );
    }
}
