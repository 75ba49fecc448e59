use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::{
    common::{error::AtmError, money::Money},
    domain::{
        ledger::TransactionLedger,
        transaction::{TransactionRecord, TxKind},
    },
};

/// How a card pulls money from its linked bank account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositMode {
    /// The whole linked balance moves at once.
    Full,
    /// The caller names the amount.
    Partial,
}

impl FromStr for DepositMode {
    type Err = AtmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(DepositMode::Full),
            "partial" => Ok(DepositMode::Partial),
            other => Err(AtmError::UnknownDepositMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreditTerms {
    /// How far below zero the balance may go. Never negative.
    pub limit: Money,
    pub penalty_rate: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardKind {
    Debit,
    Credit(CreditTerms),
}

#[derive(Debug, Clone)]
pub struct CardAccount {
    id: String,
    pin: String,
    owner_name: String,
    balance: Money,
    /// Once set, never cleared.
    blocked: bool,
    history_enabled: bool,
    deposit_mode: DepositMode,
    /// Simulated external bank account; only transfers touch it.
    linked_balance: Money,
    kind: CardKind,
    ledger: TransactionLedger,
}

impl CardAccount {
    pub fn debit(id: impl Into<String>, pin: impl Into<String>, balance: Money) -> Self {
        Self::with_kind(id.into(), pin.into(), balance, CardKind::Debit)
    }

    /// A negative `terms.limit` is treated as zero.
    pub fn credit(
        id: impl Into<String>,
        pin: impl Into<String>,
        balance: Money,
        mut terms: CreditTerms,
    ) -> Self {
        terms.limit = terms.limit.max(Money::zero());
        Self::with_kind(id.into(), pin.into(), balance, CardKind::Credit(terms))
    }

    fn with_kind(id: String, pin: String, balance: Money, kind: CardKind) -> Self {
        Self {
            id,
            pin,
            owner_name: String::new(),
            balance,
            blocked: false,
            history_enabled: false,
            deposit_mode: DepositMode::Partial,
            linked_balance: Money::zero(),
            kind,
            ledger: TransactionLedger::default(),
        }
    }

    pub fn with_owner(mut self, owner_name: impl Into<String>) -> Self {
        self.owner_name = owner_name.into();
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    pub fn with_deposit_mode(mut self, mode: DepositMode) -> Self {
        self.deposit_mode = mode;
        self
    }

    pub fn with_linked_balance(mut self, linked_balance: Money) -> Self {
        self.linked_balance = linked_balance;
        self
    }

    pub fn with_history_window(mut self, window: Duration) -> Self {
        self.ledger = TransactionLedger::new(window);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn linked_balance(&self) -> Money {
        self.linked_balance
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn history_enabled(&self) -> bool {
        self.history_enabled
    }

    pub fn deposit_mode(&self) -> DepositMode {
        self.deposit_mode
    }

    pub fn kind(&self) -> &CardKind {
        &self.kind
    }

    pub fn ledger(&self) -> &TransactionLedger {
        &self.ledger
    }

    pub fn credit_terms(&self) -> Option<&CreditTerms> {
        match &self.kind {
            CardKind::Credit(terms) => Some(terms),
            CardKind::Debit => None,
        }
    }

    /// `balance + limit` for credit cards, the plain balance for debit cards.
    pub fn available_funds(&self) -> Money {
        match &self.kind {
            CardKind::Credit(terms) => self.balance.saturating_add(terms.limit),
            CardKind::Debit => self.balance,
        }
    }

    pub fn block(&mut self) {
        self.blocked = true;
    }

    pub fn check_pin(&self, entered: &str) -> bool {
        self.pin == entered
    }

    pub fn record_transaction(&mut self, kind: TxKind, amount: Option<Money>) {
        self.record_transaction_at(kind, amount, Utc::now());
    }

    pub fn record_transaction_at(&mut self, kind: TxKind, amount: Option<Money>, at: DateTime<Utc>) {
        self.ledger
            .insert(TransactionRecord::new(at, kind, amount, self.balance));
    }

    /// Adds an out-of-order record without pruning the ledger.
    pub fn backfill_transaction(&mut self, record: TransactionRecord) {
        self.ledger.backfill(record);
    }

    /// Replaces the balance and history, used while seeding a catalog.
    pub fn reset_history(&mut self, balance: Money) {
        self.ledger.clear();
        self.balance = balance;
    }

    /// Applies a movement made outside the terminal (salary, card purchase)
    /// and records its magnitude.
    pub fn post_external(&mut self, kind: TxKind, delta: Money) {
        self.balance += delta;
        self.record_transaction(kind, Some(delta.abs()));
    }

    /// Ledger records, newest first.
    pub fn history(&self) -> Result<Vec<&TransactionRecord>, AtmError> {
        if !self.history_enabled {
            return Err(AtmError::HistoryDisabled);
        }
        Ok(self.ledger.newest_first().collect())
    }

    pub fn history_report(&self) -> Result<String, AtmError> {
        let records = self.history()?;
        if records.is_empty() {
            return Ok("Transaction history is empty.".to_string());
        }

        let window_days = self.ledger.window().num_days();
        let mut report = format!("Transaction history (last {window_days} days):\n");
        report.push_str("Date and time    | Type         |   Amount | Balance after\n");
        report.push_str(&"-".repeat(60));
        report.push('\n');
        for record in records {
            report.push_str(&record.to_history_row());
            report.push('\n');
        }
        Ok(report)
    }

    /// Formatted balance without side effects.
    pub fn balance_text(&self) -> String {
        match &self.kind {
            CardKind::Credit(terms) => {
                format!("{} (credit limit: {})", self.balance, terms.limit)
            }
            CardKind::Debit => self.balance.to_string_2dp(),
        }
    }

    /// Formatted balance for display. Credit cards accrue any pending penalty first.
    pub fn display_balance(&mut self) -> String {
        self.apply_penalty();
        self.balance_text()
    }

    pub fn deposit_cash(&mut self, amount: Money) -> Result<String, AtmError> {
        self.apply_penalty();
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AtmError::AmountTooLarge)?;
        self.record_transaction(TxKind::Deposit, Some(amount));
        self.apply_penalty();
        Ok(format!(
            "Card topped up by {amount}. New balance: {}",
            self.balance_text()
        ))
    }

    /// Moves money from the linked bank account onto the card.
    ///
    /// `Full` cards ignore `amount` and move everything; `Partial` cards
    /// require it.
    pub fn transfer_from_linked(&mut self, amount: Option<Money>) -> Result<String, AtmError> {
        self.apply_penalty();

        let moved = match self.deposit_mode {
            DepositMode::Full => {
                if !self.linked_balance.is_positive() {
                    return Err(AtmError::LinkedAccountEmpty);
                }
                self.linked_balance
            }
            DepositMode::Partial => {
                let amount = match amount {
                    Some(amount) if amount.is_positive() => amount,
                    _ => return Err(AtmError::InvalidAmount),
                };
                if amount > self.linked_balance {
                    return Err(AtmError::InsufficientLinkedFunds {
                        available: self.linked_balance,
                    });
                }
                amount
            }
        };

        self.balance = self
            .balance
            .checked_add(moved)
            .ok_or(AtmError::AmountTooLarge)?;
        self.linked_balance -= moved;
        self.record_transaction(TxKind::TransferIn, Some(moved));
        self.apply_penalty();

        Ok(match self.deposit_mode {
            DepositMode::Full => format!(
                "Full amount {moved} transferred from the bank account. Card balance: {}",
                self.balance_text()
            ),
            DepositMode::Partial => format!(
                "{moved} transferred from the bank account. Card balance: {}",
                self.balance_text()
            ),
        })
    }

    pub fn withdraw(&mut self, amount: Money, cash_available: Money) -> Result<String, AtmError> {
        match self.kind {
            CardKind::Debit => self.withdraw_debit(amount, cash_available),
            CardKind::Credit(_) => self.withdraw_credit(amount, cash_available),
        }
    }

    fn withdraw_debit(&mut self, amount: Money, cash_available: Money) -> Result<String, AtmError> {
        if self.blocked {
            return Err(AtmError::CardBlocked);
        }
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }
        if amount > self.balance {
            return Err(AtmError::InsufficientCardFunds);
        }
        if amount > cash_available {
            return Err(AtmError::InsufficientAtmCash);
        }

        self.balance -= amount;
        self.record_transaction(TxKind::Withdrawal, Some(amount));
        Ok(self.dispensed_message(amount))
    }

    fn withdraw_credit(&mut self, amount: Money, cash_available: Money) -> Result<String, AtmError> {
        if self.blocked {
            return Err(AtmError::CardBlocked);
        }
        self.apply_penalty();
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }
        if amount > self.available_funds() {
            return Err(AtmError::CreditLimitExceeded {
                available: self.available_funds(),
            });
        }
        if amount > cash_available {
            return Err(AtmError::InsufficientAtmCash);
        }

        self.balance -= amount;
        self.record_transaction(TxKind::Withdrawal, Some(amount));
        self.apply_penalty();
        Ok(self.dispensed_message(amount))
    }

    fn dispensed_message(&self, amount: Money) -> String {
        format!(
            "Dispensed: {amount}. Remaining on card: {}",
            self.balance_text()
        )
    }

    /// Charges `|balance| * penalty_rate` while a credit balance is negative.
    ///
    /// Runs before and after every balance-changing credit operation, so one
    /// operation can accrue twice. No-op for debit cards and for penalties
    /// that round to zero.
    fn apply_penalty(&mut self) {
        let CardKind::Credit(terms) = &self.kind else {
            return;
        };
        if !self.balance.is_negative() {
            return;
        }
        let Some(penalty) = self.balance.abs().scale(&terms.penalty_rate) else {
            return;
        };
        if !penalty.is_positive() {
            return;
        }

        let Some(balance) = self.balance.checked_sub(penalty) else {
            return;
        };
        self.balance = balance;
        self.record_transaction(TxKind::Penalty, Some(penalty));
        debug!(card = %self.id, %penalty, balance = %self.balance, "penalty accrued");
    }
}
