use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    atm::handlers::{deposit, inquiry, transfer, withdrawal},
    common::{chance::Chance, config::AtmConfig, error::AtmError, money::Money},
    domain::{account::CardAccount, catalog::CardCatalog},
    io::printer::ReceiptPrinter,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingPin { card: String },
    Authenticated { card: String },
}

/// Result of a PIN entry. `Display` gives the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOutcome {
    Success,
    Failure { attempts_left: u32 },
    Blocked,
    NoCard,
}

impl fmt::Display for PinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinOutcome::Success => f.write_str("PIN accepted."),
            PinOutcome::Failure { attempts_left } => {
                write!(f, "Wrong PIN. Attempts left: {attempts_left}.")
            }
            PinOutcome::Blocked => f.write_str("Wrong PIN. The card has been blocked and retained."),
            PinOutcome::NoCard => f.write_str("Insert a card first."),
        }
    }
}

/// One ATM terminal.
///
/// Holds at most one bound card (by id, the catalog owns the card), the PIN
/// attempt counter, the cash cassette and the operations performed since the
/// card went in. Every operation runs to completion and reports back as data;
/// nothing here panics on user input.
#[derive(Debug)]
pub struct AtmSession<C, P> {
    pub(crate) config: AtmConfig,
    pub(crate) state: SessionState,
    pub(crate) pin_attempts: u32,
    pub(crate) cash: Money,
    pub(crate) operations: Vec<String>,
    chance: C,
    printer: P,
}

impl<C, P> AtmSession<C, P> {
    pub fn config(&self) -> &AtmConfig {
        &self.config
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn bound_card(&self) -> Option<&str> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::AwaitingPin { card } | SessionState::Authenticated { card } => Some(card),
        }
    }

    pub fn pin_attempts(&self) -> u32 {
        self.pin_attempts
    }

    pub fn cash(&self) -> Money {
        self.cash
    }

    /// Receipt lines collected since the current card was inserted.
    pub fn operations(&self) -> &[String] {
        &self.operations
    }

    pub fn printer(&self) -> &P {
        &self.printer
    }

    /// The bound card, provided its PIN has been accepted.
    pub(crate) fn authenticated_card<'c>(
        &self,
        cards: &'c mut CardCatalog,
    ) -> Result<&'c mut CardAccount, AtmError> {
        match &self.state {
            SessionState::Idle => Err(AtmError::NoCardBound),
            SessionState::AwaitingPin { .. } => Err(AtmError::PinNotVerified),
            SessionState::Authenticated { card } => {
                cards.get_mut(card).ok_or(AtmError::NoCardBound)
            }
        }
    }

    pub(crate) fn log_operation(&mut self, entry: impl Into<String>) {
        self.operations.push(entry.into());
    }

    fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.pin_attempts = 0;
        self.operations.clear();
    }

    /// Keeps the card: unbinds it without handing it back.
    fn confiscate(&mut self, reason: &str) {
        if let Some(card) = self.bound_card() {
            warn!(card, reason, "card confiscated");
        }
        self.reset();
    }
}

impl<C: Chance, P: ReceiptPrinter> AtmSession<C, P> {
    pub fn new(config: AtmConfig, chance: C, printer: P) -> Self {
        let cash = config.initial_cash;
        Self {
            config,
            state: SessionState::Idle,
            pin_attempts: 0,
            cash,
            operations: Vec::new(),
            chance,
            printer,
        }
    }

    pub fn with_cash(mut self, cash: Money) -> Self {
        self.cash = cash;
        self
    }

    pub fn insert_card(&mut self, cards: &CardCatalog, card_id: &str) -> Result<String, AtmError> {
        if self.state != SessionState::Idle {
            return Err(AtmError::CardAlreadyInserted);
        }
        let card = cards
            .get(card_id)
            .ok_or_else(|| AtmError::UnknownCard(card_id.to_string()))?;
        if card.is_blocked() {
            return Err(AtmError::CardAlreadyBlocked);
        }
        if self.chance.roll() < self.config.read_failure_probability {
            warn!(card = card_id, "card read fault");
            return Err(AtmError::ReadError);
        }

        self.reset();
        self.state = SessionState::AwaitingPin {
            card: card_id.to_string(),
        };
        info!(card = card_id, "card inserted");
        Ok("Card read. Enter your PIN.".to_string())
    }

    pub fn process_pin(&mut self, cards: &mut CardCatalog, pin: &str) -> PinOutcome {
        let Some(card_id) = self.bound_card().map(str::to_string) else {
            return PinOutcome::NoCard;
        };
        let Some(card) = cards.get_mut(&card_id) else {
            self.reset();
            return PinOutcome::NoCard;
        };

        if card.check_pin(pin) {
            self.pin_attempts = 0;
            self.state = SessionState::Authenticated { card: card_id };
            debug!(card = card.id(), "PIN accepted");
            return PinOutcome::Success;
        }

        self.pin_attempts += 1;
        if self.pin_attempts >= self.config.max_pin_attempts {
            card.block();
            self.confiscate("PIN entered incorrectly too many times");
            return PinOutcome::Blocked;
        }

        debug!(card = card.id(), attempts = self.pin_attempts, "wrong PIN");
        self.state = SessionState::AwaitingPin { card: card_id };
        PinOutcome::Failure {
            attempts_left: self.config.max_pin_attempts - self.pin_attempts,
        }
    }

    pub fn perform_withdrawal(
        &mut self,
        cards: &mut CardCatalog,
        amount_text: &str,
    ) -> Result<String, AtmError> {
        withdrawal::handle(self, cards, amount_text)
    }

    pub fn perform_deposit(
        &mut self,
        cards: &mut CardCatalog,
        amount_text: &str,
    ) -> Result<String, AtmError> {
        deposit::handle(self, cards, amount_text)
    }

    /// `amount_text` is ignored for full-mode cards and required otherwise.
    pub fn perform_transfer(
        &mut self,
        cards: &mut CardCatalog,
        amount_text: Option<&str>,
    ) -> Result<String, AtmError> {
        transfer::handle(self, cards, amount_text)
    }

    pub fn request_balance(&mut self, cards: &mut CardCatalog) -> Result<String, AtmError> {
        inquiry::balance(self, cards)
    }

    pub fn request_history(&mut self, cards: &mut CardCatalog) -> Result<String, AtmError> {
        inquiry::history(self, cards)
    }

    /// Prints the session receipt and hands the card back.
    pub fn cancel_and_eject(&mut self) -> String {
        let mut summary = String::from("Operation cancelled.\n");
        if self.operations.is_empty() {
            summary.push_str("No operations.");
        } else {
            summary.push_str("Completed operations:");
            for op in &self.operations {
                summary.push_str("\n- ");
                summary.push_str(op);
            }
        }

        let receipt = self.compose_receipt(&summary);
        self.printer.print_receipt(&receipt);

        let returned = self.bound_card().map(str::to_string);
        self.reset();
        match returned {
            Some(card) => {
                info!(card = %card, "card ejected");
                format!("Card {card} returned.")
            }
            None => "No card to return.".to_string(),
        }
    }

    fn compose_receipt(&self, body: &str) -> String {
        let mut receipt = String::from("--- RECEIPT ---\n");
        receipt.push_str(&format!("Date: {}\n", Utc::now().format("%d.%m.%Y %H:%M")));
        if let Some(card) = self.bound_card() {
            receipt.push_str(&format!("Card: **** **** **** {}\n", last_four(card)));
        }
        receipt.push_str("----------------\n");
        receipt.push_str(body);
        receipt.push_str("\n----------------\nThank you!\n");
        receipt
    }
}

/// Parses user-entered amount text.
pub(crate) fn parse_amount(text: &str) -> Result<Money, AtmError> {
    Money::from_str(text).map_err(|_| AtmError::InvalidAmountFormat)
}

fn last_four(card: &str) -> &str {
    match card.char_indices().rev().nth(3) {
        Some((idx, _)) => &card[idx..],
        None => card,
    }
}
