use crate::common::{config::ConfigError, money::Money};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("missing session script path. usage: cargo run -- <script.csv> [cards.csv]")]
    MissingArg,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Outcome of a rejected card or terminal operation.
///
/// These never escape as faults: the session returns them as data and the
/// presentation layer renders the `Display` text.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AtmError {
    #[error("Invalid amount format.")]
    InvalidAmountFormat,
    #[error("Amount must be greater than zero.")]
    InvalidAmount,
    #[error("Amount is too large.")]
    AmountTooLarge,
    #[error("Card is blocked.")]
    CardBlocked,
    #[error("Insufficient funds on the debit card.")]
    InsufficientCardFunds,
    #[error("Not enough cash in the ATM for this operation.")]
    InsufficientAtmCash,
    #[error("Credit limit exceeded. Available to withdraw including credit: {available}")]
    CreditLimitExceeded { available: Money },
    #[error("Insufficient funds in the linked bank account. Available: {available}")]
    InsufficientLinkedFunds { available: Money },
    #[error("The linked bank account has no funds.")]
    LinkedAccountEmpty,
    #[error("An amount is required for a partial transfer.")]
    MissingAmount,
    #[error("Transaction history is not available for this card.")]
    HistoryDisabled,
    #[error("Insert a card first.")]
    NoCardBound,
    #[error("Enter the PIN first.")]
    PinNotVerified,
    #[error("A card is already inserted.")]
    CardAlreadyInserted,
    #[error("This card is blocked.")]
    CardAlreadyBlocked,
    #[error("Card read error. Try another card or insert this one again.")]
    ReadError,
    #[error("Unknown deposit mode: {0}")]
    UnknownDepositMode(String),
    #[error("Unknown card: {0}")]
    UnknownCard(String),
}
