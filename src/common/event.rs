/// A single terminal interaction, read from a session script and handed to the
/// processor. Amounts stay as raw text: parsing them is part of the session's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    InsertCard { card: String },
    EnterPin { pin: String },
    Withdraw { amount: String },
    Deposit { amount: String },
    Transfer { amount: Option<String> },
    Balance,
    History,
    Cancel,
}
