use tracing::info;

use crate::{
    atm::session::{AtmSession, parse_amount},
    common::error::AtmError,
    domain::{account::DepositMode, catalog::CardCatalog},
};

pub fn handle<C, P>(
    session: &mut AtmSession<C, P>,
    cards: &mut CardCatalog,
    amount_text: Option<&str>,
) -> Result<String, AtmError> {
    let card = session.authenticated_card(cards)?;

    let (amount, entry) = match card.deposit_mode() {
        DepositMode::Full => (None, "Transfer from bank account (full amount)".to_string()),
        DepositMode::Partial => {
            let text = amount_text.ok_or(AtmError::MissingAmount)?;
            let amount = parse_amount(text)?;
            (Some(amount), format!("Transfer from bank account: {amount}"))
        }
    };

    let message = card.transfer_from_linked(amount)?;
    session.log_operation(entry);
    info!(card = card.id(), balance = %card.balance(), "linked account transfer");
    Ok(message)
}
