use tracing::info;

use crate::{
    atm::session::{AtmSession, parse_amount},
    common::error::AtmError,
    domain::catalog::CardCatalog,
};

pub fn handle<C, P>(
    session: &mut AtmSession<C, P>,
    cards: &mut CardCatalog,
    amount_text: &str,
) -> Result<String, AtmError> {
    let card = session.authenticated_card(cards)?;
    let amount = parse_amount(amount_text)?;
    if !amount.is_positive() {
        return Err(AtmError::InvalidAmount);
    }

    let message = card.withdraw(amount, session.cash)?;

    // dispensed cash leaves the cassette
    session.cash -= amount;
    session.log_operation(format!("Withdrawal: {amount}"));
    info!(card = card.id(), %amount, cash = %session.cash, "cash withdrawn");
    Ok(message)
}
