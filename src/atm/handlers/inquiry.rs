use crate::{atm::session::AtmSession, common::error::AtmError, domain::catalog::CardCatalog};

pub fn balance<C, P>(
    session: &mut AtmSession<C, P>,
    cards: &mut CardCatalog,
) -> Result<String, AtmError> {
    let card = session.authenticated_card(cards)?;
    let text = card.display_balance();
    session.log_operation("Balance inquiry");
    Ok(format!("Current balance: {text}"))
}

pub fn history<C, P>(
    session: &mut AtmSession<C, P>,
    cards: &mut CardCatalog,
) -> Result<String, AtmError> {
    let card = session.authenticated_card(cards)?;
    let report = card.history_report()?;
    session.log_operation("History inquiry");
    Ok(report)
}
