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

    // accepted notes go into the cassette
    let cash = session
        .cash
        .checked_add(amount)
        .ok_or(AtmError::AmountTooLarge)?;
    let message = card.deposit_cash(amount)?;
    session.cash = cash;
    session.log_operation(format!("Cash deposit: {amount}"));
    info!(card = card.id(), %amount, cash = %session.cash, "cash deposited");
    Ok(message)
}

#[cfg(test)]
mod tests {
    use crate::{
        atm::test_support::{authenticated, catalog, money},
        common::error::AtmError,
        domain::transaction::TxKind,
    };

    #[test]
    fn deposit_credits_card_and_fills_cassette() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "1111-2222-3333-4444", "1234");

        let msg = atm.perform_deposit(&mut cards, "250.50").unwrap();

        assert_eq!(msg, "Card topped up by 250.50. New balance: 1750.50");
        assert_eq!(atm.cash(), money("25250.50"));
        assert_eq!(atm.operations(), ["Cash deposit: 250.50"]);
    }

    #[test]
    fn negative_deposit_changes_nothing() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "1111-2222-3333-4444", "1234");

        assert_eq!(atm.perform_deposit(&mut cards, "-5"), Err(AtmError::InvalidAmount));

        let card = cards.get("1111-2222-3333-4444").unwrap();
        assert_eq!(card.balance(), money("1500.00"));
        assert!(card.ledger().is_empty());
        assert_eq!(atm.cash(), money("25000.00"));
        assert!(atm.operations().is_empty());
    }

    #[test]
    fn negative_deposit_on_indebted_credit_card_accrues_nothing() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "5555-6666-7777-8888", "5678");

        assert_eq!(atm.perform_deposit(&mut cards, "-5"), Err(AtmError::InvalidAmount));
        assert!(cards.get("5555-6666-7777-8888").unwrap().ledger().is_empty());
    }

    #[test]
    fn credit_deposit_reports_balance_after_penalties() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "5555-6666-7777-8888", "5678");

        // -100 -> -101 -> -1 -> -1.01
        let msg = atm.perform_deposit(&mut cards, "100").unwrap();
        assert_eq!(msg, "Card topped up by 100.00. New balance: -1.01 (credit limit: 500.00)");

        let kinds: Vec<_> = cards
            .get("5555-6666-7777-8888")
            .unwrap()
            .ledger()
            .records()
            .iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, vec![TxKind::Penalty, TxKind::Deposit, TxKind::Penalty]);
    }

    #[test]
    fn oversized_deposit_is_rejected_without_side_effects() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "1111-2222-3333-4444", "1234");

        assert_eq!(
            atm.perform_deposit(&mut cards, "92233720368547758.00"),
            Err(AtmError::AmountTooLarge)
        );

        let card = cards.get("1111-2222-3333-4444").unwrap();
        assert_eq!(card.balance(), money("1500.00"));
        assert!(card.ledger().is_empty());
        assert_eq!(atm.cash(), money("25000.00"));
        assert!(atm.operations().is_empty());
    }

    #[test]
    fn malformed_deposit_text() {
        let mut cards = catalog();
        let mut atm = authenticated(&mut cards, "1111-2222-3333-4444", "1234");
        assert_eq!(
            atm.perform_deposit(&mut cards, ""),
            Err(AtmError::InvalidAmountFormat)
        );
    }
}
