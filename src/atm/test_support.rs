use std::str::FromStr;

use bigdecimal::BigDecimal;

use crate::{
    atm::session::AtmSession,
    common::{chance::FixedChance, config::AtmConfig, money::Money},
    domain::{
        account::{CardAccount, CreditTerms, DepositMode},
        catalog::CardCatalog,
    },
    io::printer::MemoryPrinter,
};

pub(crate) type TestSession = AtmSession<FixedChance, MemoryPrinter>;

pub(crate) fn money(v: &str) -> Money {
    Money::from_str(v).unwrap()
}

pub(crate) fn terms(limit: &str) -> CreditTerms {
    CreditTerms {
        limit: money(limit),
        penalty_rate: BigDecimal::from_str("0.01").unwrap(),
    }
}

/// Four cards covering debit/credit and full/partial combinations.
pub(crate) fn catalog() -> CardCatalog {
    let mut cards = CardCatalog::new();
    cards.insert(
        CardAccount::debit("1111-2222-3333-4444", "1234", money("1500.00"))
            .with_history(true)
            .with_deposit_mode(DepositMode::Partial)
            .with_linked_balance(money("3000.00")),
    );
    cards.insert(
        CardAccount::credit("5555-6666-7777-8888", "5678", money("-100.00"), terms("500.00"))
            .with_history(true)
            .with_deposit_mode(DepositMode::Partial)
            .with_linked_balance(money("1000.00")),
    );
    cards.insert(
        CardAccount::debit("9999-0000-1111-2222", "0000", money("100.00"))
            .with_deposit_mode(DepositMode::Full)
            .with_linked_balance(money("4200.00")),
    );
    cards.insert(
        CardAccount::credit("1234-5678-9012-3456", "1111", money("50.00"), terms("500.00"))
            .with_history(true)
            .with_deposit_mode(DepositMode::Full),
    );
    cards
}

/// A terminal whose reader never faults, holding 25000.00 in cash.
pub(crate) fn session() -> TestSession {
    AtmSession::new(AtmConfig::default(), FixedChance(0.99), MemoryPrinter::new())
        .with_cash(money("25000.00"))
}

pub(crate) fn authenticated(cards: &mut CardCatalog, card: &str, pin: &str) -> TestSession {
    let mut atm = session();
    atm.insert_card(cards, card).unwrap();
    atm.process_pin(cards, pin);
    atm
}
