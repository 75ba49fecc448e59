use std::str::FromStr;

use atm_engine::atm::session::{AtmSession, PinOutcome};
use atm_engine::common::{chance::FixedChance, config::AtmConfig, money::Money};
use atm_engine::domain::{
    account::{CardAccount, CreditTerms},
    catalog::CardCatalog,
    transaction::TxKind,
};
use atm_engine::io::printer::MemoryPrinter;
use bigdecimal::BigDecimal;
use proptest::prelude::*;

const DEBIT: &str = "1111-2222-3333-4444";
const CREDIT: &str = "5555-6666-7777-8888";

#[derive(Debug, Clone)]
enum Op {
    Withdraw(i64),
    Deposit(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-10_000i64..400_000).prop_map(Op::Withdraw),
        (-10_000i64..200_000).prop_map(Op::Deposit),
    ]
}

fn catalog(debit_cents: i64, credit_cents: i64, limit_cents: i64) -> CardCatalog {
    let mut cards = CardCatalog::new();
    cards.insert(CardAccount::debit(DEBIT, "1234", Money::new(debit_cents)).with_history(true));
    cards.insert(
        CardAccount::credit(
            CREDIT,
            "5678",
            Money::new(credit_cents),
            CreditTerms {
                limit: Money::new(limit_cents),
                penalty_rate: BigDecimal::from_str("0.01").unwrap(),
            },
        )
        .with_history(true),
    );
    cards
}

fn signed_in(
    cards: &mut CardCatalog,
    card: &str,
    pin: &str,
    cash_cents: i64,
) -> AtmSession<FixedChance, MemoryPrinter> {
    let mut atm = AtmSession::new(AtmConfig::default(), FixedChance(0.99), MemoryPrinter::new())
        .with_cash(Money::new(cash_cents));
    atm.insert_card(cards, card).unwrap();
    assert_eq!(atm.process_pin(cards, pin), PinOutcome::Success);
    atm
}

fn apply<C, P>(atm: &mut AtmSession<C, P>, cards: &mut CardCatalog, op: &Op)
where
    C: atm_engine::common::chance::Chance,
    P: atm_engine::io::printer::ReceiptPrinter,
{
    // rejections are part of the run
    let _ = match op {
        Op::Withdraw(cents) => atm.perform_withdrawal(cards, &Money::new(*cents).to_string_2dp()),
        Op::Deposit(cents) => atm.perform_deposit(cards, &Money::new(*cents).to_string_2dp()),
    };
}

proptest! {
    #[test]
    fn prop_debit_balance_never_negative(
        start in 0i64..500_000,
        ops in prop::collection::vec(op_strategy(), 0..30)
    ) {
        let mut cards = catalog(start, 0, 0);
        let mut atm = signed_in(&mut cards, DEBIT, "1234", 1_000_000);

        for op in &ops {
            apply(&mut atm, &mut cards, op);
            prop_assert!(!cards.get(DEBIT).unwrap().balance().is_negative());
        }
    }

    #[test]
    fn prop_debit_cash_moves_with_card_balance(
        start in 0i64..500_000,
        cash in 0i64..300_000,
        ops in prop::collection::vec(op_strategy(), 0..30)
    ) {
        let mut cards = catalog(start, 0, 0);
        let mut atm = signed_in(&mut cards, DEBIT, "1234", cash);
        let spread = atm.cash() - cards.get(DEBIT).unwrap().balance();

        for op in &ops {
            apply(&mut atm, &mut cards, op);
            prop_assert!(!atm.cash().is_negative());
            prop_assert_eq!(atm.cash() - cards.get(DEBIT).unwrap().balance(), spread);
        }
    }

    #[test]
    fn prop_credit_withdrawal_stays_within_limit(
        start in -50_000i64..100_000,
        limit in 0i64..200_000,
        ops in prop::collection::vec(op_strategy(), 0..30)
    ) {
        let mut cards = catalog(0, start, limit);
        let mut atm = signed_in(&mut cards, CREDIT, "5678", 10_000_000);

        for op in &ops {
            apply(&mut atm, &mut cards, op);
        }

        let floor = -Money::new(limit);
        for record in cards.get(CREDIT).unwrap().ledger().records() {
            if record.kind == TxKind::Withdrawal {
                prop_assert!(record.balance_after >= floor);
            }
        }
    }

    #[test]
    fn prop_pin_lockout_after_max_attempts(wrong in prop::collection::vec("[0-9]{4}", 1..6)) {
        let wrong: Vec<String> = wrong.into_iter().filter(|p| p != "1234").collect();
        let mut cards = catalog(100_000, 0, 0);
        let mut atm = AtmSession::new(AtmConfig::default(), FixedChance(0.99), MemoryPrinter::new());
        let max = atm.config().max_pin_attempts as usize;
        atm.insert_card(&cards, DEBIT).unwrap();

        for (idx, pin) in wrong.iter().enumerate().take(max) {
            let outcome = atm.process_pin(&mut cards, pin);
            if idx + 1 == max {
                prop_assert_eq!(outcome, PinOutcome::Blocked);
            } else {
                prop_assert_eq!(
                    outcome,
                    PinOutcome::Failure { attempts_left: (max - idx - 1) as u32 }
                );
            }
        }

        let card = cards.get(DEBIT).unwrap();
        prop_assert_eq!(card.is_blocked(), wrong.len() >= max);
        if wrong.len() < max {
            prop_assert_eq!(atm.process_pin(&mut cards, "1234"), PinOutcome::Success);
        } else {
            prop_assert!(atm.bound_card().is_none());
        }
    }
}
