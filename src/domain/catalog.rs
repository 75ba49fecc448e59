use std::collections::BTreeMap;

use chrono::{Duration, Utc};

use crate::{
    common::{chance::Chance, config::AtmConfig, money::Money},
    domain::{
        account::{CardAccount, CreditTerms, DepositMode},
        transaction::{TransactionRecord, TxKind},
    },
};

/// In-memory card store keyed by card id.
///
/// The terminal never owns cards: a session keeps only the id of the bound
/// card and borrows the catalog for each operation.
#[derive(Debug, Default)]
pub struct CardCatalog {
    cards: BTreeMap<String, CardAccount>,
}

impl CardCatalog {
    pub fn new() -> Self {
        Self {
            cards: BTreeMap::new(),
        }
    }

    /// Adds a card, replacing any card with the same id.
    pub fn insert(&mut self, card: CardAccount) {
        self.cards.insert(card.id().to_string(), card);
    }

    pub fn get(&self, id: &str) -> Option<&CardAccount> {
        self.cards.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CardAccount> {
        self.cards.get_mut(id)
    }

    /// Cards sorted by id.
    pub fn cards(&self) -> impl Iterator<Item = &CardAccount> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Cash loaded into the terminal that serves the demo catalog.
    pub fn demo_cash() -> Money {
        Money::new(2_500_000)
    }

    /// The sample catalog the terminal ships with: two debit and two credit
    /// cards, the first one carrying a month of history plus one stale entry.
    pub fn demo<C: Chance>(config: &AtmConfig, chance: &mut C) -> Self {
        let credit = |limit: i64| CreditTerms {
            limit: Money::new(limit),
            penalty_rate: config.penalty_rate.clone(),
        };

        let window = config.history_window();
        let mut main = CardAccount::debit("1111-2222-3333-4444", "1234", Money::zero())
            .with_history(true)
            .with_deposit_mode(DepositMode::Partial)
            .with_owner("I. Ivanov")
            .with_history_window(window);
        seed_history(&mut main);

        let cards = [
            main,
            CardAccount::credit("5555-6666-7777-8888", "5678", Money::new(50_000), credit(200_000))
                .with_history(true)
                .with_deposit_mode(DepositMode::Partial)
                .with_owner("A. Petrova")
                .with_history_window(window),
            CardAccount::debit("9999-0000-1111-2222", "0000", Money::new(10_000))
                .with_history(false)
                .with_deposit_mode(DepositMode::Full)
                .with_owner("S. Sidorov")
                .with_history_window(window),
            CardAccount::credit("1234-5678-9012-3456", "1111", Money::new(-15_000), credit(50_000))
                .with_history(true)
                .with_deposit_mode(DepositMode::Full)
                .with_owner("V. Zaitsev")
                .with_history_window(window),
        ];

        let mut catalog = Self::new();
        for card in cards {
            let linked = seed_linked_balance(config, chance);
            catalog.insert(card.with_linked_balance(linked));
        }
        catalog
    }
}

/// Draws a linked bank balance from the configured seeding range.
pub fn seed_linked_balance<C: Chance>(config: &AtmConfig, chance: &mut C) -> Money {
    let span = (config.linked_seed_max - config.linked_seed_min).as_i64();
    let offset = (span as f64 * chance.roll()).floor() as i64;
    config.linked_seed_min + Money::new(offset)
}

fn seed_history(card: &mut CardAccount) {
    card.reset_history(Money::new(120_000));
    card.record_transaction(TxKind::InitialBalance, None);

    card.post_external(TxKind::Salary, Money::new(200_000));
    card.post_external(TxKind::Purchase, Money::new(-30_000));
    card.post_external(TxKind::Withdrawal, Money::new(-50_000));

    let stale = Money::new(1_000);
    card.backfill_transaction(TransactionRecord::new(
        Utc::now() - Duration::days(35),
        TxKind::Deposit,
        Some(stale),
        stale,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::chance::FixedChance;

    #[test]
    fn demo_catalog_has_four_cards_sorted_by_id() {
        let catalog = CardCatalog::demo(&AtmConfig::default(), &mut FixedChance(0.5));
        let ids: Vec<_> = catalog.cards().map(|c| c.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                "1111-2222-3333-4444",
                "1234-5678-9012-3456",
                "5555-6666-7777-8888",
                "9999-0000-1111-2222",
            ]
        );
    }

    #[test]
    fn demo_terminal_starts_with_its_own_cash() {
        assert_eq!(CardCatalog::demo_cash().to_string_2dp(), "25000.00");
        assert_ne!(CardCatalog::demo_cash(), AtmConfig::default().initial_cash);
    }

    #[test]
    fn demo_history_card_is_seeded() {
        let catalog = CardCatalog::demo(&AtmConfig::default(), &mut FixedChance(0.0));
        let card = catalog.get("1111-2222-3333-4444").unwrap();

        assert_eq!(card.balance(), Money::new(240_000));
        assert_eq!(card.ledger().len(), 5);
        assert_eq!(card.ledger().records()[0].kind, TxKind::Deposit);
        assert_eq!(card.linked_balance(), Money::new(100_000));
    }

    #[test]
    fn seeded_linked_balance_stays_in_range() {
        let config = AtmConfig::default();
        assert_eq!(seed_linked_balance(&config, &mut FixedChance(0.0)), config.linked_seed_min);
        assert_eq!(
            seed_linked_balance(&config, &mut FixedChance(0.5)),
            Money::new(550_000)
        );
        assert!(seed_linked_balance(&config, &mut FixedChance(0.999_999)) < config.linked_seed_max);
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut catalog = CardCatalog::new();
        catalog.insert(CardAccount::debit("1", "0", Money::new(1)));
        catalog.insert(CardAccount::debit("1", "0", Money::new(2)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("1").unwrap().balance(), Money::new(2));
    }
}
