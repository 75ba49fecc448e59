use std::io::Write;

use crate::domain::{account::CardKind, catalog::CardCatalog};

#[derive(serde::Serialize)]
/// Internal CSV output row for the end-of-run card summary.
///
/// Headers written (in this order): `card,kind,owner,balance,linked,blocked`.
/// Monetary fields are formatted to 2 decimal places as strings.
struct CardRow<'a> {
    card: &'a str,
    kind: &'static str,
    owner: &'a str,
    balance: String,
    linked: String,
    blocked: bool,
}

/// Writes the final state of every card to a CSV writer.
///
/// Cards come out sorted by id, since the catalog keeps them ordered.
///
/// # Errors
///
/// Returns a `csv::Error` if writing/serializing any row fails.
///
/// # Examples
///
/// ```
/// use atm_engine::common::money::Money;
/// use atm_engine::domain::{account::CardAccount, catalog::CardCatalog};
/// use atm_engine::io::writer::write_cards;
///
/// let mut cards = CardCatalog::new();
/// cards.insert(CardAccount::debit("2222", "0000", Money::new(1050)));
/// cards.insert(CardAccount::debit("1111", "0000", Money::zero()));
///
/// let mut out = Vec::new();
/// write_cards(&mut out, &cards).unwrap();
///
/// let s = String::from_utf8(out).unwrap();
/// assert!(s.starts_with("card,kind,owner,balance,linked,blocked\n"));
/// assert!(s.contains("\n1111,debit,,0.00,0.00,false\n2222,"));
/// ```
pub fn write_cards<W: Write>(writer: W, cards: &CardCatalog) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for card in cards.cards() {
        let kind = match card.kind() {
            CardKind::Debit => "debit",
            CardKind::Credit(_) => "credit",
        };
        wtr.serialize(CardRow {
            card: card.id(),
            kind,
            owner: card.owner_name(),
            balance: card.balance().to_string_2dp(),
            linked: card.linked_balance().to_string_2dp(),
            blocked: card.is_blocked(),
        })?;
    }

    wtr.flush()?;
    Ok(())
}
