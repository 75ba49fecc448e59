use crate::{
    common::{
        chance::Chance, config::AtmConfig, error::AtmError, event::SessionEvent, money::Money,
    },
    domain::{
        account::{CardAccount, CreditTerms, DepositMode},
        catalog::seed_linked_balance,
    },
};
use std::{io::Read, str::FromStr};

#[derive(serde::Deserialize)]
/// Internal CSV row for one card of the catalog. `credit_limit` is only
/// read for credit cards; an empty `linked_balance` gets a seeded value.
struct CardRow {
    id: String,
    kind: String,
    pin: String,
    balance: String,
    credit_limit: Option<String>,
    history: bool,
    deposit_mode: String,
    owner: Option<String>,
    linked_balance: Option<String>,
}

#[derive(serde::Deserialize)]
/// Internal CSV row of a session script.
struct EventRow {
    op: String,
    arg: Option<String>,
}

/// Reads the card catalog from a CSV reader.
///
/// Supported headers:
/// `id,kind,pin,balance,credit_limit,history,deposit_mode,owner,linked_balance`.
/// `kind` is `debit` or `credit`; `deposit_mode` is `full` or `partial`.
/// Errors carry the card id for context.
///
/// # Examples
///
/// ```
/// use atm_engine::common::{chance::FixedChance, config::AtmConfig};
/// use atm_engine::io::reader::read_cards;
/// use csv::ReaderBuilder;
///
/// let data = "id,kind,pin,balance,credit_limit,history,deposit_mode,owner,linked_balance\n\
/// 1111,debit,1234,1500.00,,true,partial,I. Ivanov,3000\n";
/// let mut rdr = ReaderBuilder::new().from_reader(data.as_bytes());
/// let mut chance = FixedChance(0.5);
/// let cards: Vec<_> = read_cards(&mut rdr, &AtmConfig::default(), &mut chance).collect();
///
/// assert_eq!(cards[0].as_ref().unwrap().id(), "1111");
/// ```
pub fn read_cards<'a, R: Read, C: Chance>(
    rdr: &'a mut csv::Reader<R>,
    config: &'a AtmConfig,
    chance: &'a mut C,
) -> impl Iterator<Item = Result<CardAccount, String>> + 'a {
    rdr.deserialize::<CardRow>().map(move |res| {
        let row = res.map_err(|e| e.to_string())?;
        let id = row.id.trim().to_string();

        let balance = parse_money(&row.balance, "balance", &id)?;
        let deposit_mode = DepositMode::from_str(&row.deposit_mode)
            .map_err(|e: AtmError| format!("{e} for card {id}"))?;
        let linked = match non_empty(row.linked_balance) {
            Some(raw) => parse_money(&raw, "linked_balance", &id)?,
            None => seed_linked_balance(config, chance),
        };

        let card = match row.kind.trim().to_ascii_lowercase().as_str() {
            "debit" => {
                if balance.is_negative() {
                    return Err(format!("negative balance for debit card {id}"));
                }
                CardAccount::debit(id.clone(), row.pin.trim(), balance)
            }
            "credit" => {
                let raw = non_empty(row.credit_limit)
                    .ok_or_else(|| format!("credit card {id} missing credit_limit"))?;
                let terms = CreditTerms {
                    limit: parse_money(&raw, "credit_limit", &id)?,
                    penalty_rate: config.penalty_rate.clone(),
                };
                CardAccount::credit(id.clone(), row.pin.trim(), balance, terms)
            }
            other => return Err(format!("unknown card kind: {other} for card {id}")),
        };

        Ok(card
            .with_history(row.history)
            .with_deposit_mode(deposit_mode)
            .with_owner(row.owner.unwrap_or_default().trim())
            .with_linked_balance(linked)
            .with_history_window(config.history_window()))
    })
}

/// Reads a session script: headers `op,arg`.
///
/// Ops are `insert`, `pin`, `withdraw`, `deposit`, `transfer`, `balance`,
/// `history` and `cancel`. `transfer` takes an optional amount; `insert`,
/// `pin`, `withdraw` and `deposit` require their argument.
///
/// # Examples
///
/// ```
/// use atm_engine::io::reader::read_events;
/// use atm_engine::common::event::SessionEvent;
/// use csv::ReaderBuilder;
///
/// let data = "op,arg\ninsert,1111\npin,1234\nbalance,\n";
/// let mut rdr = ReaderBuilder::new().from_reader(data.as_bytes());
/// let events: Vec<_> = read_events(&mut rdr).collect();
///
/// assert!(matches!(events[2], Ok(SessionEvent::Balance)));
/// ```
pub fn read_events<R: Read>(
    rdr: &mut csv::Reader<R>,
) -> impl Iterator<Item = Result<SessionEvent, String>> + '_ {
    rdr.deserialize::<EventRow>().enumerate().map(|(idx, res)| {
        let row = res.map_err(|e| e.to_string())?;
        let line = idx + 1;
        let op = row.op.trim().to_ascii_lowercase();
        let arg = non_empty(row.arg);
        let required = |name: &str| {
            arg.clone()
                .ok_or_else(|| format!("{name} missing argument in script row {line}"))
        };

        match op.as_str() {
            "insert" => Ok(SessionEvent::InsertCard {
                card: required("insert")?,
            }),
            "pin" => Ok(SessionEvent::EnterPin {
                pin: required("pin")?,
            }),
            "withdraw" => Ok(SessionEvent::Withdraw {
                amount: required("withdraw")?,
            }),
            "deposit" => Ok(SessionEvent::Deposit {
                amount: required("deposit")?,
            }),
            "transfer" => Ok(SessionEvent::Transfer { amount: arg }),
            "balance" => Ok(SessionEvent::Balance),
            "history" => Ok(SessionEvent::History),
            "cancel" => Ok(SessionEvent::Cancel),
            other => Err(format!("unknown operation: {other} in script row {line}")),
        }
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_money(raw: &str, field: &str, id: &str) -> Result<Money, String> {
    Money::from_str(raw).map_err(|e| format!("invalid {field} for card {id}: {e}"))
}
