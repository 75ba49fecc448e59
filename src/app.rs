use std::io::{Write, stdout};

use tracing::info;

use crate::{
    atm::{processor::Processor, session::AtmSession},
    common::{chance::SeededChance, config::AtmConfig, error::AppError},
    domain::catalog::CardCatalog,
    io::{printer::StdoutPrinter, reader, writer},
};

/// Runs one terminal session script against a card catalog.
///
/// `args[1]` is the script CSV (`op,arg`), `args[2]` an optional cards CSV.
/// Without it the built-in demo catalog is used and the terminal starts with
/// the demo cash amount instead of the configured one. Every screen message
/// goes to stdout as `> message`, followed by the final card summary CSV.
pub fn run<I, S>(args: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(|s| s.into()).collect();
    if args.len() < 2 {
        return Err(AppError::MissingArg);
    }
    let script_path = &args[1];

    let config = AtmConfig::from_env("ATM")?;
    let mut chance = SeededChance::new(config.seed);

    let (mut cards, cash) = match args.get(2) {
        Some(path) => (load_cards(path, &config, &mut chance)?, config.initial_cash),
        None => (CardCatalog::demo(&config, &mut chance), CardCatalog::demo_cash()),
    };
    info!(cards = cards.len(), "card catalog loaded");

    let file = std::fs::File::open(script_path)?;
    let mut script = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let session = AtmSession::new(config, chance, StdoutPrinter).with_cash(cash);
    let mut processor = Processor::new(session);

    // shared with the receipt printer
    let mut out = stdout();

    for event in reader::read_events(&mut script) {
        let event = event.map_err(AppError::Parse)?;
        let line = processor.process(&mut cards, event);
        writeln!(out, "> {line}")?;
    }
    writeln!(out)?;

    writer::write_cards(out, &cards)?;

    Ok(())
}

fn load_cards(
    path: &str,
    config: &AtmConfig,
    chance: &mut SeededChance,
) -> Result<CardCatalog, AppError> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut cards = CardCatalog::new();
    for card in reader::read_cards(&mut rdr, config, chance) {
        cards.insert(card.map_err(AppError::Parse)?);
    }
    Ok(cards)
}
