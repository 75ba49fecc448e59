use crate::{
    atm::session::AtmSession,
    common::{chance::Chance, error::AtmError, event::SessionEvent},
    domain::catalog::CardCatalog,
    io::printer::ReceiptPrinter,
};

/// Drives a terminal from a stream of [`SessionEvent`]s, turning every
/// outcome into the line the user would see on screen.
#[derive(Debug)]
pub struct Processor<C, P> {
    session: AtmSession<C, P>,
}

impl<C: Chance, P: ReceiptPrinter> Processor<C, P> {
    pub fn new(session: AtmSession<C, P>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &AtmSession<C, P> {
        &self.session
    }

    pub fn process(&mut self, cards: &mut CardCatalog, event: SessionEvent) -> String {
        let session = &mut self.session;
        match event {
            SessionEvent::InsertCard { card } => render(session.insert_card(cards, &card)),
            SessionEvent::EnterPin { pin } => session.process_pin(cards, &pin).to_string(),
            SessionEvent::Withdraw { amount } => render(session.perform_withdrawal(cards, &amount)),
            SessionEvent::Deposit { amount } => render(session.perform_deposit(cards, &amount)),
            SessionEvent::Transfer { amount } => {
                render(session.perform_transfer(cards, amount.as_deref()))
            }
            SessionEvent::Balance => render(session.request_balance(cards)),
            SessionEvent::History => render(session.request_history(cards)),
            SessionEvent::Cancel => session.cancel_and_eject(),
        }
    }
}

fn render(result: Result<String, AtmError>) -> String {
    result.unwrap_or_else(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atm::test_support::{catalog, money, session};

    fn event_script() -> Vec<SessionEvent> {
        vec![
            SessionEvent::Balance,
            SessionEvent::InsertCard {
                card: "1111-2222-3333-4444".into(),
            },
            SessionEvent::EnterPin { pin: "1234".into() },
            SessionEvent::Withdraw {
                amount: "500".into(),
            },
            SessionEvent::Deposit { amount: "x".into() },
            SessionEvent::Transfer { amount: None },
            SessionEvent::Cancel,
        ]
    }

    #[test]
    fn processes_script_into_screen_lines() {
        let mut cards = catalog();
        let mut processor = Processor::new(session());

        let lines: Vec<String> = event_script()
            .into_iter()
            .map(|event| processor.process(&mut cards, event))
            .collect();

        assert_eq!(
            lines,
            vec![
                "Insert a card first.",
                "Card read. Enter your PIN.",
                "PIN accepted.",
                "Dispensed: 500.00. Remaining on card: 1000.00",
                "Invalid amount format.",
                "An amount is required for a partial transfer.",
                "Card 1111-2222-3333-4444 returned.",
            ]
        );
        assert_eq!(processor.session().cash(), money("24500.00"));
        assert_eq!(processor.session().printer().receipts.len(), 1);
    }
}
