use std::io::Write;

/// Receives finished receipts. The terminal decides what to print and when;
/// implementations only deliver the text.
pub trait ReceiptPrinter {
    fn print_receipt(&mut self, text: &str);
}

impl<P: ReceiptPrinter + ?Sized> ReceiptPrinter for &mut P {
    fn print_receipt(&mut self, text: &str) {
        (**self).print_receipt(text)
    }
}

/// Writes receipts to stdout, framed by a banner line.
#[derive(Debug, Default)]
pub struct StdoutPrinter;

impl ReceiptPrinter for StdoutPrinter {
    fn print_receipt(&mut self, text: &str) {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        // fire-and-forget
        let _ = writeln!(out, "\n--- PRINTING RECEIPT ---\n{text}");
    }
}

/// Keeps every receipt in memory.
#[derive(Debug, Default)]
pub struct MemoryPrinter {
    pub receipts: Vec<String>,
}

impl MemoryPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.receipts.last().map(String::as_str)
    }
}

impl ReceiptPrinter for MemoryPrinter {
    fn print_receipt(&mut self, text: &str) {
        self.receipts.push(text.to_string());
    }
}
