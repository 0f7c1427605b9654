use crate::abstract_trait::invoice::InvoiceGeneratorTrait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

pub const INVOICE_PREFIX: &str = "INV/";

/// Issues `INV/<epoch millis>` identifiers.
///
/// Values are strictly increasing within one generator: when two calls land
/// in the same millisecond, or the clock steps back, the later call gets the
/// previous value plus one.
#[derive(Debug, Default)]
pub struct TimestampInvoiceGenerator {
    last: AtomicI64,
}

impl TimestampInvoiceGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_millis(&self, now: i64) -> i64 {
        let prev = match self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            }) {
            Ok(prev) | Err(prev) => prev,
        };

        now.max(prev + 1)
    }
}

impl InvoiceGeneratorTrait for TimestampInvoiceGenerator {
    fn generate(&self) -> String {
        let millis = self.next_millis(Utc::now().timestamp_millis());
        format!("{INVOICE_PREFIX}{millis}")
    }
}
