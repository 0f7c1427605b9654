use std::sync::Arc;

pub type DynInvoiceGenerator = Arc<dyn InvoiceGeneratorTrait + Send + Sync>;

pub trait InvoiceGeneratorTrait {
    /// Issues a fresh invoice identifier. Never fails.
    fn generate(&self) -> String;
}
