pub mod invoice;
pub mod order;
