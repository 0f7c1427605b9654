use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for monetary amounts.
pub const CURRENCY_SCALE: u32 = 2;

/// Exclusive upper bound for any stored amount, matching `NUMERIC(18,2)`.
pub const AMOUNT_LIMIT: Decimal = Decimal::from_parts(0x6FC1_0000, 0x0023_86F2, 0, false, 0);

pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// A line amount or order total that does not fit the amount columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountOverflow {
    pub product_id: String,
}

impl AmountOverflow {
    pub fn message(&self) -> String {
        format!(
            "products: amount for {} must be less than {AMOUNT_LIMIT}",
            self.product_id
        )
    }
}

fn within_limit(amount: Decimal) -> Option<Decimal> {
    (amount < AMOUNT_LIMIT).then_some(amount)
}

/// A requested line resolved against inventory, with its unit price snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: String,
    pub qty: Decimal,
    pub price: Decimal,
    pub amount: Decimal,
}

impl PricedLine {
    pub fn new(
        product_id: impl Into<String>,
        qty: Decimal,
        price: Decimal,
    ) -> Result<Self, AmountOverflow> {
        let product_id = product_id.into();
        match qty.checked_mul(price).map(round_currency).and_then(within_limit) {
            Some(amount) => Ok(Self {
                product_id,
                qty,
                price,
                amount,
            }),
            None => Err(AmountOverflow { product_id }),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricedOrder {
    pub items: Vec<PricedLine>,
    /// Product ids dropped because their stock was zero.
    pub excluded: Vec<String>,
    pub total: Decimal,
}

impl PricedOrder {
    /// Adds the line unless the running total would leave the amount range.
    pub fn push(&mut self, line: PricedLine) -> Result<(), AmountOverflow> {
        self.total = self
            .total
            .checked_add(line.amount)
            .and_then(within_limit)
            .ok_or_else(|| AmountOverflow {
                product_id: line.product_id.clone(),
            })?;
        self.items.push(line);
        Ok(())
    }

    pub fn exclude(&mut self, product_id: impl Into<String>) {
        self.excluded.push(product_id.into());
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
