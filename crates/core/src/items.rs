//! Items

use rust_decimal::Decimal;

/// Anything that contributes `unit_price × quantity` to a subtotal.
///
/// Cart items price against the product they reference; order items price
/// against the snapshot taken when the order was created.
pub trait PricedLine {
    /// Unit price charged for this line.
    fn unit_price(&self) -> Decimal;

    /// Number of units on this line.
    fn quantity(&self) -> u32;

    /// Price of the whole line.
    fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity())
    }
}

/// A bare priced line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Line {
    unit_price: Decimal,
    quantity: u32,
}

impl Line {
    /// Creates a new line with the given unit price and quantity
    pub fn new(unit_price: Decimal, quantity: u32) -> Self {
        Self {
            unit_price,
            quantity,
        }
    }
}

impl PricedLine for Line {
    fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl<L: PricedLine + ?Sized> PricedLine for &L {
    fn unit_price(&self) -> Decimal {
        (**self).unit_price()
    }

    fn quantity(&self) -> u32 {
        (**self).quantity()
    }
}
