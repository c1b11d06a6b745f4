//! Per-jurisdiction output rounding.
//!
//! Each income-tax calculator rounds its headline figures with its own
//! policy. Bracket breakdowns, corporate tax and mortgage figures are left
//! unrounded.

use rust_decimal::{Decimal, RoundingStrategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundingPolicy {
    /// Decimal places for monetary fields.
    pub money_places: u32,
    /// Decimal places for the effective/average rate; `None` leaves it as computed.
    pub rate_places: Option<u32>,
    pub strategy: RoundingStrategy,
}

impl RoundingPolicy {
    pub const fn new(money_places: u32, rate_places: Option<u32>) -> Self {
        Self {
            money_places,
            rate_places,
            strategy: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    pub fn money(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.money_places, self.strategy)
    }

    pub fn rate(&self, value: Decimal) -> Decimal {
        match self.rate_places {
            Some(places) => value.round_dp_with_strategy(places, self.strategy),
            None => value,
        }
    }
}

pub const CANADA: RoundingPolicy = RoundingPolicy::new(2, None);
pub const FRANCE: RoundingPolicy = RoundingPolicy::new(2, Some(2));
pub const SOUTH_AFRICA: RoundingPolicy = RoundingPolicy::new(2, Some(4));
pub const UK: RoundingPolicy = RoundingPolicy::new(2, Some(4));
pub const AUSTRALIA: RoundingPolicy = RoundingPolicy::new(2, Some(4));
