//! Price size tiers
//!
//! The price sits in a fixed-width slot on the label. The number of integer
//! digits picks a font size and a horizontal nudge so that `$7.00` fills the
//! slot and `$1200.00` still fits inside it.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Which integer digit counts a tier applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigitBucket {
    Exactly(u32),
    AtLeast(u32),
}

impl DigitBucket {
    pub fn matches(self, digits: u32) -> bool {
        match self {
            DigitBucket::Exactly(n) => digits == n,
            DigitBucket::AtLeast(n) => digits >= n,
        }
    }
}

/// Font size (dots) and horizontal offset (dots) for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTier {
    pub digits: DigitBucket,
    pub font_size: u32,
    pub offset: i32,
}

/// Standard table for a 4"x2" label at 203 dpi
pub const STANDARD_TIERS: [PriceTier; 4] = [
    PriceTier {
        digits: DigitBucket::Exactly(1),
        font_size: 120,
        offset: 40,
    },
    PriceTier {
        digits: DigitBucket::Exactly(2),
        font_size: 100,
        offset: 20,
    },
    PriceTier {
        digits: DigitBucket::Exactly(3),
        font_size: 90,
        offset: 0,
    },
    PriceTier {
        digits: DigitBucket::AtLeast(4),
        font_size: 70,
        offset: -20,
    },
];

/// Ordered bucket → (size, offset) table.
///
/// Rows are scanned in order; a digit count no row matches falls through
/// to the last row.
#[derive(Debug, Clone)]
pub struct TierTable {
    rows: Vec<PriceTier>,
}

impl TierTable {
    /// Build a table from ordered rows. Returns `None` for an empty table.
    pub fn new(rows: Vec<PriceTier>) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        Some(Self { rows })
    }

    pub fn rows(&self) -> &[PriceTier] {
        &self.rows
    }

    /// Tier for a given integer digit count
    pub fn for_digits(&self, digits: u32) -> PriceTier {
        self.rows
            .iter()
            .find(|row| row.digits.matches(digits))
            .or_else(|| self.rows.last())
            .copied()
            .unwrap_or(STANDARD_TIERS[STANDARD_TIERS.len() - 1])
    }

    /// Tier for a price
    pub fn select(&self, price: Decimal) -> PriceTier {
        self.for_digits(integer_digits(price))
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            rows: STANDARD_TIERS.to_vec(),
        }
    }
}

/// Number of digits in `floor(|price|)`; prices below one count as one digit
pub fn integer_digits(price: Decimal) -> u32 {
    let whole = price.abs().trunc().to_u128().unwrap_or(u128::MAX);
    whole.checked_ilog10().map_or(1, |log| log + 1)
}
