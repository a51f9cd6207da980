//! The four-currency resource ledger.
//!
//! Every mutating operation floors at zero per field instead of failing,
//! so a ledger can never go negative. Fields are unsigned and all arithmetic
//! saturates, which makes the invariant hold by construction.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Display weight of one unit of money in [`Resource::total_value`].
const MONEY_WEIGHT: u64 = 1;
/// Display weight of one unit of ammo.
const AMMO_WEIGHT: u64 = 5;
/// Display weight of one unit of food.
const FOOD_WEIGHT: u64 = 2;
/// Display weight of one unit (recruited personnel).
const UNIT_WEIGHT: u64 = 105;

/// A bundle of the four fungible currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Money.
    pub money: u32,
    /// Ammunition.
    pub ammo: u32,
    /// Food supplies.
    pub food: u32,
    /// Personnel.
    pub units: u32,
}

impl Resource {
    /// The empty ledger.
    pub const ZERO: Self = Self::new(0, 0, 0, 0);

    /// Create a ledger from its four fields.
    #[must_use]
    pub const fn new(money: u32, ammo: u32, food: u32, units: u32) -> Self {
        Self {
            money,
            ammo,
            food,
            units,
        }
    }

    /// Returns `true` if every field covers the corresponding field of `cost`.
    ///
    /// Equivalently: subtracting `cost` would not need to clamp any field.
    #[must_use]
    pub const fn can_afford(&self, cost: &Self) -> bool {
        self.money >= cost.money
            && self.ammo >= cost.ammo
            && self.food >= cost.food
            && self.units >= cost.units
    }

    /// Field-wise sum, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            money: self.money.saturating_add(other.money),
            ammo: self.ammo.saturating_add(other.ammo),
            food: self.food.saturating_add(other.food),
            units: self.units.saturating_add(other.units),
        }
    }

    /// Field-wise difference, each field floored at zero independently.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self {
            money: self.money.saturating_sub(other.money),
            ammo: self.ammo.saturating_sub(other.ammo),
            food: self.food.saturating_sub(other.food),
            units: self.units.saturating_sub(other.units),
        }
    }

    /// Multiply every field by `factor`, truncating toward zero.
    ///
    /// Used for expected-value previews. Truncation (not rounding) is part of
    /// the contract: `Resource::new(5, 5, 5, 5).scale(0.95)` is all fours.
    /// Negative or NaN factors yield zero.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let mul = |v: u32| (f64::from(v) * factor).trunc() as u32;
        Self {
            money: mul(self.money),
            ammo: mul(self.ammo),
            food: mul(self.food),
            units: mul(self.units),
        }
    }

    /// Clamp every field to the matching field of `ceiling`.
    #[must_use]
    pub fn clamp_to(self, ceiling: &Self) -> Self {
        Self {
            money: self.money.min(ceiling.money),
            ammo: self.ammo.min(ceiling.ammo),
            food: self.food.min(ceiling.food),
            units: self.units.min(ceiling.units),
        }
    }

    /// Returns `true` if no field exceeds the matching field of `ceiling`.
    #[must_use]
    pub const fn fits_within(&self, ceiling: &Self) -> bool {
        ceiling.can_afford(self)
    }

    /// Returns `true` if all four fields are zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.money == 0 && self.ammo == 0 && self.food == 0 && self.units == 0
    }

    /// Collapse the ledger into a single display score.
    ///
    /// Weights: money ×1, ammo ×5, food ×2, units ×105. Ranking only.
    #[must_use]
    pub fn total_value(&self) -> u64 {
        u64::from(self.money) * MONEY_WEIGHT
            + u64::from(self.ammo) * AMMO_WEIGHT
            + u64::from(self.food) * FOOD_WEIGHT
            + u64::from(self.units) * UNIT_WEIGHT
    }
}

impl Add for Resource {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Resource {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.saturating_add(rhs);
    }
}

/// Subtraction floors each field at zero.
impl Sub for Resource {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for Resource {
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.saturating_sub(rhs);
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "money {} / ammo {} / food {} / units {}",
            self.money, self.ammo, self.food, self.units
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_fieldwise() {
        let a = Resource::new(1, 2, 3, 4);
        let b = Resource::new(10, 20, 30, 40);
        assert_eq!(a + b, Resource::new(11, 22, 33, 44));
    }

    #[test]
    fn test_sub_clamps_each_field_independently() {
        let a = Resource::new(100, 1, 50, 0);
        let b = Resource::new(30, 5, 50, 2);
        // Ammo and units floor at zero; money is not borrowed from.
        assert_eq!(a - b, Resource::new(70, 0, 0, 0));
    }

    #[test]
    fn test_can_afford() {
        let wallet = Resource::new(500, 20, 30, 5);
        assert!(wallet.can_afford(&Resource::new(500, 20, 30, 5)));
        assert!(wallet.can_afford(&Resource::ZERO));
        assert!(!wallet.can_afford(&Resource::new(0, 21, 0, 0)));
        assert!(!wallet.can_afford(&Resource::new(0, 0, 0, 6)));
    }

    #[test]
    fn test_scale_truncates() {
        let r = Resource::new(5, 5, 5, 5);
        assert_eq!(r.scale(0.95), Resource::new(4, 4, 4, 4));
        assert_eq!(Resource::new(10, 3, 7, 1).scale(0.5), Resource::new(5, 1, 3, 0));
        assert_eq!(r.scale(-1.0), Resource::ZERO);
    }

    #[test]
    fn test_clamp_to() {
        let r = Resource::new(2000, 10, 900, 30);
        let cap = Resource::new(1200, 600, 600, 15);
        assert_eq!(r.clamp_to(&cap), Resource::new(1200, 10, 600, 15));
    }

    #[test]
    fn test_total_value_weights() {
        assert_eq!(Resource::new(1, 1, 1, 1).total_value(), 113);
        assert_eq!(Resource::new(500, 20, 30, 5).total_value(), 500 + 100 + 60 + 525);
    }

    #[test]
    fn test_add_saturates() {
        let r = Resource::new(u32::MAX, 0, 0, 0) + Resource::new(1, 0, 0, 0);
        assert_eq!(r.money, u32::MAX);
    }
}
