//! Compound values clamped to a `[min, max]` range.

use core::fmt;
use core::hash::{Hash, Hasher};

use super::compound::{CompoundValue, Operator, hash_value};

/// A [`CompoundValue`] whose result is clamped into `[min, max]`.
///
/// Clamping happens after the compound arithmetic; the `base`, `additive` and
/// `multiplier` fields themselves are never clamped. Keeping `min <= max` is the
/// caller's responsibility and is not checked.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoundedValue {
    pub stat: CompoundValue,
    pub min: f64,
    pub max: f64,
}

impl BoundedValue {
    pub const fn new(stat: CompoundValue, min: f64, max: f64) -> Self {
        Self { stat, min, max }
    }

    /// A bounded value whose base is also its upper bound, floored at zero.
    ///
    /// Convenient for maximum-health style stats that modifiers may only lower.
    pub const fn capped(base: f64) -> Self {
        Self::new(CompoundValue::new(base), 0.0, base)
    }

    /// Bounded only from below.
    pub const fn at_least(stat: CompoundValue, min: f64) -> Self {
        Self::new(stat, min, f64::INFINITY)
    }

    /// Returns the compound result clamped into `[min, max]`.
    pub fn value(&self) -> f64 {
        let unbounded = self.stat.value();
        // Written out instead of `f64::clamp`, which panics when `min > max`.
        if unbounded > self.max {
            self.max
        } else if unbounded < self.min {
            self.min
        } else {
            unbounded
        }
    }

    /// Returns the compound result before clamping.
    pub fn unbounded_value(&self) -> f64 {
        self.stat.value()
    }

    #[must_use]
    pub fn add(&self, amount: f64) -> Self {
        self.with_stat(self.stat.add(amount))
    }

    #[must_use]
    pub fn subtract(&self, amount: f64) -> Self {
        self.with_stat(self.stat.subtract(amount))
    }

    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        self.with_stat(self.stat.scale(factor))
    }

    #[must_use]
    pub fn unscale(&self, factor: f64) -> Self {
        self.with_stat(self.stat.unscale(factor))
    }

    /// Merges a modifier into the compound part, keeping the bounds.
    #[must_use]
    pub fn merge(&self, other: &CompoundValue, op: Operator) -> Self {
        self.with_stat(self.stat.merge(other, op))
    }

    /// Removes a previously merged modifier, keeping the bounds.
    #[must_use]
    pub fn split(&self, other: &CompoundValue, op: Operator) -> Self {
        self.with_stat(self.stat.split(other, op))
    }

    fn with_stat(&self, stat: CompoundValue) -> Self {
        Self { stat, ..*self }
    }
}

impl PartialEq for BoundedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Hash for BoundedValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(self.value(), state);
    }
}

impl fmt::Display for BoundedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} * {}) + {} {{ {} <= v <= {} }} = {}",
            self.stat.base,
            self.stat.multiplier,
            self.stat.additive,
            self.min,
            self.max,
            self.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_after_arithmetic() {
        let speed = BoundedValue::new(CompoundValue::new(5.0), 1.0, 8.0);

        assert_eq!(speed.scale(3.0).value(), 8.0);
        assert_eq!(speed.scale(0.1).value(), 1.0);
        assert_eq!(speed.add(2.0).value(), 7.0);

        // Fields keep the unclamped arithmetic.
        assert_eq!(speed.scale(3.0).unbounded_value(), 15.0);
        assert_eq!(speed.scale(3.0).stat.multiplier, 3.0);
    }

    #[test]
    fn stays_within_bounds_for_many_inputs() {
        let (min, max) = (-2.5, 40.0);
        for base in [-1000.0, -2.5, 0.0, 13.0, 40.0, 1e9] {
            for multiplier in [-3.0, 0.0, 0.5, 1.0, 7.0] {
                for additive in [-50.0, 0.0, 50.0] {
                    let bounded = BoundedValue::new(
                        CompoundValue::from_parts(base, additive, multiplier),
                        min,
                        max,
                    );
                    let v = bounded.value();
                    assert!((min..=max).contains(&v), "{bounded} escaped bounds");
                }
            }
        }
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let broken = BoundedValue::new(CompoundValue::new(5.0), 10.0, 0.0);
        assert_eq!(broken.value(), 0.0);
    }

    #[test]
    fn capped_uses_base_as_ceiling() {
        let health_max = BoundedValue::capped(100.0);
        assert_eq!(health_max.value(), 100.0);
        assert_eq!(health_max.add(50.0).value(), 100.0);
        assert_eq!(health_max.scale(0.5).value(), 50.0);
    }

    #[test]
    fn merge_and_split_keep_bounds() {
        let shield_max = BoundedValue::new(CompoundValue::new(50.0), 0.0, 75.0);
        let bonus = CompoundValue::from_parts(10.0, 5.0, 0.0);

        let boosted = shield_max.merge(&bonus, Operator::Add);
        assert_eq!(boosted.value(), 65.0);
        assert_eq!(boosted.max, 75.0);

        let restored = boosted.split(&bonus, Operator::Add);
        assert!(restored.stat.same_fields(&shield_max.stat));
    }
}
