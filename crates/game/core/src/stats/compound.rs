//! Compound values of the form `(base × multiplier) + additive`.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Add, Div, Mul, Sub};

/// Field-wise operator used to merge or split two compound values.
///
/// `merge` applies the operator, `split` applies its inverse, so
/// `a.merge(&b, op).split(&b, op)` restores `a` field by field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Operator {
    Add,
    Multiply,
}

impl Operator {
    /// Applies the operator to a pair of operands.
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left + right,
            Self::Multiply => left * right,
        }
    }

    /// Applies the inverse of the operator.
    pub fn invert(self, left: f64, right: f64) -> f64 {
        match self {
            Self::Add => left - right,
            Self::Multiply => left / right,
        }
    }
}

/// A stat value computed as `(base × multiplier) + additive`.
///
/// The value is never cached: [`CompoundValue::value`] recomputes it from the three
/// fields, so writing a field is observable immediately.
///
/// Arithmetic helpers (`add`, `scale`, ...) and the `+ - × ÷` operators are
/// copy-on-write: they return a new value and leave the receiver untouched, which
/// lets derived stats ("base + equipment bonus") be built without aliasing the
/// shared base stat.
///
/// Equality and hashing are defined on [`CompoundValue::value`]: two values with
/// different fields but the same result compare equal.
///
/// # Example
/// ```
/// # use skirmish_core::stats::CompoundValue;
/// let speed = CompoundValue::new(4.0);
/// let hasted = speed.scale(1.5).add(1.0);
///
/// assert_eq!(speed.value(), 4.0);
/// assert_eq!(hasted.value(), 7.0);
/// ```
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompoundValue {
    /// Starting value affected by the multiplier.
    pub base: f64,
    /// Added after the multiplier is applied.
    pub additive: f64,
    /// Applied to the base before the additive is added.
    pub multiplier: f64,
}

impl CompoundValue {
    /// Creates a value with the given base, no additive and a multiplier of one.
    pub const fn new(base: f64) -> Self {
        Self {
            base,
            additive: 0.0,
            multiplier: 1.0,
        }
    }

    /// Creates a value from all three fields.
    pub const fn from_parts(base: f64, additive: f64, multiplier: f64) -> Self {
        Self {
            base,
            additive,
            multiplier,
        }
    }

    /// Returns `(base × multiplier) + additive`.
    #[inline]
    pub fn value(&self) -> f64 {
        self.base * self.multiplier + self.additive
    }

    /// Returns a copy with `amount` added to the additive term.
    #[must_use]
    pub fn add(&self, amount: f64) -> Self {
        Self {
            additive: self.additive + amount,
            ..*self
        }
    }

    /// Returns a copy with `amount` subtracted from the additive term.
    #[must_use]
    pub fn subtract(&self, amount: f64) -> Self {
        Self {
            additive: self.additive - amount,
            ..*self
        }
    }

    /// Returns a copy with the multiplier scaled by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            multiplier: self.multiplier * factor,
            ..*self
        }
    }

    /// Returns a copy with the multiplier divided by `factor`.
    #[must_use]
    pub fn unscale(&self, factor: f64) -> Self {
        Self {
            multiplier: self.multiplier / factor,
            ..*self
        }
    }

    /// Combines two values field by field with an arbitrary binary function.
    #[must_use]
    pub fn combine(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            base: f(self.base, other.base),
            additive: f(self.additive, other.additive),
            multiplier: f(self.multiplier, other.multiplier),
        }
    }

    /// Combines two values field by field with `op`.
    #[must_use]
    pub fn merge(&self, other: &Self, op: Operator) -> Self {
        self.combine(other, |l, r| op.apply(l, r))
    }

    /// Removes a previously merged value by applying the inverse of `op`.
    #[must_use]
    pub fn split(&self, other: &Self, op: Operator) -> Self {
        self.combine(other, |l, r| op.invert(l, r))
    }

    /// Field-wise equality, as opposed to the value equality of `==`.
    pub fn same_fields(&self, other: &Self) -> bool {
        self.base == other.base
            && self.additive == other.additive
            && self.multiplier == other.multiplier
    }
}

impl Default for CompoundValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl From<f64> for CompoundValue {
    fn from(base: f64) -> Self {
        Self::new(base)
    }
}

impl PartialEq for CompoundValue {
    fn eq(&self, other: &Self) -> bool {
        self.value() == other.value()
    }
}

impl Hash for CompoundValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_value(self.value(), state);
    }
}

/// Hashes a float so that values comparing equal hash equally (`0.0 == -0.0`).
pub(crate) fn hash_value<H: Hasher>(value: f64, state: &mut H) {
    let normalized = if value == 0.0 { 0.0 } else { value };
    normalized.to_bits().hash(state);
}

impl Add<f64> for CompoundValue {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        CompoundValue::add(&self, rhs)
    }
}

impl Sub<f64> for CompoundValue {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        self.subtract(rhs)
    }
}

impl Mul<f64> for CompoundValue {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.scale(rhs)
    }
}

impl Div<f64> for CompoundValue {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        self.unscale(rhs)
    }
}

impl fmt::Display for CompoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({} * {}) + {} = {}",
            self.base,
            self.multiplier,
            self.additive,
            self.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &CompoundValue) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn defaults_to_unit_multiplier() {
        let value = CompoundValue::default();
        assert_eq!(value.base, 0.0);
        assert_eq!(value.additive, 0.0);
        assert_eq!(value.multiplier, 1.0);
    }

    #[test]
    fn value_is_base_times_multiplier_plus_additive() {
        let value = CompoundValue::from_parts(10.0, 5.0, 2.0);
        assert_eq!(value.value(), 25.0);

        let mut value = value;
        value.multiplier = 3.0;
        assert_eq!(value.value(), 35.0);
    }

    #[test]
    fn arithmetic_never_mutates_receiver() {
        let base = CompoundValue::new(10.0);

        let added = base.add(4.0);
        let subtracted = base.subtract(4.0);
        let scaled = base.scale(2.0);
        let unscaled = base.unscale(2.0);

        assert!(base.same_fields(&CompoundValue::new(10.0)));
        assert_eq!(added.value(), 14.0);
        assert_eq!(subtracted.value(), 6.0);
        assert_eq!(scaled.value(), 20.0);
        assert_eq!(unscaled.value(), 5.0);
    }

    #[test]
    fn operators_match_named_helpers() {
        let base = CompoundValue::new(8.0);
        assert!((base + 2.0).same_fields(&base.add(2.0)));
        assert!((base - 2.0).same_fields(&base.subtract(2.0)));
        assert!((base * 2.0).same_fields(&base.scale(2.0)));
        assert!((base / 2.0).same_fields(&base.unscale(2.0)));
    }

    #[test]
    fn merge_is_field_wise() {
        let a = CompoundValue::from_parts(10.0, 2.0, 1.0);
        let b = CompoundValue::from_parts(5.0, 1.0, 0.5);

        let merged = a.merge(&b, Operator::Add);
        assert!(merged.same_fields(&CompoundValue::from_parts(15.0, 3.0, 1.5)));

        let product = a.merge(&b, Operator::Multiply);
        assert!(product.same_fields(&CompoundValue::from_parts(50.0, 2.0, 0.5)));
    }

    #[test]
    fn split_undoes_merge() {
        let a = CompoundValue::from_parts(12.0, -3.0, 1.25);
        let b = CompoundValue::from_parts(4.0, 0.5, 0.25);

        for op in [Operator::Add, Operator::Multiply] {
            let restored = a.merge(&b, op).split(&b, op);
            assert!(restored.same_fields(&a), "{op} round trip changed fields");
        }
    }

    #[test]
    fn equality_uses_computed_value() {
        let a = CompoundValue::from_parts(10.0, 0.0, 1.0);
        let b = CompoundValue::from_parts(4.0, 2.0, 2.0);

        assert!(!a.same_fields(&b));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
        assert_ne!(a, a.add(1.0));
    }

    #[test]
    fn negative_zero_hashes_like_zero() {
        let positive = CompoundValue::new(0.0);
        let negative = CompoundValue::from_parts(0.0, -0.0, 1.0).scale(-1.0);
        assert_eq!(positive, negative);
        assert_eq!(hash_of(&positive), hash_of(&negative));
    }
}
