//! Stat arithmetic.
//!
//! Every tunable number on an entity (maximum health, regeneration rates, movement
//! speed) is a compound value `(base × multiplier) + additive`, optionally clamped.
//!
//! ```text
//! [ CompoundValue ]  base, additive, multiplier → value()
//!        ↓
//! [ BoundedValue ]   clamp(value(), min, max)
//! ```
//!
//! Modifiers are composed without destroying either operand: `merge` applies a
//! field-wise [`Operator`] and `split` removes it again.

pub mod bounded;
pub mod compound;

pub use bounded::BoundedValue;
pub use compound::{CompoundValue, Operator};
