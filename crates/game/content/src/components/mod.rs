//! Reusable status components.
//!
//! Each component is a small unit of behavior; statuses combine them. Components
//! scale with the owning status' stack count unless noted otherwise.

mod amplifier;
mod damage_over_time;
mod invulnerable;
mod lifesteal;
mod movespeed;
mod shield_block;
mod undying;

pub use amplifier::DamageAmplifier;
pub use damage_over_time::DamageOverTime;
pub use invulnerable::Invulnerable;
pub use lifesteal::Lifesteal;
pub use movespeed::MovespeedModifier;
pub use shield_block::ShieldBlock;
pub use undying::Undying;

use skirmish_core::CombatSnapshot;
use skirmish_core::DamageFlags;

/// Damage that reactive components answer to.
///
/// Secondary damage (produced by another reaction) and zero-damage snapshots are
/// skipped.
pub(crate) fn is_reactable(snapshot: &CombatSnapshot) -> bool {
    !snapshot.flags.contains(DamageFlags::SECONDARY) && snapshot.total_damage() > 0.0
}
