//! Damage resolution.
//!
//! ```text
//! amount <= 0 ──────────────────────────────▶ zero snapshot, nothing else
//!      │
//!      ▼
//! refresh combat timers (victim, attacker)
//!      │
//! invincible? ── yes ───────────────────────▶ zero-damage snapshot, events still fire
//!      │ no
//!      ▼
//! shield > 0 && !IGNORE_SHIELD ─▶ shield phase (overflow carries on)
//!      │
//! damage left || PIERCE_SHIELD ─▶ health phase (death vote at 0)
//!      │
//!      ▼
//! damage_taken → victim, damage_dealt → attacker
//! ```
//!
//! `PIERCE_SHIELD` runs the health phase even when the shield absorbed the hit
//! completely, so a single hit can damage both pools with the same amount.

use tracing::trace;

use super::{CombatSnapshot, DamageFlags, Entity, EntityId};
use crate::events::EntityEvent;

/// Resolves `amount` damage against `victim`, optionally attributed to `attacker`.
///
/// The snapshot is fanned out to the victim as damage taken and to the attacker as
/// damage dealt. Commands queued by either side's statuses are applied before
/// returning.
///
/// Every hit that leaves the victim at zero health runs the death vote, including
/// hits on a victim already at zero, so `Died` can fire more than once. A vetoed
/// death that was not healed stays open to the next hit.
pub fn deal_damage(
    victim: &mut Entity,
    attacker: Option<&mut Entity>,
    amount: f64,
    flags: DamageFlags,
) -> CombatSnapshot {
    let attacker_id = attacker.as_ref().map(|a| a.id());
    if amount <= 0.0 {
        return CombatSnapshot::zero(victim.id(), attacker_id, flags);
    }

    victim.stats.refresh_combat();
    let snapshot = match attacker {
        Some(attacker) => {
            attacker.stats.refresh_combat();
            let snapshot = victim.absorb(amount, flags, attacker_id);
            victim.damage_taken(&snapshot);
            attacker.damage_dealt(&snapshot);
            attacker.flush();
            snapshot
        }
        None => {
            let snapshot = victim.absorb(amount, flags, None);
            victim.damage_taken(&snapshot);
            snapshot
        }
    };
    victim.flush();
    snapshot
}

/// Resolves damage an entity inflicts on itself.
///
/// The entity is both victim and attacker: it receives damage taken first, then
/// damage dealt.
pub fn deal_self_damage(entity: &mut Entity, amount: f64, flags: DamageFlags) -> CombatSnapshot {
    let id = entity.id();
    if amount <= 0.0 {
        return CombatSnapshot::zero(id, Some(id), flags);
    }

    entity.stats.refresh_combat();
    let snapshot = entity.absorb(amount, flags, Some(id));
    entity.damage_taken(&snapshot);
    entity.damage_dealt(&snapshot);
    entity.flush();
    snapshot
}

impl Entity {
    /// Takes damage from no particular attacker.
    pub fn take_damage(&mut self, amount: f64, flags: DamageFlags) -> CombatSnapshot {
        deal_damage(self, None, amount, flags)
    }

    /// Runs the shield and health phases and builds the snapshot.
    fn absorb(
        &mut self,
        amount: f64,
        flags: DamageFlags,
        attacker: Option<EntityId>,
    ) -> CombatSnapshot {
        let mut snapshot = CombatSnapshot::zero(self.id, attacker, flags);
        if self.stats.is_invincible() {
            trace!(entity = %self.id, amount, "damage blocked by invincibility");
            return snapshot;
        }

        let mut damage = amount;
        let mut absorbed = false;

        let shield = self.stats.shield();
        if shield > 0.0 && !flags.contains(DamageFlags::IGNORE_SHIELD) {
            if damage >= shield {
                // An exact hit is absorbed but keeps its amount for PIERCE_SHIELD.
                if damage > shield {
                    damage -= shield;
                } else {
                    absorbed = true;
                }
                self.stats.write_shield(0.0);
                snapshot.shield_damage = shield;
                self.fan_out(|status, ctx| status.shield_depleted(ctx));
                self.emit(EntityEvent::ShieldDepleted { entity: self.id });
            } else {
                absorbed = true;
                self.stats.write_shield(shield - damage);
                snapshot.shield_damage = damage;
            }
            let delay = self.stats.shield_regen_delay_max.value();
            self.stats.write_shield_regen_delay(delay);
        }

        if !absorbed || flags.contains(DamageFlags::PIERCE_SHIELD) {
            let health = self.stats.health() - damage;
            snapshot.health_damage = damage;
            if health <= 0.0 {
                self.stats.write_health(0.0);
                snapshot.victim_died = self.vote_death();
            } else {
                self.stats.write_health(health);
            }
        }

        trace!(
            entity = %self.id,
            health_damage = snapshot.health_damage,
            shield_damage = snapshot.shield_damage,
            died = snapshot.victim_died,
            "damage resolved"
        );
        snapshot
    }

    fn damage_taken(&mut self, snapshot: &CombatSnapshot) {
        self.fan_out(|status, ctx| status.damage_taken(ctx, snapshot));
        self.emit(EntityEvent::DamageTaken(*snapshot));
    }

    fn damage_dealt(&mut self, snapshot: &CombatSnapshot) {
        self.fan_out(|status, ctx| status.damage_dealt(ctx, snapshot));
        self.emit(EntityEvent::DamageDealt(*snapshot));
    }
}
