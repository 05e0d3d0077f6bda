//! Combat vitals of an entity.

use crate::config::GameConfig;
use crate::stats::{BoundedValue, CompoundValue};

use super::Faction;

/// Health, shield and movement numbers of one entity.
///
/// Current health and shield are only writable through setters that keep them inside
/// `[0, max]`. The tunable stats (`*_max`, regeneration, movespeed) are plain public
/// fields: status components modify them with `merge`/`split` and must undo their
/// change on revert.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityStats {
    pub affiliation: Faction,

    health: f64,
    pub health_max: BoundedValue,
    /// Health restored per second while alive.
    pub health_regen: CompoundValue,

    shield: f64,
    pub shield_max: BoundedValue,
    /// Shield restored per second once the regen delay has elapsed.
    pub shield_regen: CompoundValue,
    shield_regen_delay: f64,
    /// Seconds the shield waits after a hit before regenerating.
    pub shield_regen_delay_max: BoundedValue,

    invincible_count: i32,
    pub movespeed: BoundedValue,

    combat_timer: f64,
    pub combat_timer_max: f64,
}

impl EntityStats {
    pub fn builder() -> EntityStatsBuilder {
        EntityStatsBuilder::default()
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    /// Sets current health, clamped to `[0, health_max]`.
    pub fn set_health(&mut self, health: f64) {
        self.health = clamp_resource(health, self.health_max.value());
    }

    pub fn health_percentage(&self) -> f64 {
        ratio(self.health, self.health_max.value())
    }

    pub fn shield(&self) -> f64 {
        self.shield
    }

    /// Sets current shield, clamped to `[0, shield_max]`.
    pub fn set_shield(&mut self, shield: f64) {
        self.shield = clamp_resource(shield, self.shield_max.value());
    }

    pub fn shield_percentage(&self) -> f64 {
        ratio(self.shield, self.shield_max.value())
    }

    /// Seconds left before the shield starts regenerating.
    pub fn shield_regen_delay(&self) -> f64 {
        self.shield_regen_delay
    }

    pub fn set_shield_regen_delay(&mut self, delay: f64) {
        self.shield_regen_delay = delay.max(0.0);
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_count > 0
    }

    /// Reference-counted: every `true` must be matched by a `false` before the
    /// entity becomes vulnerable again. Extra `false` calls are ignored.
    pub fn set_invincible(&mut self, invincible: bool) {
        if invincible {
            self.invincible_count += 1;
        } else {
            self.invincible_count = (self.invincible_count - 1).max(0);
        }
    }

    pub fn combat_timer(&self) -> f64 {
        self.combat_timer
    }

    pub fn in_combat(&self) -> bool {
        self.combat_timer > 0.0
    }

    /// Enters or extends combat for `combat_timer_max` seconds.
    pub fn refresh_combat(&mut self) {
        self.combat_timer = self.combat_timer_max;
    }

    pub(crate) fn decay_combat(&mut self, dt: f64) {
        self.combat_timer = (self.combat_timer - dt).max(0.0);
    }

    /// Pulls health and shield back under their maxima after a stat change.
    pub(crate) fn clamp_resources(&mut self) {
        self.set_health(self.health);
        self.set_shield(self.shield);
        self.shield_regen_delay = self.shield_regen_delay.max(0.0);
    }

    /// Raw write used by damage resolution, which clamps on its own terms.
    pub(crate) fn write_health(&mut self, health: f64) {
        self.health = health;
    }

    pub(crate) fn write_shield(&mut self, shield: f64) {
        self.shield = shield;
    }

    pub(crate) fn write_shield_regen_delay(&mut self, delay: f64) {
        self.shield_regen_delay = delay;
    }
}

impl Default for EntityStats {
    fn default() -> Self {
        EntityStatsBuilder::default().build()
    }
}

fn clamp_resource(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

/// Builder for [`EntityStats`].
///
/// Health and shield start full. Maxima are given as plain numbers and become
/// [`BoundedValue::capped`] stats, so modifiers can lower them but not raise them
/// past the configured value; set the field directly after building for other bounds.
#[derive(Clone, Debug)]
pub struct EntityStatsBuilder {
    affiliation: Faction,
    health_max: f64,
    health_regen: f64,
    shield_max: f64,
    shield_regen: f64,
    shield_regen_delay_max: f64,
    movespeed: f64,
    combat_timer_max: f64,
}

impl Default for EntityStatsBuilder {
    fn default() -> Self {
        Self {
            affiliation: Faction::NEUTRAL,
            health_max: 100.0,
            health_regen: 0.0,
            shield_max: 0.0,
            shield_regen: 0.0,
            shield_regen_delay_max: 0.0,
            movespeed: 5.0,
            combat_timer_max: GameConfig::DEFAULT_COMBAT_TIMER_MAX,
        }
    }
}

impl EntityStatsBuilder {
    pub fn affiliation(mut self, affiliation: Faction) -> Self {
        self.affiliation = affiliation;
        self
    }

    pub fn health(mut self, max: f64) -> Self {
        self.health_max = max;
        self
    }

    pub fn health_regen(mut self, per_second: f64) -> Self {
        self.health_regen = per_second;
        self
    }

    pub fn shield(mut self, max: f64) -> Self {
        self.shield_max = max;
        self
    }

    pub fn shield_regen(mut self, per_second: f64, delay: f64) -> Self {
        self.shield_regen = per_second;
        self.shield_regen_delay_max = delay;
        self
    }

    pub fn movespeed(mut self, speed: f64) -> Self {
        self.movespeed = speed;
        self
    }

    pub fn combat_timer_max(mut self, seconds: f64) -> Self {
        self.combat_timer_max = seconds;
        self
    }

    /// Takes the combat timer length from a game configuration.
    pub fn config(self, config: &GameConfig) -> Self {
        self.combat_timer_max(config.combat_timer_max)
    }

    pub fn build(self) -> EntityStats {
        let health_max = BoundedValue::capped(self.health_max.max(0.0));
        let shield_max = BoundedValue::capped(self.shield_max.max(0.0));

        EntityStats {
            affiliation: self.affiliation,
            health: health_max.value(),
            health_max,
            health_regen: CompoundValue::new(self.health_regen),
            shield: shield_max.value(),
            shield_max,
            shield_regen: CompoundValue::new(self.shield_regen),
            shield_regen_delay: 0.0,
            shield_regen_delay_max: BoundedValue::at_least(
                CompoundValue::new(self.shield_regen_delay_max),
                0.0,
            ),
            invincible_count: 0,
            movespeed: BoundedValue::at_least(CompoundValue::new(self.movespeed), 0.0),
            combat_timer: 0.0,
            combat_timer_max: self.combat_timer_max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_starts_full() {
        let stats = EntityStats::builder().health(80.0).shield(20.0).build();
        assert_eq!(stats.health(), 80.0);
        assert_eq!(stats.shield(), 20.0);
        assert!(stats.is_alive());
        assert!(!stats.in_combat());
    }

    #[test]
    fn setters_clamp_to_maxima() {
        let mut stats = EntityStats::builder().health(50.0).shield(10.0).build();

        stats.set_health(500.0);
        stats.set_shield(-3.0);
        assert_eq!(stats.health(), 50.0);
        assert_eq!(stats.shield(), 0.0);

        stats.health_max = stats.health_max.scale(0.5);
        stats.clamp_resources();
        assert_eq!(stats.health(), 25.0);
    }

    #[test]
    fn invincibility_is_reference_counted() {
        let mut stats = EntityStats::default();

        stats.set_invincible(true);
        stats.set_invincible(true);
        stats.set_invincible(false);
        assert!(stats.is_invincible());

        stats.set_invincible(false);
        stats.set_invincible(false);
        assert!(!stats.is_invincible());

        stats.set_invincible(true);
        assert!(stats.is_invincible());
    }

    #[test]
    fn combat_timer_decays_to_zero() {
        let mut stats = EntityStats::builder().combat_timer_max(2.0).build();
        stats.refresh_combat();
        assert!(stats.in_combat());

        stats.decay_combat(1.5);
        assert!(stats.in_combat());
        stats.decay_combat(1.5);
        assert_eq!(stats.combat_timer(), 0.0);
        assert!(!stats.in_combat());
    }
}
