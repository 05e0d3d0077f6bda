//! Projectiles with a limited lifetime.
//!
//! Movement and collision detection belong to the host. A [`Bullet`] only tracks who
//! fired it, whom it may hit and how long it lives; the host relays each collision
//! through [`Bullet::hit`] and routes the returned [`HitOutcome`] into damage
//! resolution.

use core::fmt;

use crate::entity::{DamageFlags, EntityId, Faction};
use crate::timer::{CountdownTimer, TimerError};

/// Content-supplied behavior of a bullet.
pub trait BulletBehavior: fmt::Debug {
    /// First tick after spawning.
    fn on_start(&mut self, _bullet: &BulletState) {}

    fn on_update(&mut self, _bullet: &BulletState, _dt: f64) {}

    /// The bullet touched an entity its hit mask allows.
    fn on_hit(&mut self, bullet: &BulletState, victim: EntityId) -> HitOutcome;

    /// Lifetime ran out or a hit consumed the bullet. Called once.
    fn on_expire(&mut self, _bullet: &BulletState) {}
}

/// What a bullet does to the entity it hit.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitOutcome {
    pub damage: f64,
    pub flags: DamageFlags,
    /// The bullet is destroyed by this hit.
    pub consume: bool,
}

impl HitOutcome {
    /// Deals `damage` and destroys the bullet.
    pub fn damage(damage: f64) -> Self {
        Self {
            damage,
            flags: DamageFlags::empty(),
            consume: true,
        }
    }

    /// Keeps the bullet alive after the hit.
    pub fn pass_through(mut self) -> Self {
        self.consume = false;
        self
    }

    pub fn with_flags(mut self, flags: DamageFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Shared bullet data handed to behavior hooks.
#[derive(Clone, Debug, PartialEq)]
pub struct BulletState {
    pub source: EntityId,
    pub affiliation: Faction,
    pub hit_mask: Faction,
    pub lifetime: CountdownTimer,
}

#[derive(Debug)]
pub struct Bullet {
    state: BulletState,
    behavior: Box<dyn BulletBehavior>,
    started: bool,
    expired: bool,
}

impl Bullet {
    /// Creates a bullet that may hit every faction outside `affiliation`.
    pub fn new(
        source: EntityId,
        affiliation: Faction,
        lifetime: f64,
        behavior: impl BulletBehavior + 'static,
    ) -> Result<Self, TimerError> {
        Ok(Self {
            state: BulletState {
                source,
                affiliation,
                hit_mask: affiliation.hit_mask(),
                lifetime: CountdownTimer::new(lifetime)?,
            },
            behavior: Box::new(behavior),
            started: false,
            expired: false,
        })
    }

    pub fn with_hit_mask(mut self, hit_mask: Faction) -> Self {
        self.state.hit_mask = hit_mask;
        self
    }

    pub fn state(&self) -> &BulletState {
        &self.state
    }

    pub fn source(&self) -> EntityId {
        self.state.source
    }

    pub fn can_hit(&self, target: Faction) -> bool {
        self.state.hit_mask.intersects(target)
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advances the lifetime. Returns `false` once the bullet has expired.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.expired {
            return false;
        }
        if !self.started {
            self.started = true;
            self.behavior.on_start(&self.state);
        }

        self.behavior.on_update(&self.state, dt);
        if self.state.lifetime.tick(dt) {
            self.expire();
            return false;
        }
        true
    }

    /// Relays a collision with an entity of faction `victim_faction`.
    ///
    /// Returns `None` when the hit mask excludes the victim or the bullet is gone.
    pub fn hit(&mut self, victim: EntityId, victim_faction: Faction) -> Option<HitOutcome> {
        if self.expired || !self.can_hit(victim_faction) {
            return None;
        }

        let outcome = self.behavior.on_hit(&self.state, victim);
        if outcome.consume {
            self.expire();
        }
        Some(outcome)
    }

    /// Destroys the bullet, notifying its behavior once.
    pub fn expire(&mut self) {
        if !self.expired {
            self.expired = true;
            self.behavior.on_expire(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pellet(f64);

    impl BulletBehavior for Pellet {
        fn on_hit(&mut self, _bullet: &BulletState, _victim: EntityId) -> HitOutcome {
            HitOutcome::damage(self.0)
        }
    }

    #[test]
    fn hit_mask_filters_own_faction() {
        let mut bullet = Bullet::new(EntityId(1), Faction::PLAYER, 1.0, Pellet(4.0)).unwrap();

        assert_eq!(bullet.hit(EntityId(2), Faction::PLAYER), None);
        assert_eq!(
            bullet.hit(EntityId(3), Faction::ENEMY),
            Some(HitOutcome::damage(4.0))
        );
        assert!(bullet.is_expired());
        assert_eq!(bullet.hit(EntityId(4), Faction::ENEMY), None);
    }

    #[test]
    fn expires_when_lifetime_runs_out() {
        let mut bullet = Bullet::new(EntityId(1), Faction::ENEMY, 0.5, Pellet(1.0)).unwrap();
        assert!(bullet.tick(0.25));
        assert!(!bullet.tick(0.25));
        assert!(bullet.is_expired());
        assert!(!bullet.tick(0.25));
    }
}
