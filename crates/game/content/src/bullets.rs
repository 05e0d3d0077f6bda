//! Bullet behaviors.

use skirmish_core::{BulletBehavior, BulletState, DamageFlags, EntityId, HitOutcome};

/// Deals flat damage on hit. Passes through up to `pierce` victims before the
/// hit that consumes it.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub damage: f64,
    pub flags: DamageFlags,
    pierce: u32,
}

impl Projectile {
    pub fn new(damage: f64) -> Self {
        Self {
            damage,
            flags: DamageFlags::empty(),
            pierce: 0,
        }
    }

    pub fn with_flags(mut self, flags: DamageFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_pierce(mut self, pierce: u32) -> Self {
        self.pierce = pierce;
        self
    }

    /// Victims the projectile can still pass through.
    pub fn pierce(&self) -> u32 {
        self.pierce
    }
}

impl BulletBehavior for Projectile {
    fn on_hit(&mut self, _bullet: &BulletState, _victim: EntityId) -> HitOutcome {
        let outcome = HitOutcome::damage(self.damage).with_flags(self.flags);
        if self.pierce > 0 {
            self.pierce -= 1;
            outcome.pass_through()
        } else {
            outcome
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Bullet, Faction};

    use super::*;

    #[test]
    fn pierces_then_is_consumed() {
        let mut bullet = Bullet::new(
            EntityId(0),
            Faction::PLAYER,
            2.0,
            Projectile::new(6.0).with_pierce(1),
        )
        .expect("valid lifetime");

        let first = bullet.hit(EntityId(1), Faction::ENEMY).expect("enemy is hittable");
        assert_eq!(first.damage, 6.0);
        assert!(!first.consume);
        assert!(!bullet.is_expired());

        let second = bullet.hit(EntityId(2), Faction::ENEMY).expect("enemy is hittable");
        assert!(second.consume);
        assert!(bullet.is_expired());
        assert_eq!(bullet.hit(EntityId(3), Faction::ENEMY), None);
    }

    #[test]
    fn own_faction_is_ignored() {
        let mut bullet = Bullet::new(EntityId(0), Faction::PLAYER, 2.0, Projectile::new(6.0))
            .expect("valid lifetime");
        assert_eq!(bullet.hit(EntityId(4), Faction::PLAYER), None);
        assert!(!bullet.is_expired());
    }
}
