use skirmish_core::{AbilityBehavior, AbilityContext, Bullet, DamageFlags};
use tracing::warn;

use crate::bullets::Projectile;

/// Fires a single projectile from the caster. Instant: there is no continuation.
#[derive(Clone, Debug, PartialEq)]
pub struct Bolt {
    pub damage: f64,
    pub lifetime: f64,
    pub flags: DamageFlags,
    pub pierce: u32,
}

impl Bolt {
    pub fn new(damage: f64, lifetime: f64) -> Self {
        Self {
            damage,
            lifetime,
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
}

impl AbilityBehavior for Bolt {
    fn start_use(&mut self, ctx: &mut AbilityContext<'_>) -> bool {
        let caster = ctx.entity();
        let projectile = Projectile::new(self.damage)
            .with_flags(self.flags)
            .with_pierce(self.pierce);

        match Bullet::new(caster.id(), caster.affiliation(), self.lifetime, projectile) {
            Ok(bullet) => ctx.spawn_bullet(bullet),
            Err(err) => warn!(caster = %caster.id(), error = %err, "bolt not fired"),
        }
        false
    }
}
