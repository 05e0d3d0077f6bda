use skirmish_core::{StatusComponent, StatusContext};

/// Makes the carrier invincible for as long as the status lasts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Invulnerable;

impl StatusComponent for Invulnerable {
    fn on_apply(&mut self, ctx: &mut StatusContext<'_>) {
        ctx.stats_mut().set_invincible(true);
    }

    fn on_revert(&mut self, ctx: &mut StatusContext<'_>) {
        ctx.stats_mut().set_invincible(false);
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{DamageFlags, Entity, EntityId, EntityStats, Status};

    use super::*;

    #[test]
    fn invincibility_ends_with_the_status() {
        let mut entity = Entity::new(EntityId(1), EntityStats::builder().build());
        let status = Status::new("bubble", 1.0, 1, -1)
            .expect("valid status")
            .with_component(Invulnerable);
        entity.add_status(status).expect("applies");

        assert_eq!(entity.take_damage(30.0, DamageFlags::empty()).total_damage(), 0.0);
        assert_eq!(entity.stats().health(), 100.0);

        entity.tick(1.0);
        assert!(!entity.is_invincible());
        entity.take_damage(30.0, DamageFlags::empty());
        assert_eq!(entity.stats().health(), 70.0);
    }

    #[test]
    fn overlapping_sources_are_counted() {
        let mut entity = Entity::new(EntityId(1), EntityStats::builder().build());
        entity.set_invincible(true);
        let status = Status::new("bubble", 1.0, 1, -1)
            .expect("valid status")
            .with_component(Invulnerable);
        entity.add_status(status).expect("applies");

        entity.remove_status("bubble").expect("valid name");
        assert!(entity.is_invincible());
    }
}
