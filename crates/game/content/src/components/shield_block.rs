use skirmish_core::{CombatSnapshot, StatusComponent, StatusContext};

use super::is_reactable;

/// Refunds the shield lost to a hit, spending one stack per blocked hit.
///
/// Health damage that overflowed the shield still lands. The status is removed
/// once the last stack is spent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShieldBlock;

impl StatusComponent for ShieldBlock {
    fn on_damage_taken(&mut self, ctx: &mut StatusContext<'_>, snapshot: &CombatSnapshot) {
        if !is_reactable(snapshot) || snapshot.shield_damage <= 0.0 || ctx.stacks() <= 0 {
            return;
        }

        let stats = ctx.stats_mut();
        let shield = stats.shield() + snapshot.shield_damage;
        stats.set_shield(shield);
        ctx.consume_stack();
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{DamageFlags, Entity, EntityId, EntityStats, Status};

    use super::*;

    fn block() -> Status {
        Status::new("block", 5.0, 2, 0)
            .expect("valid status")
            .with_component(ShieldBlock)
    }

    #[test]
    fn each_stack_blocks_one_hit() {
        let mut entity = Entity::new(
            EntityId(1),
            EntityStats::builder().health(50.0).shield(20.0).build(),
        );
        entity.add_status(block()).expect("applies");
        entity.add_status(block()).expect("stacks");

        entity.take_damage(10.0, DamageFlags::empty());
        assert_eq!(entity.stats().shield(), 20.0);
        assert_eq!(entity.status("block").map(Status::stack_count), Some(1));

        entity.take_damage(10.0, DamageFlags::empty());
        assert_eq!(entity.stats().shield(), 20.0);
        assert!(!entity.has_status("block"));

        entity.take_damage(10.0, DamageFlags::empty());
        assert_eq!(entity.stats().shield(), 10.0);
    }

    #[test]
    fn overflow_still_reaches_health() {
        let mut entity = Entity::new(
            EntityId(1),
            EntityStats::builder().health(50.0).shield(20.0).build(),
        );
        entity.add_status(block()).expect("applies");

        entity.take_damage(30.0, DamageFlags::empty());
        assert_eq!(entity.stats().shield(), 20.0);
        assert_eq!(entity.stats().health(), 40.0);
    }

    #[test]
    fn shield_ignoring_damage_keeps_the_stack() {
        let mut entity = Entity::new(
            EntityId(1),
            EntityStats::builder().health(50.0).shield(20.0).build(),
        );
        entity.add_status(block()).expect("applies");

        entity.take_damage(10.0, DamageFlags::IGNORE_SHIELD);
        assert!(entity.has_status("block"));
        assert_eq!(entity.stats().health(), 40.0);
    }
}
