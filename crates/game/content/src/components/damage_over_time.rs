use skirmish_core::{Command, DamageFlags, EntityId, StatusComponent, StatusContext};

/// Damages the carrier every tick, `per_second` per stack.
///
/// With a `source` the damage is routed through the host and attributed to that
/// entity, so its damage-dealt hooks (lifesteal and the like) fire. Without one it
/// is resolved locally with no attacker.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageOverTime {
    pub per_second: f64,
    pub flags: DamageFlags,
    pub source: Option<EntityId>,
}

impl DamageOverTime {
    pub fn new(per_second: f64) -> Self {
        Self {
            per_second,
            flags: DamageFlags::empty(),
            source: None,
        }
    }

    pub fn with_flags(mut self, flags: DamageFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

impl StatusComponent for DamageOverTime {
    fn on_update(&mut self, ctx: &mut StatusContext<'_>, dt: f64) {
        let amount = self.per_second * f64::from(ctx.stacks()) * dt;
        if amount <= 0.0 {
            return;
        }

        match self.source {
            Some(source) if source != ctx.entity() => {
                let target = ctx.entity();
                ctx.issue(Command::Damage {
                    target,
                    source: Some(source),
                    amount,
                    flags: self.flags,
                });
            }
            _ => ctx.damage_self(amount, self.flags),
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Entity, EntityStats, Status};

    use super::*;

    fn poisoned(component: DamageOverTime) -> Entity {
        let mut entity = Entity::new(EntityId(3), EntityStats::builder().health(100.0).build());
        let status = Status::new("poison", 10.0, 5, -1)
            .expect("valid status")
            .with_component(component);
        entity.add_status(status).expect("status applies");
        entity
    }

    #[test]
    fn ticks_scale_with_stacks() {
        let mut entity = poisoned(DamageOverTime::new(4.0));
        entity.tick(0.5);
        assert_eq!(entity.stats().health(), 98.0);

        entity.set_stack_count("poison", 3);
        entity.tick(0.5);
        assert_eq!(entity.stats().health(), 92.0);
    }

    #[test]
    fn sourced_damage_is_routed_through_the_host() {
        let mut entity = poisoned(DamageOverTime::new(2.0).with_source(EntityId(9)));
        entity.tick(1.0);

        assert_eq!(entity.stats().health(), 100.0);
        let commands = entity.drain_commands();
        assert!(matches!(
            commands.as_slice(),
            [Command::Damage { target: EntityId(3), source: Some(EntityId(9)), amount, .. }]
                if *amount == 2.0
        ));
    }
}
