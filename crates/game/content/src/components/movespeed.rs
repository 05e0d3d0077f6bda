use skirmish_core::{StatusComponent, StatusContext};

/// Multiplies the carrier's movespeed by `factor` once per stack.
///
/// `factor` must be positive: the modifier is undone by dividing it back out.
#[derive(Clone, Debug, PartialEq)]
pub struct MovespeedModifier {
    factor: f64,
    applied: i32,
}

impl MovespeedModifier {
    pub fn new(factor: f64) -> Self {
        Self { factor, applied: 0 }
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    fn rescale(&mut self, ctx: &mut StatusContext<'_>, stacks: i32) {
        let delta = stacks - self.applied;
        if delta == 0 {
            return;
        }
        let stats = ctx.stats_mut();
        stats.movespeed = stats.movespeed.scale(self.factor.powi(delta));
        self.applied = stacks;
    }
}

impl StatusComponent for MovespeedModifier {
    fn on_apply(&mut self, ctx: &mut StatusContext<'_>) {
        let stacks = ctx.stacks();
        self.rescale(ctx, stacks);
    }

    fn on_revert(&mut self, ctx: &mut StatusContext<'_>) {
        self.rescale(ctx, 0);
    }

    fn on_stacks_changed(&mut self, ctx: &mut StatusContext<'_>, _old: i32, new: i32) {
        self.rescale(ctx, new);
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{Entity, EntityId, EntityStats, Status};

    use super::*;

    fn slow() -> Status {
        Status::new("slow", 2.0, 3, 1)
            .expect("valid status")
            .with_component(MovespeedModifier::new(0.5))
    }

    fn movespeed(entity: &Entity) -> f64 {
        entity.stats().movespeed.value()
    }

    #[test]
    fn stacks_compound_and_removal_restores() {
        let mut entity = Entity::new(EntityId(1), EntityStats::builder().movespeed(8.0).build());

        entity.add_status(slow()).expect("applies");
        assert_eq!(movespeed(&entity), 4.0);
        entity.add_status(slow()).expect("stacks");
        assert_eq!(movespeed(&entity), 2.0);

        assert_eq!(entity.remove_status("slow"), Ok(true));
        assert_eq!(movespeed(&entity), 8.0);
    }

    #[test]
    fn decay_to_zero_restores_once() {
        let mut entity = Entity::new(EntityId(1), EntityStats::builder().movespeed(8.0).build());
        entity.add_status(slow()).expect("applies");

        entity.tick(2.0);
        assert!(!entity.has_status("slow"));
        assert_eq!(movespeed(&entity), 8.0);
    }
}
