use skirmish_core::{CombatSnapshot, StatusComponent, StatusContext};

use super::is_reactable;

/// Heals the carrier for `fraction` (per stack) of the damage it deals to others.
#[derive(Clone, Debug, PartialEq)]
pub struct Lifesteal {
    pub fraction: f64,
}

impl Lifesteal {
    pub fn new(fraction: f64) -> Self {
        Self { fraction }
    }
}

impl StatusComponent for Lifesteal {
    fn on_damage_dealt(&mut self, ctx: &mut StatusContext<'_>, snapshot: &CombatSnapshot) {
        if snapshot.is_self_inflicted() || !is_reactable(snapshot) {
            return;
        }
        ctx.heal(snapshot.total_damage() * self.fraction * f64::from(ctx.stacks()));
    }
}
