use skirmish_core::{CombatSnapshot, Command, DamageFlags, StatusComponent, StatusContext};

use super::is_reactable;

/// Makes the carrier take `bonus` (per stack) extra damage from every hit.
///
/// The extra damage is a separate secondary hit. When the original hit had an
/// attacker other than the carrier, the extra hit is attributed to them and routed
/// through the host.
#[derive(Clone, Debug, PartialEq)]
pub struct DamageAmplifier {
    pub bonus: f64,
}

impl DamageAmplifier {
    pub fn new(bonus: f64) -> Self {
        Self { bonus }
    }
}

impl StatusComponent for DamageAmplifier {
    fn on_damage_taken(&mut self, ctx: &mut StatusContext<'_>, snapshot: &CombatSnapshot) {
        if !is_reactable(snapshot) {
            return;
        }
        let amount = snapshot.total_damage() * self.bonus * f64::from(ctx.stacks());
        if amount <= 0.0 {
            return;
        }

        let flags = snapshot.flags | DamageFlags::SECONDARY;
        match snapshot.attacker {
            Some(attacker) if attacker != ctx.entity() => {
                let target = ctx.entity();
                ctx.issue(Command::Damage {
                    target,
                    source: Some(attacker),
                    amount,
                    flags,
                });
            }
            _ => ctx.damage_self(amount, flags),
        }
    }
}
