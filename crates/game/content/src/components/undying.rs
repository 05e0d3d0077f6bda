use skirmish_core::{StatusComponent, StatusContext};

/// Cancels the first death after the status is applied and heals the carrier.
#[derive(Clone, Debug, PartialEq)]
pub struct Undying {
    heal: f64,
    spent: bool,
}

impl Undying {
    pub fn new(heal: f64) -> Self {
        Self { heal, spent: false }
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }
}

impl StatusComponent for Undying {
    fn on_apply(&mut self, _ctx: &mut StatusContext<'_>) {
        self.spent = false;
    }

    fn on_death(&mut self, ctx: &mut StatusContext<'_>) -> bool {
        if self.spent {
            return true;
        }
        self.spent = true;
        ctx.heal(self.heal);
        false
    }
}

#[cfg(test)]
mod tests {
    use skirmish_core::{DamageFlags, Entity, EntityEvent, EntityId, EntityStats, EventLog, Status};

    use super::*;

    #[test]
    fn vetoes_one_death_per_application() {
        let mut entity = Entity::new(EntityId(1), EntityStats::builder().health(50.0).build());
        let log = EventLog::new();
        entity.register_listener(log.clone());
        let status = Status::new("undying", 30.0, 1, -1)
            .expect("valid status")
            .with_component(Undying::new(10.0));
        entity.add_status(status).expect("applies");

        let snapshot = entity.take_damage(80.0, DamageFlags::empty());
        assert!(!snapshot.victim_died);
        assert_eq!(entity.stats().health(), 10.0);
        assert_eq!(log.count(|e| matches!(e, EntityEvent::Died { .. })), 0);

        let snapshot = entity.take_damage(80.0, DamageFlags::empty());
        assert!(snapshot.victim_died);
        assert_eq!(log.count(|e| matches!(e, EntityEvent::Died { .. })), 1);
    }
}
