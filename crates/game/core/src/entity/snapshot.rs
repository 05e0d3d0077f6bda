use super::{DamageFlags, EntityId};

/// Outcome of one damage resolution.
///
/// Produced exactly once per `deal_damage` call and handed read-only to the victim,
/// its statuses, its listeners and (when present) the attacker.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatSnapshot {
    pub victim: EntityId,
    pub attacker: Option<EntityId>,
    /// Damage routed into the health phase. With `PIERCE_SHIELD` this can include
    /// damage the shield also absorbed.
    pub health_damage: f64,
    pub shield_damage: f64,
    pub flags: DamageFlags,
    pub victim_died: bool,
}

impl CombatSnapshot {
    /// A snapshot recording no damage at all.
    pub fn zero(victim: EntityId, attacker: Option<EntityId>, flags: DamageFlags) -> Self {
        Self {
            victim,
            attacker,
            health_damage: 0.0,
            shield_damage: 0.0,
            flags,
            victim_died: false,
        }
    }

    pub fn builder(victim: EntityId) -> CombatSnapshotBuilder {
        CombatSnapshotBuilder {
            snapshot: Self::zero(victim, None, DamageFlags::empty()),
        }
    }

    pub fn total_damage(&self) -> f64 {
        self.health_damage + self.shield_damage
    }

    pub fn is_self_inflicted(&self) -> bool {
        self.attacker == Some(self.victim)
    }
}

/// Builder for [`CombatSnapshot`], mostly useful in tests and content code.
#[derive(Clone, Copy, Debug)]
pub struct CombatSnapshotBuilder {
    snapshot: CombatSnapshot,
}

impl CombatSnapshotBuilder {
    pub fn attacker(mut self, attacker: EntityId) -> Self {
        self.snapshot.attacker = Some(attacker);
        self
    }

    pub fn health_damage(mut self, amount: f64) -> Self {
        self.snapshot.health_damage = amount;
        self
    }

    pub fn shield_damage(mut self, amount: f64) -> Self {
        self.snapshot.shield_damage = amount;
        self
    }

    pub fn flags(mut self, flags: DamageFlags) -> Self {
        self.snapshot.flags = flags;
        self
    }

    pub fn died(mut self, died: bool) -> Self {
        self.snapshot.victim_died = died;
        self
    }

    pub fn build(self) -> CombatSnapshot {
        self.snapshot
    }
}
