//! Behavior units attached to a [`Status`](super::Status).

use core::fmt;

use crate::command::Command;
use crate::entity::{CombatSnapshot, DamageFlags, EntityId, EntityStats};

use super::Status;

/// A unit of behavior reacting to status lifecycle and combat events.
///
/// Every hook has a no-op default; implementations override only what they need.
/// Hooks are invoked in component order within a status, and statuses in the order
/// they were applied to the entity.
pub trait StatusComponent: fmt::Debug {
    /// The owning status was applied to the entity.
    fn on_apply(&mut self, _ctx: &mut StatusContext<'_>) {}

    /// The owning status is being removed. Undo whatever `on_apply` did.
    fn on_revert(&mut self, _ctx: &mut StatusContext<'_>) {}

    fn on_update(&mut self, _ctx: &mut StatusContext<'_>, _dt: f64) {}

    fn on_stacks_changed(&mut self, _ctx: &mut StatusContext<'_>, _old: i32, _new: i32) {}

    fn on_damage_dealt(&mut self, _ctx: &mut StatusContext<'_>, _snapshot: &CombatSnapshot) {}

    fn on_damage_taken(&mut self, _ctx: &mut StatusContext<'_>, _snapshot: &CombatSnapshot) {}

    /// Votes on whether the entity dies. Any `false` cancels the death.
    fn on_death(&mut self, _ctx: &mut StatusContext<'_>) -> bool {
        true
    }

    fn on_healed(&mut self, _ctx: &mut StatusContext<'_>, _amount: f64) {}

    fn on_shield_depleted(&mut self, _ctx: &mut StatusContext<'_>) {}

    fn on_shield_recharged(&mut self, _ctx: &mut StatusContext<'_>) {}

    fn on_shield_start_recharge(&mut self, _ctx: &mut StatusContext<'_>) {}

    /// Another status was applied to the same entity.
    fn on_status_added(&mut self, _ctx: &mut StatusContext<'_>, _name: &str) {}

    /// Another status was removed from the same entity.
    fn on_status_removed(&mut self, _ctx: &mut StatusContext<'_>, _name: &str) {}
}

/// Deferred request issued by a component, applied once the current fan-out ends.
#[derive(Debug)]
pub(crate) enum StatusCommand {
    Damage { amount: f64, flags: DamageFlags },
    Heal(f64),
    AddStatus(Status),
    RemoveStatus(String),
    SetStacks { status: String, count: i32 },
    World(Command),
}

/// What a component can see and touch while one of its hooks runs.
///
/// Vitals are reachable directly. Anything that would re-enter the entity (damage,
/// healing, status changes) is queued and applied after every status has seen the
/// current event, in the order it was issued.
pub struct StatusContext<'a> {
    pub(crate) entity: EntityId,
    pub(crate) stats: &'a mut EntityStats,
    pub(crate) status: String,
    pub(crate) stacks: i32,
    pub(crate) commands: &'a mut Vec<StatusCommand>,
}

impl<'a> StatusContext<'a> {
    pub(crate) fn new(
        entity: EntityId,
        stats: &'a mut EntityStats,
        commands: &'a mut Vec<StatusCommand>,
    ) -> Self {
        Self {
            entity,
            stats,
            status: String::new(),
            stacks: 0,
            commands,
        }
    }

    /// Points the context at the status whose components run next.
    pub(crate) fn enter(&mut self, status: &str, stacks: i32) {
        self.status.clear();
        self.status.push_str(status);
        self.stacks = stacks;
    }

    /// The entity carrying the status.
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Name of the owning status.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Current stack count of the owning status.
    pub fn stacks(&self) -> i32 {
        self.stacks
    }

    pub fn stats(&self) -> &EntityStats {
        self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EntityStats {
        self.stats
    }

    /// Damages the carrying entity with no attacker.
    pub fn damage_self(&mut self, amount: f64, flags: DamageFlags) {
        self.commands.push(StatusCommand::Damage { amount, flags });
    }

    pub fn heal(&mut self, amount: f64) {
        self.commands.push(StatusCommand::Heal(amount));
    }

    /// Damages another entity, attributed to the carrying entity.
    ///
    /// Routed through the host, which owns every entity.
    pub fn damage(&mut self, target: EntityId, amount: f64, flags: DamageFlags) {
        self.issue(Command::Damage {
            target,
            source: Some(self.entity),
            amount,
            flags,
        });
    }

    pub fn apply_status(&mut self, status: Status) {
        self.commands.push(StatusCommand::AddStatus(status));
    }

    pub fn remove_status(&mut self, name: impl Into<String>) {
        self.commands.push(StatusCommand::RemoveStatus(name.into()));
    }

    /// Sets the owning status' stack count; zero removes it.
    pub fn set_stacks(&mut self, count: i32) {
        self.commands.push(StatusCommand::SetStacks {
            status: self.status.clone(),
            count,
        });
    }

    /// Removes one stack from the owning status.
    pub fn consume_stack(&mut self) {
        self.set_stacks(self.stacks - 1);
    }

    /// Queues a command for the host.
    pub fn issue(&mut self, command: Command) {
        self.commands.push(StatusCommand::World(command));
    }
}

impl fmt::Debug for StatusContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusContext")
            .field("entity", &self.entity)
            .field("status", &self.status)
            .field("stacks", &self.stacks)
            .field("pending", &self.commands.len())
            .finish()
    }
}
