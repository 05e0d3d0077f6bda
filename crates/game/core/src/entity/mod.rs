//! The combat subject.
//!
//! An [`Entity`] owns its vitals ([`EntityStats`]), the statuses applied to it and the
//! listeners observing it. Every event is handled in the same order:
//!
//! 1. each active status, in application order, runs the matching component hook
//! 2. each listener, in registration order, is notified
//! 3. commands queued by components during step 1 are applied
//!
//! Commands re-enter the entity (a damage-over-time tick resolves damage, which fans
//! out again), so their application is nested at most
//! [`GameConfig::MAX_COMMAND_DEPTH`] levels deep. Anything beyond that is dropped
//! with a warning.

mod damage;
mod faction;
mod snapshot;
mod stats;

pub use damage::{deal_damage, deal_self_damage};
pub use faction::{DamageFlags, Faction};
pub use snapshot::{CombatSnapshot, CombatSnapshotBuilder};
pub use stats::{EntityStats, EntityStatsBuilder};

use core::fmt;

use arrayvec::ArrayVec;
use tracing::{debug, trace, warn};

use crate::command::Command;
use crate::config::GameConfig;
use crate::events::{EntityEvent, Listener, Listeners};
use crate::status::{StackChange, Status, StatusCommand, StatusContext, StatusError};

/// Unique identifier of an entity within one simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Result of [`Entity::add_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusApplication {
    /// The status was new and has been applied.
    Added,
    /// A status with the same name was already active and gained a stack; the new
    /// instance was discarded.
    Stacked { stacks: i32 },
}

#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    stats: EntityStats,
    statuses: ArrayVec<Status, { GameConfig::MAX_STATUSES }>,
    listeners: Listeners<EntityEvent>,
    pending: Vec<StatusCommand>,
    outbox: Vec<Command>,
    flush_depth: usize,
}

impl Entity {
    pub fn new(id: EntityId, stats: EntityStats) -> Self {
        Self {
            id,
            stats,
            statuses: ArrayVec::new(),
            listeners: Listeners::new(),
            pending: Vec::new(),
            outbox: Vec::new(),
            flush_depth: 0,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn stats(&self) -> &EntityStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut EntityStats {
        &mut self.stats
    }

    pub fn affiliation(&self) -> Faction {
        self.stats.affiliation
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_invincible(&self) -> bool {
        self.stats.is_invincible()
    }

    pub fn set_invincible(&mut self, invincible: bool) {
        self.stats.set_invincible(invincible);
    }

    pub fn register_listener(&mut self, listener: impl Listener<EntityEvent> + 'static) {
        self.listeners.register(listener);
    }

    /// Takes the commands addressed to the host.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.outbox)
    }

    // ===== per-tick update =====

    /// Advances the entity by `dt` seconds.
    ///
    /// Order: combat timer, shield regeneration, health regeneration, statuses
    /// (with expired ones removed afterwards), then the `Updated` event.
    pub fn tick(&mut self, dt: f64) {
        debug_assert!(dt >= 0.0, "negative entity delta: {dt}");

        self.stats.decay_combat(dt);
        self.regenerate_shield(dt);
        self.regenerate_health(dt);
        self.tick_statuses(dt);
        self.stats.clamp_resources();

        self.emit(EntityEvent::Updated { entity: self.id, dt });
        self.flush();
    }

    fn regenerate_shield(&mut self, dt: f64) {
        let delay = self.stats.shield_regen_delay();
        if delay > 0.0 {
            let delay = delay - dt;
            self.stats.write_shield_regen_delay(delay.max(0.0));
            if delay <= 0.0 {
                trace!(entity = %self.id, "shield recharge started");
                self.fan_out(|status, ctx| status.shield_start_recharge(ctx));
                self.emit(EntityEvent::ShieldStartRecharge { entity: self.id });
            }
            return;
        }

        let max = self.stats.shield_max.value();
        let shield = self.stats.shield();
        if shield < max {
            let regenerated = shield + self.stats.shield_regen.value() * dt;
            if regenerated >= max {
                self.stats.write_shield(max);
                self.fan_out(|status, ctx| status.shield_recharged(ctx));
                self.emit(EntityEvent::ShieldRecharged { entity: self.id });
            } else {
                self.stats.set_shield(regenerated);
            }
        }
    }

    fn regenerate_health(&mut self, dt: f64) {
        let regen = self.stats.health_regen.value();
        if regen > 0.0 && self.is_alive() && self.stats.health() < self.stats.health_max.value() {
            self.restore_health(regen * dt);
        }
    }

    fn tick_statuses(&mut self, dt: f64) {
        let mut changes: Vec<(String, StackChange)> = Vec::new();
        let mut expired: Vec<String> = Vec::new();
        {
            let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
            for status in &mut self.statuses {
                if let Some(change) = status.tick(&mut ctx, dt) {
                    changes.push((status.name().to_owned(), change));
                }
                if status.is_expired() {
                    expired.push(status.name().to_owned());
                }
            }
        }

        for (name, change) in changes {
            self.emit_stacks_changed(name, change);
        }
        for name in expired {
            self.detach_status(&name);
        }
    }

    // ===== healing =====

    /// Restores up to `amount` health, capped at `health_max`.
    ///
    /// Returns the health actually restored. Statuses and listeners are only told
    /// about a heal that restored something.
    pub fn heal(&mut self, amount: f64) -> f64 {
        let restored = self.restore_health(amount);
        self.flush();
        restored
    }

    fn restore_health(&mut self, amount: f64) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }

        let before = self.stats.health();
        self.stats.set_health(before + amount);
        let restored = self.stats.health() - before;
        if restored > 0.0 {
            self.fan_out(|status, ctx| status.healed(ctx, restored));
            self.emit(EntityEvent::Healed {
                entity: self.id,
                amount: restored,
            });
        }
        restored
    }

    // ===== statuses =====

    /// Applies `status`, or adds a stack to the active status of the same name.
    ///
    /// Fails only when the entity already carries the maximum number of distinct
    /// statuses.
    pub fn add_status(&mut self, status: Status) -> Result<StatusApplication, StatusError> {
        let result = self.attach_status(status);
        self.flush();
        result
    }

    /// Removes the named status, reverting its components first.
    ///
    /// Returns `Ok(false)` when no such status is active.
    pub fn remove_status(&mut self, name: &str) -> Result<bool, StatusError> {
        if name.is_empty() {
            return Err(StatusError::EmptyName);
        }
        let removed = self.detach_status(name);
        self.flush();
        Ok(removed)
    }

    /// Reverts and removes every active status.
    pub fn clear_statuses(&mut self) {
        while let Some(name) = self.statuses.first().map(|s| s.name().to_owned()) {
            self.detach_status(&name);
        }
        self.flush();
    }

    pub fn has_status(&self, name: &str) -> bool {
        self.status(name).is_some()
    }

    pub fn status(&self, name: &str) -> Option<&Status> {
        self.statuses.iter().find(|s| s.name() == name)
    }

    /// Active statuses in application order.
    pub fn active_statuses(&self) -> &[Status] {
        &self.statuses
    }

    /// Sets the stack count of the named status, clamped to `[0, stacks_max]`.
    ///
    /// A count of zero removes the status. Returns `false` when no such status is
    /// active.
    pub fn set_stack_count(&mut self, name: &str, count: i32) -> bool {
        let Some(index) = self.statuses.iter().position(|s| s.name() == name) else {
            return false;
        };

        let (change, expired) = {
            let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
            let status = &mut self.statuses[index];
            (status.set_stack_count(&mut ctx, count), status.is_expired())
        };
        if let Some(change) = change {
            self.emit_stacks_changed(name.to_owned(), change);
        }
        if expired {
            self.detach_status(name);
        }
        self.flush();
        true
    }

    fn attach_status(&mut self, status: Status) -> Result<StatusApplication, StatusError> {
        if let Some(existing) = self.statuses.iter_mut().find(|s| s.name() == status.name()) {
            let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
            let change = existing.increment_stack_count(&mut ctx, 1);
            let stacks = existing.stack_count();
            if let Some(change) = change {
                self.emit_stacks_changed(status.name().to_owned(), change);
            }
            return Ok(StatusApplication::Stacked { stacks });
        }

        let name = status.name().to_owned();
        if let Err(err) = self.statuses.try_push(status) {
            return Err(StatusError::CapacityExceeded {
                entity: self.id,
                name: err.element().name().to_owned(),
                max: GameConfig::MAX_STATUSES,
            });
        }

        if let Some(applied) = self.statuses.last_mut() {
            let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
            applied.apply(&mut ctx);
        }
        self.fan_out(|other, ctx| {
            if other.name() != name {
                other.status_added(ctx, &name);
            }
        });

        debug!(entity = %self.id, status = %name, "status applied");
        self.emit(EntityEvent::StatusAdded {
            entity: self.id,
            name,
        });
        Ok(StatusApplication::Added)
    }

    fn detach_status(&mut self, name: &str) -> bool {
        let Some(index) = self.statuses.iter().position(|s| s.name() == name) else {
            return false;
        };

        let mut status = self.statuses.remove(index);
        {
            let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
            status.revert(&mut ctx);
        }
        self.fan_out(|other, ctx| other.status_removed(ctx, name));

        debug!(entity = %self.id, status = %name, "status removed");
        self.emit(EntityEvent::StatusRemoved {
            entity: self.id,
            name: name.to_owned(),
        });
        true
    }

    // ===== fan-out =====

    /// Runs `hook` on every active status with a fresh component context.
    fn fan_out(&mut self, mut hook: impl FnMut(&mut Status, &mut StatusContext<'_>)) {
        let mut ctx = StatusContext::new(self.id, &mut self.stats, &mut self.pending);
        for status in &mut self.statuses {
            hook(status, &mut ctx);
        }
    }

    fn emit(&mut self, event: EntityEvent) {
        self.listeners.emit(&event);
    }

    fn emit_stacks_changed(&mut self, name: String, change: StackChange) {
        trace!(entity = %self.id, status = %name, old = change.old, new = change.new, "stacks changed");
        self.emit(EntityEvent::StacksChanged {
            entity: self.id,
            name,
            old: change.old,
            new: change.new,
        });
    }

    /// Asks every status whether the entity may die and announces a confirmed death.
    fn vote_death(&mut self) -> bool {
        let mut allow = true;
        self.fan_out(|status, ctx| allow &= status.vote_death(ctx));

        if allow {
            debug!(entity = %self.id, "entity died");
            self.emit(EntityEvent::Died { entity: self.id });
        } else {
            debug!(entity = %self.id, "death vetoed");
        }
        allow
    }

    /// Applies commands queued by status components.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if self.flush_depth >= GameConfig::MAX_COMMAND_DEPTH {
            warn!(
                entity = %self.id,
                dropped = self.pending.len(),
                depth = self.flush_depth,
                "status command chain too deep; dropping commands"
            );
            self.pending.clear();
            return;
        }

        self.flush_depth += 1;
        for command in core::mem::take(&mut self.pending) {
            match command {
                StatusCommand::Damage { amount, flags } => {
                    deal_damage(self, None, amount, flags);
                }
                StatusCommand::Heal(amount) => {
                    self.heal(amount);
                }
                StatusCommand::AddStatus(status) => {
                    if let Err(err) = self.add_status(status) {
                        warn!(entity = %self.id, error = %err, "status command rejected");
                    }
                }
                StatusCommand::RemoveStatus(name) => {
                    if let Err(err) = self.remove_status(&name) {
                        warn!(entity = %self.id, error = %err, "status command rejected");
                    }
                }
                StatusCommand::SetStacks { status, count } => {
                    self.set_stack_count(&status, count);
                }
                StatusCommand::World(command) => self.outbox.push(command),
            }
        }
        self.flush_depth -= 1;
    }
}
