//! Single-threaded host loop.
//!
//! [`Simulation`] owns every controller and bullet, advances them on a fixed
//! timestep and routes the commands they issue. Entities never reach each other
//! directly: damage between two entities, whether issued by a status, an ability or
//! a bullet, is resolved here by id.
//!
//! One step runs, in order:
//!
//! 1. every controller, in id order (entity, then abilities, then controls)
//! 2. command draining, repeated while resolving commands produces new ones
//! 3. every bullet, in id order, with expired bullets removed

use std::collections::BTreeMap;
use std::fmt;

use skirmish_core::{
    Bullet, CombatSnapshot, Command, Controller, DamageFlags, Entity, EntityId, EntityStats,
    GameConfig, deal_damage, deal_self_damage,
};
use tracing::{debug, trace, warn};

use crate::error::{Result, SimulationError};

/// Identifier of a bullet in flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BulletId(pub u32);

impl fmt::Display for BulletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bullet#{}", self.0)
    }
}

/// Owner of a set of combatants and the projectiles between them.
#[derive(Debug)]
pub struct Simulation {
    config: GameConfig,
    controllers: BTreeMap<EntityId, Controller>,
    bullets: BTreeMap<BulletId, Bullet>,
    next_entity: u32,
    next_bullet: u32,
    accumulator: f64,
    elapsed: f64,
    steps: u64,
}

impl Simulation {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            controllers: BTreeMap::new(),
            bullets: BTreeMap::new(),
            next_entity: 0,
            next_bullet: 0,
            accumulator: 0.0,
            elapsed: 0.0,
            steps: 0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Simulated seconds covered by the steps run so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Fraction of a step left in the accumulator, for interpolating presentation.
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.config.fixed_timestep
    }

    // ===== entities =====

    /// Spawns an entity with no abilities and returns its id.
    pub fn spawn(&mut self, stats: EntityStats) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.controllers
            .insert(id, Controller::new(Entity::new(id, stats)));
        debug!(entity = %id, "entity spawned");
        id
    }

    /// Adds a controller built elsewhere. Its entity id must be unused.
    pub fn spawn_controller(&mut self, controller: Controller) -> Result<EntityId> {
        let id = controller.id();
        if self.controllers.contains_key(&id) {
            return Err(SimulationError::DuplicateEntity(id));
        }
        self.next_entity = self.next_entity.max(id.0.saturating_add(1));
        self.controllers.insert(id, controller);
        debug!(entity = %id, "controller spawned");
        Ok(id)
    }

    /// Removes an entity, reverting its statuses first.
    ///
    /// Commands it issued but the host has not drained yet are dropped. Its bullets
    /// stay in flight and deal unattributed damage from then on.
    pub fn despawn(&mut self, id: EntityId) -> Result<Entity> {
        let mut controller = self
            .controllers
            .remove(&id)
            .ok_or(SimulationError::UnknownEntity(id))?;
        let dropped = controller.drain_commands().len();
        if dropped > 0 {
            debug!(entity = %id, dropped, "pending commands dropped on despawn");
        }
        debug!(entity = %id, "entity despawned");
        Ok(controller.despawn())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.controllers.contains_key(&id)
    }

    pub fn controller(&self, id: EntityId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    pub fn controller_mut(&mut self, id: EntityId) -> Option<&mut Controller> {
        self.controllers.get_mut(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.controllers.get(&id).map(Controller::entity)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.controllers.get_mut(&id).map(Controller::entity_mut)
    }

    /// Ids of every spawned entity, ascending.
    pub fn entity_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.controllers.keys().copied()
    }

    pub fn entity_count(&self) -> usize {
        self.controllers.len()
    }

    // ===== bullets =====

    pub fn bullet(&self, id: BulletId) -> Option<&Bullet> {
        self.bullets.get(&id)
    }

    pub fn bullets(&self) -> impl Iterator<Item = (BulletId, &Bullet)> + '_ {
        self.bullets.iter().map(|(id, bullet)| (*id, bullet))
    }

    pub fn bullet_count(&self) -> usize {
        self.bullets.len()
    }

    /// Puts a bullet in flight.
    pub fn spawn_bullet(&mut self, bullet: Bullet) -> BulletId {
        let id = BulletId(self.next_bullet);
        self.next_bullet += 1;
        trace!(bullet = %id, source = %bullet.source(), "bullet spawned");
        self.bullets.insert(id, bullet);
        id
    }

    /// Relays a collision between a bullet and an entity.
    ///
    /// Returns `Ok(None)` when the bullet's hit mask excludes the victim. A hit that
    /// consumes the bullet removes it.
    pub fn collide(&mut self, bullet: BulletId, victim: EntityId) -> Result<Option<CombatSnapshot>> {
        let faction = self
            .entity(victim)
            .ok_or(SimulationError::UnknownEntity(victim))?
            .affiliation();
        let projectile = self
            .bullets
            .get_mut(&bullet)
            .ok_or(SimulationError::UnknownBullet(bullet))?;

        let Some(outcome) = projectile.hit(victim, faction) else {
            return Ok(None);
        };
        let source = projectile.source();
        if projectile.is_expired() {
            self.bullets.remove(&bullet);
            trace!(bullet = %bullet, "bullet consumed");
        }

        let attacker = self.contains(source).then_some(source);
        self.deal_damage(victim, attacker, outcome.damage, outcome.flags)
            .map(Some)
    }

    /// Relays a batch of collisions, skipping those naming unknown bullets or
    /// entities.
    ///
    /// A bullet consumed by an earlier collision in the batch misses the rest.
    pub fn relay_collisions(
        &mut self,
        collisions: impl IntoIterator<Item = (BulletId, EntityId)>,
    ) -> Vec<CombatSnapshot> {
        let mut snapshots = Vec::new();
        for (bullet, victim) in collisions {
            match self.collide(bullet, victim) {
                Ok(Some(snapshot)) => snapshots.push(snapshot),
                Ok(None) => {}
                Err(SimulationError::UnknownBullet(_)) => {
                    trace!(bullet = %bullet, victim = %victim, "collision with a spent bullet");
                }
                Err(err) => warn!(bullet = %bullet, error = %err, "collision dropped"),
            }
        }
        snapshots
    }

    // ===== damage =====

    /// Resolves damage between two entities by id.
    ///
    /// Fails without side effects when either id is unknown. An attacker equal to
    /// the victim resolves as self-damage.
    pub fn deal_damage(
        &mut self,
        victim: EntityId,
        attacker: Option<EntityId>,
        amount: f64,
        flags: DamageFlags,
    ) -> Result<CombatSnapshot> {
        if !self.contains(victim) {
            return Err(SimulationError::UnknownEntity(victim));
        }

        match attacker {
            None => {
                let target = self.victim_mut(victim)?;
                Ok(deal_damage(target, None, amount, flags))
            }
            Some(attacker) if attacker == victim => {
                let target = self.victim_mut(victim)?;
                Ok(deal_self_damage(target, amount, flags))
            }
            Some(attacker) => {
                let mut source = self
                    .controllers
                    .remove(&attacker)
                    .ok_or(SimulationError::UnknownEntity(attacker))?;
                let snapshot = self
                    .victim_mut(victim)
                    .map(|target| deal_damage(target, Some(source.entity_mut()), amount, flags));
                self.controllers.insert(attacker, source);
                snapshot
            }
        }
    }

    fn victim_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entity_mut(id).ok_or(SimulationError::UnknownEntity(id))
    }

    // ===== stepping =====

    /// Accumulates `frame_dt` and runs as many whole fixed steps as fit, at most
    /// `max_steps_per_frame`. Returns the number of steps run.
    ///
    /// Time left over once the cap is reached is dropped.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        debug_assert!(frame_dt >= 0.0, "negative frame delta: {frame_dt}");
        let timestep = self.config.fixed_timestep;
        self.accumulator += frame_dt;

        let mut ran = 0;
        while self.accumulator >= timestep && ran < self.config.max_steps_per_frame {
            self.step(timestep);
            self.accumulator -= timestep;
            ran += 1;
        }

        if self.accumulator >= timestep {
            debug!(
                dropped = self.accumulator,
                max_steps = self.config.max_steps_per_frame,
                "frame budget exhausted; dropping accumulated time"
            );
            self.accumulator = 0.0;
        }
        ran
    }

    /// Runs one step of `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        for controller in self.controllers.values_mut() {
            controller.tick(dt);
        }
        self.process_commands();
        self.tick_bullets(dt);

        self.elapsed += dt;
        self.steps += 1;
        trace!(step = self.steps, elapsed = self.elapsed, "step complete");
    }

    /// Drains and applies commands until none are left.
    ///
    /// Resolving a command can make statuses issue more; each round of that is one
    /// level, and rounds beyond [`GameConfig::MAX_COMMAND_DEPTH`] are dropped.
    pub fn process_commands(&mut self) {
        for _ in 0..=GameConfig::MAX_COMMAND_DEPTH {
            let commands = self.drain_all();
            if commands.is_empty() {
                return;
            }
            for command in commands {
                self.apply(command);
            }
        }

        let dropped = self.drain_all().len();
        if dropped > 0 {
            warn!(dropped, "host command chain too deep; dropping commands");
        }
    }

    fn drain_all(&mut self) -> Vec<Command> {
        self.controllers
            .values_mut()
            .flat_map(Controller::drain_commands)
            .collect()
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::Damage {
                target,
                source,
                amount,
                flags,
            } => {
                // The source may have despawned since issuing the command.
                let source = source.filter(|id| self.contains(*id));
                if let Err(err) = self.deal_damage(target, source, amount, flags) {
                    warn!(error = %err, "damage command dropped");
                }
            }
            Command::SpawnBullet(bullet) => {
                self.spawn_bullet(bullet);
            }
        }
    }

    fn tick_bullets(&mut self, dt: f64) {
        self.bullets.retain(|id, bullet| {
            let alive = bullet.tick(dt);
            if !alive {
                trace!(bullet = %id, "bullet expired");
            }
            alive
        });
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}
