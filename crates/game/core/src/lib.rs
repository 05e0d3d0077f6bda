//! Combat simulation rules shared by content and hosts.
//!
//! `skirmish-core` tracks combatant resources, resolves damage, runs timed and
//! stackable status effects and drives the ability state machine. It performs no I/O
//! and owns no clock: a host calls [`Controller::tick`] (or [`Entity::tick`] and
//! [`Ability::tick`] directly) once per simulation step from a single thread.
//!
//! Game-specific behavior plugs in through three traits: [`StatusComponent`],
//! [`AbilityBehavior`] and [`BulletBehavior`].
pub mod ability;
pub mod bullet;
pub mod command;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod events;
pub mod stats;
pub mod status;
pub mod timer;

pub use ability::{
    Ability, AbilityBehavior, AbilityContext, AbilityError, AiControl, ContinuationError,
    ControlModule, Invocation, Progress, Step,
};
pub use bullet::{Bullet, BulletBehavior, BulletState, HitOutcome};
pub use command::Command;
pub use config::GameConfig;
pub use controller::{Controller, ControllerError};
pub use entity::{
    CombatSnapshot, CombatSnapshotBuilder, DamageFlags, Entity, EntityId, EntityStats,
    EntityStatsBuilder, Faction, StatusApplication, deal_damage, deal_self_damage,
};
pub use error::{ErrorSeverity, GameError};
pub use events::{AbilityEvent, EntityEvent, EventLog, Listener, Listeners};
pub use stats::{BoundedValue, CompoundValue, Operator};
pub use status::{StackChange, StackDecay, Status, StatusComponent, StatusContext, StatusError};
pub use timer::{CountdownTimer, TimerError};
