//! Content-facing side of an ability.

use core::fmt;

use crate::bullet::Bullet;
use crate::command::Command;
use crate::entity::{DamageFlags, Entity, EntityId};
use crate::error::{ErrorSeverity, GameError};

use super::ControlModule;

/// What an ability does when used.
///
/// A use runs in three phases. `start_use` runs immediately and decides whether the
/// use continues. If it does, `continue_use` is called once per tick until it returns
/// [`Step::Complete`] or an error, and `end_use` runs after the last step.
pub trait AbilityBehavior: fmt::Debug {
    /// Returns `true` to start the continuation. The use is paid for either way.
    fn start_use(&mut self, _ctx: &mut AbilityContext<'_>) -> bool {
        false
    }

    /// Runs one step. An error ends the continuation as if it had completed.
    fn continue_use(
        &mut self,
        _ctx: &mut AbilityContext<'_>,
        _progress: &Progress,
    ) -> Result<Step, ContinuationError> {
        Ok(Step::Complete)
    }

    fn end_use(&mut self, _ctx: &mut AbilityContext<'_>) {}
}

/// Result of one continuation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Run again next tick.
    Yield,
    /// No more work.
    Complete,
}

/// How far a running continuation has come.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    /// Steps that yielded so far.
    pub step: u32,
    /// Seconds covered by those steps.
    pub elapsed: f64,
}

/// A continuation step failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ContinuationError {
    pub reason: String,
}

impl ContinuationError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl GameError for ContinuationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "ABILITY_CONTINUATION_FAILED"
    }
}

/// The caster as seen from inside an ability.
pub struct AbilityContext<'a> {
    entity: &'a mut Entity,
    commands: &'a mut Vec<Command>,
    control: Option<&'a dyn ControlModule>,
    dt: f64,
}

impl<'a> AbilityContext<'a> {
    pub(crate) fn new(
        entity: &'a mut Entity,
        commands: &'a mut Vec<Command>,
        control: Option<&'a dyn ControlModule>,
        dt: f64,
    ) -> Self {
        Self {
            entity,
            commands,
            control,
            dt,
        }
    }

    pub fn entity(&self) -> &Entity {
        self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        self.entity
    }

    pub fn control(&self) -> Option<&dyn ControlModule> {
        self.control
    }

    /// The control is still held. `false` without a control.
    pub fn is_held(&self) -> bool {
        self.control.is_some_and(|c| c.poll_continue())
    }

    /// The control was released this tick.
    pub fn is_released(&self) -> bool {
        self.control.is_some_and(|c| c.poll_end())
    }

    /// Length of the current tick; zero outside of a tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Queues a command for the host.
    pub fn issue(&mut self, command: Command) {
        self.commands.push(command);
    }

    pub fn spawn_bullet(&mut self, bullet: Bullet) {
        self.issue(Command::SpawnBullet(bullet));
    }

    /// Damages another entity on behalf of the caster.
    pub fn damage(&mut self, target: EntityId, amount: f64, flags: DamageFlags) {
        let source = Some(self.entity.id());
        self.issue(Command::Damage {
            target,
            source,
            amount,
            flags,
        });
    }
}

impl fmt::Debug for AbilityContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbilityContext")
            .field("entity", &self.entity.id())
            .field("has_control", &self.control.is_some())
            .field("dt", &self.dt)
            .finish()
    }
}
