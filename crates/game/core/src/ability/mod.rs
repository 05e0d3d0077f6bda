//! Cooldown and charge gated actions.
//!
//! ```text
//!            invoke() && start_use() == true
//!   ┌──────┐ ───────────────────────────────▶ ┌─────────┐
//!   │ Idle │                                  │ Running │ continue_use() once per tick
//!   └──────┘ ◀─────────────────────────────── └─────────┘
//!      │       Step::Complete / error → end_use()
//!      │
//!      └─ tick(): cooldown counts down; each completion banks one charge
//!                 until charges_max, restarting the cooldown while below it
//! ```
//!
//! An ability is ready when it is active, available and either off cooldown or
//! holding a charge. Using it consumes a charge when one is banked and restarts the
//! cooldown otherwise. The cost is paid even when `start_use` declines to continue.

mod behavior;
mod control;

pub use behavior::{AbilityBehavior, AbilityContext, ContinuationError, Progress, Step};
pub use control::{AiControl, ControlModule};

use core::fmt;
use core::hash::{Hash, Hasher};

use tracing::{debug, warn};

use crate::command::Command;
use crate::entity::Entity;
use crate::error::{ErrorSeverity, GameError};
use crate::events::{AbilityEvent, Listener, Listeners};
use crate::timer::{CountdownTimer, TimerError};

/// Errors raised when building an ability.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AbilityError {
    #[error("ability name must not be empty")]
    EmptyName,

    #[error("ability `{name}` cannot bank a negative number of charges ({charges_max})")]
    InvalidChargesMax { name: String, charges_max: i32 },

    #[error("ability `{name}` has an invalid cooldown: {source}")]
    InvalidCooldown {
        name: String,
        #[source]
        source: TimerError,
    },
}

impl GameError for AbilityError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "ABILITY_EMPTY_NAME",
            Self::InvalidChargesMax { .. } => "ABILITY_INVALID_CHARGES_MAX",
            Self::InvalidCooldown { .. } => "ABILITY_INVALID_COOLDOWN",
        }
    }
}

/// Whether a continuation is live.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Invocation {
    #[default]
    Idle,
    Running(Progress),
}

#[derive(Debug)]
pub struct Ability {
    name: String,
    description: String,
    cooldown: CountdownTimer,
    charges: i32,
    charges_max: i32,
    inactive_count: i32,
    unavailable_count: i32,
    invocation: Invocation,
    behavior: Box<dyn AbilityBehavior>,
    control: Option<Box<dyn ControlModule>>,
    listeners: Listeners<AbilityEvent>,
}

impl Ability {
    /// Creates an idle ability with no charges whose first cooldown is running.
    ///
    /// A zero `cooldown` makes the ability ready immediately. Use
    /// [`Ability::with_cooldown_completed`] to start ready regardless.
    pub fn new(
        name: impl Into<String>,
        cooldown: f64,
        charges_max: i32,
        behavior: impl AbilityBehavior + 'static,
    ) -> Result<Self, AbilityError> {
        Self::from_boxed(name, cooldown, charges_max, Box::new(behavior))
    }

    pub fn from_boxed(
        name: impl Into<String>,
        cooldown: f64,
        charges_max: i32,
        behavior: Box<dyn AbilityBehavior>,
    ) -> Result<Self, AbilityError> {
        let name = name.into();
        if name.is_empty() {
            return Err(AbilityError::EmptyName);
        }
        if charges_max < 0 {
            return Err(AbilityError::InvalidChargesMax { name, charges_max });
        }
        let cooldown = match CountdownTimer::new(cooldown) {
            Ok(timer) => timer,
            Err(source) => return Err(AbilityError::InvalidCooldown { name, source }),
        };

        Ok(Self {
            name,
            description: String::new(),
            cooldown,
            charges: 0,
            charges_max,
            inactive_count: 0,
            unavailable_count: 0,
            invocation: Invocation::Idle,
            behavior,
            control: None,
            listeners: Listeners::new(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_control(mut self, control: impl ControlModule + 'static) -> Self {
        self.control = Some(Box::new(control));
        self
    }

    pub fn with_cooldown_completed(mut self) -> Self {
        self.cooldown.complete();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cooldown(&self) -> &CountdownTimer {
        &self.cooldown
    }

    pub fn charges(&self) -> i32 {
        self.charges
    }

    pub fn charges_max(&self) -> i32 {
        self.charges_max
    }

    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    pub fn in_use(&self) -> bool {
        matches!(self.invocation, Invocation::Running(_))
    }

    pub fn is_active(&self) -> bool {
        self.inactive_count <= 0
    }

    /// Reference-counted: an ability deactivated twice needs two `set_active(true)`.
    ///
    /// An inactive ability does not cool down. A running continuation is not
    /// interrupted.
    pub fn set_active(&mut self, active: bool) {
        adjust_suppression(&mut self.inactive_count, active);
    }

    pub fn is_available(&self) -> bool {
        self.unavailable_count <= 0
    }

    /// Reference-counted like [`Ability::set_active`]. An unavailable ability keeps
    /// cooling down but cannot be used.
    pub fn set_available(&mut self, available: bool) {
        adjust_suppression(&mut self.unavailable_count, available);
    }

    pub fn is_ready(&self) -> bool {
        self.is_active()
            && self.is_available()
            && (self.cooldown.is_completed() || self.charges > 0)
    }

    pub fn control(&self) -> Option<&dyn ControlModule> {
        self.control.as_deref()
    }

    pub fn control_mut(&mut self) -> Option<&mut (dyn ControlModule + 'static)> {
        self.control.as_deref_mut()
    }

    pub fn set_control(&mut self, control: Box<dyn ControlModule>) {
        self.control = Some(control);
    }

    pub fn register_listener(&mut self, listener: impl Listener<AbilityEvent> + 'static) {
        self.listeners.register(listener);
    }

    /// Uses the ability for `entity` if it is ready.
    ///
    /// Returns `false` without side effects when not ready. Otherwise the charge or
    /// cooldown cost is paid, the continuation starts if `start_use` agreed, and
    /// `true` is returned. Using an ability whose continuation is still running
    /// replaces that continuation.
    pub fn invoke(&mut self, entity: &mut Entity, commands: &mut Vec<Command>) -> bool {
        if !self.is_ready() {
            return false;
        }

        let success = {
            let mut ctx = AbilityContext::new(entity, commands, self.control.as_deref(), 0.0);
            self.behavior.start_use(&mut ctx)
        };
        self.emit(AbilityEvent::UseStarted {
            ability: self.name.clone(),
            success,
        });

        if self.charges > 0 {
            self.charges -= 1;
        } else if self.cooldown.is_completed() || self.charges < self.charges_max {
            self.cooldown.reset();
        }

        if success {
            self.invocation = Invocation::Running(Progress::default());
        }
        debug!(
            ability = %self.name,
            entity = %entity.id(),
            success,
            charges = self.charges,
            "ability used"
        );
        true
    }

    /// Advances the ability by `dt` seconds.
    ///
    /// While running, the continuation takes one step and the cooldown waits.
    /// Otherwise the cooldown counts down (only while active) and a ready ability
    /// whose control reports a press is used.
    pub fn tick(&mut self, entity: &mut Entity, commands: &mut Vec<Command>, dt: f64) {
        if let Invocation::Running(progress) = &mut self.invocation {
            let outcome = {
                let mut ctx =
                    AbilityContext::new(entity, commands, self.control.as_deref(), dt);
                self.behavior.continue_use(&mut ctx, progress)
            };

            let finished = match outcome {
                Ok(Step::Yield) => {
                    progress.step += 1;
                    progress.elapsed += dt;
                    false
                }
                Ok(Step::Complete) => true,
                Err(err) => {
                    warn!(
                        ability = %self.name,
                        step = progress.step,
                        error = %err,
                        "ability continuation failed; ending use"
                    );
                    true
                }
            };

            if finished {
                self.finish(entity, commands, dt);
            }
            return;
        }

        if self.is_active() && !self.cooldown.is_completed() {
            if self.cooldown.tick(dt) {
                self.complete_cooldown();
            }
        } else if self.is_ready() && self.control.as_ref().is_some_and(|c| c.poll_start()) {
            self.invoke(entity, commands);
        }
    }

    /// Latches the control state for the next tick.
    pub fn update_control(&mut self) {
        if let Some(control) = self.control.as_mut() {
            control.update();
        }
    }

    fn finish(&mut self, entity: &mut Entity, commands: &mut Vec<Command>, dt: f64) {
        self.invocation = Invocation::Idle;
        {
            let mut ctx = AbilityContext::new(entity, commands, self.control.as_deref(), dt);
            self.behavior.end_use(&mut ctx);
        }
        debug!(ability = %self.name, entity = %entity.id(), "ability use ended");
        self.emit(AbilityEvent::UseEnded {
            ability: self.name.clone(),
        });
    }

    fn complete_cooldown(&mut self) {
        self.cooldown.complete();
        self.emit(AbilityEvent::CooldownCompleted {
            ability: self.name.clone(),
        });

        if self.charges < self.charges_max {
            self.charges += 1;
            debug!(ability = %self.name, charges = self.charges, "charge gained");
            self.emit(AbilityEvent::ChargeGained {
                ability: self.name.clone(),
                charges: self.charges,
            });
            if self.charges < self.charges_max {
                self.cooldown.reset();
            }
        }
    }

    fn emit(&mut self, event: AbilityEvent) {
        self.listeners.emit(&event);
    }
}

fn adjust_suppression(count: &mut i32, enabled: bool) {
    if enabled {
        *count = (*count - 1).max(0);
    } else {
        *count += 1;
    }
}

impl PartialEq for Ability {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Ability {}

impl Hash for Ability {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [cooldown: {}, charges: {} / {}]",
            self.name, self.cooldown, self.charges, self.charges_max
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityId, EntityStats};
    use crate::events::EventLog;

    /// Instant ability: `start_use` declines to continue.
    #[derive(Debug)]
    struct Instant;

    impl AbilityBehavior for Instant {}

    /// Runs `steps` yielding steps, then completes.
    #[derive(Debug)]
    struct Steps {
        steps: u32,
        ended: bool,
    }

    impl AbilityBehavior for Steps {
        fn start_use(&mut self, _ctx: &mut AbilityContext<'_>) -> bool {
            true
        }

        fn continue_use(
            &mut self,
            _ctx: &mut AbilityContext<'_>,
            progress: &Progress,
        ) -> Result<Step, ContinuationError> {
            if progress.step < self.steps {
                Ok(Step::Yield)
            } else {
                Ok(Step::Complete)
            }
        }

        fn end_use(&mut self, _ctx: &mut AbilityContext<'_>) {
            self.ended = true;
        }
    }

    #[derive(Debug)]
    struct Faulty;

    impl AbilityBehavior for Faulty {
        fn start_use(&mut self, _ctx: &mut AbilityContext<'_>) -> bool {
            true
        }

        fn continue_use(
            &mut self,
            _ctx: &mut AbilityContext<'_>,
            _progress: &Progress,
        ) -> Result<Step, ContinuationError> {
            Err(ContinuationError::new("target vanished"))
        }
    }

    fn caster() -> (Entity, Vec<Command>) {
        (Entity::new(EntityId(1), EntityStats::default()), Vec::new())
    }

    #[test]
    fn rejects_invalid_definitions() {
        assert_eq!(Ability::new("", 1.0, 0, Instant).unwrap_err(), AbilityError::EmptyName);
        assert!(matches!(
            Ability::new("dash", 1.0, -1, Instant),
            Err(AbilityError::InvalidChargesMax { .. })
        ));
        assert!(matches!(
            Ability::new("dash", f64::NAN, 0, Instant),
            Err(AbilityError::InvalidCooldown { .. })
        ));
    }

    #[test]
    fn starts_cooling_down() {
        let (mut entity, mut commands) = caster();
        let mut ability = Ability::new("dash", 1.0, 0, Instant).unwrap();

        assert!(!ability.is_ready());
        assert!(!ability.invoke(&mut entity, &mut commands));

        ability.tick(&mut entity, &mut commands, 1.0);
        assert!(ability.is_ready());
    }

    #[test]
    fn charges_bank_one_per_cooldown_until_the_cap() {
        let (mut entity, mut commands) = caster();
        let mut ability = Ability::new("blink", 1.0, 2, Instant)
            .unwrap()
            .with_cooldown_completed();

        // No charges yet: the use restarts the cooldown.
        assert!(ability.invoke(&mut entity, &mut commands));
        assert_eq!(ability.charges(), 0);
        assert_eq!(ability.cooldown().value(), 1.0);

        // First completion banks a charge and restarts the cooldown.
        ability.tick(&mut entity, &mut commands, 1.0);
        assert_eq!(ability.charges(), 1);
        assert!(!ability.cooldown().is_completed());

        // Second completion reaches the cap and the cooldown stays completed.
        ability.tick(&mut entity, &mut commands, 1.0);
        assert_eq!(ability.charges(), 2);
        assert!(ability.cooldown().is_completed());

        ability.tick(&mut entity, &mut commands, 1.0);
        assert_eq!(ability.charges(), 2);
    }

    #[test]
    fn banked_charge_is_spent_before_the_cooldown() {
        let (mut entity, mut commands) = caster();
        let mut ability = Ability::new("blink", 4.0, 1, Instant)
            .unwrap()
            .with_cooldown_completed();

        ability.invoke(&mut entity, &mut commands);
        ability.tick(&mut entity, &mut commands, 4.0);
        assert_eq!(ability.charges(), 1);
        assert!(ability.cooldown().is_completed());

        assert!(ability.invoke(&mut entity, &mut commands));
        assert_eq!(ability.charges(), 0);
        assert!(ability.cooldown().is_completed());
    }

    #[test]
    fn failed_start_still_pays_the_cost() {
        let (mut entity, mut commands) = caster();
        let log = EventLog::new();
        let mut ability = Ability::new("fizzle", 2.0, 0, Instant)
            .unwrap()
            .with_cooldown_completed();
        ability.register_listener(log.clone());

        assert!(ability.invoke(&mut entity, &mut commands));
        assert!(!ability.in_use());
        assert!(!ability.is_ready());
        assert_eq!(
            log.events(),
            vec![AbilityEvent::UseStarted {
                ability: "fizzle".into(),
                success: false
            }]
        );
    }

    #[test]
    fn continuation_runs_one_step_per_tick() {
        let (mut entity, mut commands) = caster();
        let log = EventLog::new();
        let mut ability = Ability::new(
            "channel",
            5.0,
            0,
            Steps {
                steps: 2,
                ended: false,
            },
        )
        .unwrap()
        .with_cooldown_completed();
        ability.register_listener(log.clone());

        ability.invoke(&mut entity, &mut commands);
        assert!(ability.in_use());

        ability.tick(&mut entity, &mut commands, 0.5);
        ability.tick(&mut entity, &mut commands, 0.5);
        assert_eq!(
            ability.invocation(),
            &Invocation::Running(Progress {
                step: 2,
                elapsed: 1.0
            })
        );
        // Cooldown is suspended while running.
        assert_eq!(ability.cooldown().value(), 5.0);

        ability.tick(&mut entity, &mut commands, 0.5);
        assert!(!ability.in_use());
        assert_eq!(
            log.count(|e| matches!(e, AbilityEvent::UseEnded { .. })),
            1
        );
    }

    #[test]
    fn failing_step_ends_the_use_cleanly() {
        let (mut entity, mut commands) = caster();
        let log = EventLog::new();
        let mut ability = Ability::new("faulty", 1.0, 0, Faulty)
            .unwrap()
            .with_cooldown_completed();
        ability.register_listener(log.clone());

        ability.invoke(&mut entity, &mut commands);
        ability.tick(&mut entity, &mut commands, 0.1);

        assert!(!ability.in_use());
        assert_eq!(log.count(|e| matches!(e, AbilityEvent::UseEnded { .. })), 1);

        ability.tick(&mut entity, &mut commands, 1.0);
        assert!(ability.is_ready());
    }

    #[test]
    fn suppression_is_reference_counted() {
        let mut ability = Ability::new("dash", 0.0, 0, Instant).unwrap();
        assert!(ability.is_ready());

        ability.set_active(false);
        ability.set_active(false);
        ability.set_active(true);
        assert!(!ability.is_ready());
        ability.set_active(true);
        ability.set_active(true);
        assert!(ability.is_active());

        ability.set_available(false);
        assert!(!ability.is_ready());
        ability.set_available(true);
        assert!(ability.is_ready());
    }

    #[test]
    fn inactive_ability_does_not_cool_down() {
        let (mut entity, mut commands) = caster();
        let mut ability = Ability::new("dash", 1.0, 0, Instant).unwrap();
        ability.set_active(false);

        ability.tick(&mut entity, &mut commands, 5.0);
        assert_eq!(ability.cooldown().value(), 1.0);
    }

    #[test]
    fn pressed_control_uses_ready_ability() {
        let (mut entity, mut commands) = caster();
        let mut ability = Ability::new("dash", 1.0, 0, Instant)
            .unwrap()
            .with_cooldown_completed()
            .with_control(AiControl::new());

        if let Some(control) = ability.control_mut() {
            control.tap();
        }
        ability.tick(&mut entity, &mut commands, 0.1);

        assert!(!ability.cooldown().is_completed());
    }
}
