//! Timed, stackable status effects.
//!
//! A [`Status`] is a named bundle of [`StatusComponent`]s with a duration and a stack
//! count. The entity carrying it keys statuses by name: applying a status whose name
//! is already present adds a stack to the existing one instead of replacing it.
//!
//! # Stack decay
//!
//! When the duration runs out the stack count decays according to [`StackDecay`]:
//!
//! | rate  | policy               | effect on expiry                               |
//! |-------|----------------------|------------------------------------------------|
//! | `< 0` | [`StackDecay::All`]  | stacks drop to 0 and the status is removed     |
//! | `0`   | [`StackDecay::None`] | stacks are kept and the duration restarts      |
//! | `> 0` | [`StackDecay::By`]   | stacks drop by the rate; restarts if any remain |

mod component;

pub use component::{StatusComponent, StatusContext};
pub(crate) use component::StatusCommand;

use core::fmt;
use core::hash::{Hash, Hasher};

use crate::entity::{CombatSnapshot, EntityId};
use crate::error::{ErrorSeverity, GameError};
use crate::timer::{CountdownTimer, TimerError};

/// Errors raised when building or applying a status.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum StatusError {
    #[error("status name must not be empty")]
    EmptyName,

    #[error("status `{name}` must allow at least one stack (stacks_max = {stacks_max})")]
    InvalidStacksMax { name: String, stacks_max: i32 },

    #[error("status `{name}` has an invalid duration: {source}")]
    InvalidDuration {
        name: String,
        #[source]
        source: TimerError,
    },

    #[error("entity {entity} already carries {max} statuses; `{name}` was not applied")]
    CapacityExceeded {
        entity: EntityId,
        name: String,
        max: usize,
    },
}

impl GameError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::CapacityExceeded { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyName => "STATUS_EMPTY_NAME",
            Self::InvalidStacksMax { .. } => "STATUS_INVALID_STACKS_MAX",
            Self::InvalidDuration { .. } => "STATUS_INVALID_DURATION",
            Self::CapacityExceeded { .. } => "STATUS_CAPACITY_EXCEEDED",
        }
    }
}

/// How a status loses stacks when its duration runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackDecay {
    /// Every stack is lost at once.
    All,
    /// Stacks never decay; the status lasts until removed.
    None,
    /// This many stacks are lost per expiry.
    By(i32),
}

impl StackDecay {
    pub fn from_rate(rate: i32) -> Self {
        match rate {
            r if r < 0 => Self::All,
            0 => Self::None,
            r => Self::By(r),
        }
    }

    pub fn rate(self) -> i32 {
        match self {
            Self::All => -1,
            Self::None => 0,
            Self::By(rate) => rate,
        }
    }

    /// Stack count left after one expiry.
    pub fn apply(self, stacks: i32) -> i32 {
        match self {
            Self::All => 0,
            Self::None => stacks,
            Self::By(rate) => (stacks - rate).max(0),
        }
    }
}

impl From<i32> for StackDecay {
    fn from(rate: i32) -> Self {
        Self::from_rate(rate)
    }
}

/// Stack count transition, reported so the carrier can emit an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackChange {
    pub old: i32,
    pub new: i32,
}

/// A named, stackable, timed bundle of components.
#[derive(Debug)]
pub struct Status {
    name: String,
    duration: CountdownTimer,
    stack_count: i32,
    stacks_max: i32,
    stack_decay: StackDecay,
    components: Vec<Box<dyn StatusComponent>>,
}

impl Status {
    /// Creates a status with one stack and no components.
    ///
    /// `duration` is in seconds; see [`StackDecay::from_rate`] for `stack_decay_rate`.
    pub fn new(
        name: impl Into<String>,
        duration: f64,
        stacks_max: i32,
        stack_decay_rate: i32,
    ) -> Result<Self, StatusError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StatusError::EmptyName);
        }
        if stacks_max < 1 {
            return Err(StatusError::InvalidStacksMax { name, stacks_max });
        }
        let duration = match CountdownTimer::new(duration) {
            Ok(timer) => timer,
            Err(source) => return Err(StatusError::InvalidDuration { name, source }),
        };

        Ok(Self {
            name,
            duration,
            stack_count: 1,
            stacks_max,
            stack_decay: StackDecay::from_rate(stack_decay_rate),
            components: Vec::new(),
        })
    }

    pub fn with_component(mut self, component: impl StatusComponent + 'static) -> Self {
        self.components.push(Box::new(component));
        self
    }

    pub fn push_component(&mut self, component: Box<dyn StatusComponent>) {
        self.components.push(component);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> &CountdownTimer {
        &self.duration
    }

    pub fn stack_count(&self) -> i32 {
        self.stack_count
    }

    pub fn stacks_max(&self) -> i32 {
        self.stacks_max
    }

    pub fn stack_decay(&self) -> StackDecay {
        self.stack_decay
    }

    pub fn stack_decay_rate(&self) -> i32 {
        self.stack_decay.rate()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// True once decay has taken every stack; the carrier removes it on its next pass.
    pub fn is_expired(&self) -> bool {
        self.stack_count <= 0
    }

    fn broadcast(
        &mut self,
        ctx: &mut StatusContext<'_>,
        mut hook: impl FnMut(&mut dyn StatusComponent, &mut StatusContext<'_>),
    ) {
        ctx.enter(&self.name, self.stack_count);
        for component in &mut self.components {
            hook(component.as_mut(), ctx);
        }
    }

    /// Sets the stack count, clamped to `[0, stacks_max]`.
    ///
    /// Components are told about the change only when the count actually moves.
    pub(crate) fn set_stack_count(
        &mut self,
        ctx: &mut StatusContext<'_>,
        count: i32,
    ) -> Option<StackChange> {
        let old = self.stack_count;
        let new = count.clamp(0, self.stacks_max);
        if old == new {
            return None;
        }

        self.stack_count = new;
        self.broadcast(ctx, |c, ctx| c.on_stacks_changed(ctx, old, new));
        Some(StackChange { old, new })
    }

    pub(crate) fn increment_stack_count(
        &mut self,
        ctx: &mut StatusContext<'_>,
        amount: i32,
    ) -> Option<StackChange> {
        self.set_stack_count(ctx, self.stack_count.saturating_add(amount))
    }

    /// Advances the duration, applying stack decay on expiry, then updates components.
    pub(crate) fn tick(&mut self, ctx: &mut StatusContext<'_>, dt: f64) -> Option<StackChange> {
        let mut change = None;
        if self.duration.tick(dt) {
            let remaining = self.stack_decay.apply(self.stack_count);
            change = self.set_stack_count(ctx, remaining);
            if self.stack_count > 0 {
                self.duration.reset();
            }
        }

        self.broadcast(ctx, |c, ctx| c.on_update(ctx, dt));
        change
    }

    pub(crate) fn apply(&mut self, ctx: &mut StatusContext<'_>) {
        self.broadcast(ctx, |c, ctx| c.on_apply(ctx));
    }

    pub(crate) fn revert(&mut self, ctx: &mut StatusContext<'_>) {
        self.duration.complete();
        self.broadcast(ctx, |c, ctx| c.on_revert(ctx));
    }

    /// Asks every component whether the carrier may die.
    ///
    /// All components are consulted even after a veto.
    pub(crate) fn vote_death(&mut self, ctx: &mut StatusContext<'_>) -> bool {
        let mut allow = true;
        self.broadcast(ctx, |c, ctx| allow &= c.on_death(ctx));
        allow
    }

    pub(crate) fn damage_taken(&mut self, ctx: &mut StatusContext<'_>, snapshot: &CombatSnapshot) {
        self.broadcast(ctx, |c, ctx| c.on_damage_taken(ctx, snapshot));
    }

    pub(crate) fn damage_dealt(&mut self, ctx: &mut StatusContext<'_>, snapshot: &CombatSnapshot) {
        self.broadcast(ctx, |c, ctx| c.on_damage_dealt(ctx, snapshot));
    }

    pub(crate) fn healed(&mut self, ctx: &mut StatusContext<'_>, amount: f64) {
        self.broadcast(ctx, |c, ctx| c.on_healed(ctx, amount));
    }

    pub(crate) fn shield_depleted(&mut self, ctx: &mut StatusContext<'_>) {
        self.broadcast(ctx, |c, ctx| c.on_shield_depleted(ctx));
    }

    pub(crate) fn shield_recharged(&mut self, ctx: &mut StatusContext<'_>) {
        self.broadcast(ctx, |c, ctx| c.on_shield_recharged(ctx));
    }

    pub(crate) fn shield_start_recharge(&mut self, ctx: &mut StatusContext<'_>) {
        self.broadcast(ctx, |c, ctx| c.on_shield_start_recharge(ctx));
    }

    pub(crate) fn status_added(&mut self, ctx: &mut StatusContext<'_>, name: &str) {
        self.broadcast(ctx, |c, ctx| c.on_status_added(ctx, name));
    }

    pub(crate) fn status_removed(&mut self, ctx: &mut StatusContext<'_>, name: &str) {
        self.broadcast(ctx, |c, ctx| c.on_status_removed(ctx, name));
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{}/{} ({})",
            self.name, self.stack_count, self.stacks_max, self.duration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityStats;

    #[derive(Debug, Default)]
    struct Veto;

    impl StatusComponent for Veto {
        fn on_death(&mut self, _ctx: &mut StatusContext<'_>) -> bool {
            false
        }
    }

    /// Counts its death votes through the carrier's movespeed so the test can see it.
    #[derive(Debug, Default)]
    struct CountingVote;

    impl StatusComponent for CountingVote {
        fn on_death(&mut self, ctx: &mut StatusContext<'_>) -> bool {
            ctx.stats_mut().movespeed.stat.base += 1.0;
            true
        }
    }

    fn with_context<R>(f: impl FnOnce(&mut StatusContext<'_>) -> R) -> (R, EntityStats) {
        let mut stats = EntityStats::default();
        let mut commands = Vec::new();
        let result = {
            let mut ctx = StatusContext::new(EntityId(1), &mut stats, &mut commands);
            f(&mut ctx)
        };
        (result, stats)
    }

    #[test]
    fn rejects_invalid_definitions() {
        assert_eq!(Status::new("", 1.0, 1, 0).unwrap_err(), StatusError::EmptyName);
        assert!(matches!(
            Status::new("burn", 1.0, 0, 0),
            Err(StatusError::InvalidStacksMax { stacks_max: 0, .. })
        ));
        assert!(matches!(
            Status::new("burn", -1.0, 1, 0),
            Err(StatusError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn decay_rate_maps_to_policy() {
        assert_eq!(StackDecay::from_rate(-3), StackDecay::All);
        assert_eq!(StackDecay::from_rate(0), StackDecay::None);
        assert_eq!(StackDecay::from_rate(2), StackDecay::By(2));

        assert_eq!(StackDecay::All.apply(5), 0);
        assert_eq!(StackDecay::None.apply(5), 5);
        assert_eq!(StackDecay::By(2).apply(5), 3);
        assert_eq!(StackDecay::By(2).apply(1), 0);
    }

    #[test]
    fn stacks_are_capped() {
        let mut status = Status::new("bleed", 1.0, 3, 1).unwrap();
        let (changes, _) = with_context(|ctx| {
            [
                status.increment_stack_count(ctx, 1),
                status.increment_stack_count(ctx, 1),
                status.increment_stack_count(ctx, 1),
            ]
        });

        assert_eq!(status.stack_count(), 3);
        assert_eq!(changes[0], Some(StackChange { old: 1, new: 2 }));
        assert_eq!(changes[2], None);
    }

    #[test]
    fn serial_decay_restarts_duration_while_stacks_remain() {
        let mut status = Status::new("bleed", 1.0, 5, 2).unwrap();
        with_context(|ctx| {
            status.set_stack_count(ctx, 3);
            status.tick(ctx, 1.0);
        });

        assert_eq!(status.stack_count(), 1);
        assert_eq!(status.duration().value(), 1.0);
        assert!(!status.is_expired());

        with_context(|ctx| status.tick(ctx, 1.0));
        assert!(status.is_expired());
        assert!(status.duration().is_completed());
    }

    #[test]
    fn zero_decay_persists_indefinitely() {
        let mut status = Status::new("aura", 0.5, 1, 0).unwrap();
        with_context(|ctx| {
            for _ in 0..10 {
                assert_eq!(status.tick(ctx, 0.5), None);
            }
        });

        assert_eq!(status.stack_count(), 1);
        assert!(!status.is_expired());
    }

    #[test]
    fn death_vote_consults_every_component() {
        let mut status = Status::new("last-stand", 1.0, 1, 0)
            .unwrap()
            .with_component(Veto)
            .with_component(CountingVote);

        let (allowed, stats) = with_context(|ctx| status.vote_death(ctx));

        assert!(!allowed);
        assert_eq!(stats.movespeed.stat.base, EntityStats::default().movespeed.stat.base + 1.0);
    }

    #[test]
    fn equality_is_by_name() {
        let a = Status::new("haste", 1.0, 1, 0).unwrap();
        let b = Status::new("haste", 9.0, 4, -1).unwrap().with_component(Veto);
        assert_eq!(a, b);
        assert_ne!(a, Status::new("slow", 1.0, 1, 0).unwrap());
    }
}
