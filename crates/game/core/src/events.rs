//! Synchronous event listeners for entities and abilities.
//!
//! Listeners are plain observers: they are registered on an [`Entity`](crate::Entity)
//! or [`Ability`](crate::Ability) and invoked in registration order, after the
//! entity's status components have seen the same event. They receive the event by
//! reference only and cannot mutate the simulation.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::entity::{CombatSnapshot, EntityId};

/// Receives events of type `E`.
pub trait Listener<E> {
    fn notify(&mut self, event: &E);
}

impl<E, F> Listener<E> for F
where
    F: FnMut(&E),
{
    fn notify(&mut self, event: &E) {
        self(event)
    }
}

/// Ordered set of listeners for one event type.
pub struct Listeners<E> {
    entries: Vec<Box<dyn Listener<E>>>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, listener: impl Listener<E> + 'static) {
        self.entries.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: &E) {
        for listener in &mut self.entries {
            listener.notify(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Events emitted by an [`Entity`](crate::Entity).
#[derive(Clone, Debug, PartialEq)]
pub enum EntityEvent {
    /// End of the entity's tick.
    Updated { entity: EntityId, dt: f64 },
    DamageTaken(CombatSnapshot),
    DamageDealt(CombatSnapshot),
    /// Health actually restored (after clamping to the maximum).
    Healed { entity: EntityId, amount: f64 },
    ShieldDepleted { entity: EntityId },
    ShieldStartRecharge { entity: EntityId },
    ShieldRecharged { entity: EntityId },
    /// Death was confirmed by every active status.
    Died { entity: EntityId },
    StatusAdded { entity: EntityId, name: String },
    StatusRemoved { entity: EntityId, name: String },
    StacksChanged {
        entity: EntityId,
        name: String,
        old: i32,
        new: i32,
    },
}

/// Events emitted by an [`Ability`](crate::Ability).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbilityEvent {
    /// `success` reports whether a continuation was started.
    UseStarted { ability: String, success: bool },
    UseEnded { ability: String },
    CooldownCompleted { ability: String },
    ChargeGained { ability: String, charges: i32 },
}

/// Records every event it is notified of.
///
/// Clones share the same storage, so a clone can be registered as a listener while
/// the original is kept for inspection.
#[derive(Debug)]
pub struct EventLog<E> {
    events: Rc<RefCell<Vec<E>>>,
}

impl<E: Clone> EventLog<E> {
    pub fn new() -> Self {
        Self {
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Returns a copy of the recorded events.
    pub fn events(&self) -> Vec<E> {
        self.events.borrow().clone()
    }

    /// Counts recorded events matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&E) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| predicate(e)).count()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl<E: Clone> Default for EventLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EventLog<E> {
    fn clone(&self) -> Self {
        Self {
            events: Rc::clone(&self.events),
        }
    }
}

impl<E: Clone> Listener<E> for EventLog<E> {
    fn notify(&mut self, event: &E) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listeners_run_in_registration_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::<AbilityEvent>::new();

        for tag in ["first", "second", "third"] {
            let order = Rc::clone(&order);
            listeners.register(move |_: &AbilityEvent| order.borrow_mut().push(tag));
        }

        listeners.emit(&AbilityEvent::UseEnded {
            ability: "dash".into(),
        });

        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn event_log_clones_share_storage() {
        let log = EventLog::<AbilityEvent>::new();
        let mut listeners = Listeners::new();
        listeners.register(log.clone());

        listeners.emit(&AbilityEvent::CooldownCompleted {
            ability: "dash".into(),
        });

        assert_eq!(log.len(), 1);
        assert_eq!(
            log.count(|e| matches!(e, AbilityEvent::CooldownCompleted { .. })),
            1
        );

        log.clear();
        assert!(log.is_empty());
    }
}
