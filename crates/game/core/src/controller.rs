//! One entity together with the abilities it can use.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::ability::{Ability, ControlModule};
use crate::command::Command;
use crate::config::GameConfig;
use crate::entity::{Entity, EntityId};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("controller {entity} has no free ability slot for `{ability}` (max {max})")]
    SlotsFull {
        entity: EntityId,
        ability: String,
        max: usize,
    },

    #[error("controller {entity} already has an ability named `{ability}`")]
    DuplicateAbility { entity: EntityId, ability: String },

    #[error("controller {entity} has no ability named `{ability}`")]
    UnknownAbility { entity: EntityId, ability: String },

    #[error("controller {entity} has no ability slot {index} ({len} in use)")]
    SlotOutOfRange {
        entity: EntityId,
        index: usize,
        len: usize,
    },
}

impl GameError for ControllerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SlotsFull { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::SlotsFull { .. } => "CONTROLLER_SLOTS_FULL",
            Self::DuplicateAbility { .. } => "CONTROLLER_DUPLICATE_ABILITY",
            Self::UnknownAbility { .. } => "CONTROLLER_UNKNOWN_ABILITY",
            Self::SlotOutOfRange { .. } => "CONTROLLER_SLOT_OUT_OF_RANGE",
        }
    }
}

/// Drives an entity and its abilities once per tick and collects the commands they
/// issue for the host.
#[derive(Debug)]
pub struct Controller {
    entity: Entity,
    abilities: ArrayVec<Ability, { GameConfig::MAX_ABILITIES }>,
    commands: Vec<Command>,
}

impl Controller {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            abilities: ArrayVec::new(),
            commands: Vec::new(),
        }
    }

    pub fn with_ability(mut self, ability: Ability) -> Result<Self, ControllerError> {
        self.add_ability(ability)?;
        Ok(self)
    }

    pub fn id(&self) -> EntityId {
        self.entity.id()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    /// Adds an ability in the next free slot and returns the slot index.
    pub fn add_ability(&mut self, ability: Ability) -> Result<usize, ControllerError> {
        if self.find_ability(ability.name()).is_some() {
            return Err(ControllerError::DuplicateAbility {
                entity: self.id(),
                ability: ability.name().to_owned(),
            });
        }
        if let Err(err) = self.abilities.try_push(ability) {
            return Err(ControllerError::SlotsFull {
                entity: self.id(),
                ability: err.element().name().to_owned(),
                max: GameConfig::MAX_ABILITIES,
            });
        }
        Ok(self.abilities.len() - 1)
    }

    pub fn abilities(&self) -> &[Ability] {
        &self.abilities
    }

    pub fn ability(&self, index: usize) -> Option<&Ability> {
        self.abilities.get(index)
    }

    pub fn ability_mut(&mut self, index: usize) -> Option<&mut Ability> {
        self.abilities.get_mut(index)
    }

    pub fn find_ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.name() == name)
    }

    pub fn find_ability_mut(&mut self, name: &str) -> Option<&mut Ability> {
        self.abilities.iter_mut().find(|a| a.name() == name)
    }

    /// Control of the named ability, for relaying presses and releases.
    pub fn control_mut(&mut self, name: &str) -> Option<&mut (dyn ControlModule + 'static)> {
        self.find_ability_mut(name).and_then(Ability::control_mut)
    }

    /// Uses the ability in slot `index`. `Ok(false)` means it was not ready.
    pub fn use_ability(&mut self, index: usize) -> Result<bool, ControllerError> {
        let len = self.abilities.len();
        let entity = self.entity.id();
        let ability = self
            .abilities
            .get_mut(index)
            .ok_or(ControllerError::SlotOutOfRange { entity, index, len })?;
        Ok(ability.invoke(&mut self.entity, &mut self.commands))
    }

    pub fn use_ability_by_name(&mut self, name: &str) -> Result<bool, ControllerError> {
        let entity = self.entity.id();
        let ability = self
            .abilities
            .iter_mut()
            .find(|a| a.name() == name)
            .ok_or_else(|| ControllerError::UnknownAbility {
                entity,
                ability: name.to_owned(),
            })?;
        Ok(ability.invoke(&mut self.entity, &mut self.commands))
    }

    /// Ticks the entity, then every ability in slot order, then latches controls.
    pub fn tick(&mut self, dt: f64) {
        self.entity.tick(dt);
        for ability in &mut self.abilities {
            ability.tick(&mut self.entity, &mut self.commands, dt);
        }
        for ability in &mut self.abilities {
            ability.update_control();
        }
    }

    /// Takes every command issued by the entity's statuses and by abilities.
    pub fn drain_commands(&mut self) -> Vec<Command> {
        let mut commands = self.entity.drain_commands();
        commands.append(&mut self.commands);
        if !commands.is_empty() {
            debug!(entity = %self.id(), count = commands.len(), "commands drained");
        }
        commands
    }

    /// Reverts every status and hands back the entity.
    pub fn despawn(mut self) -> Entity {
        self.entity.clear_statuses();
        self.entity
    }
}
