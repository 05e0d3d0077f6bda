use skirmish_core::{Ability, AbilityBehavior, DamageFlags};

use super::StatusCatalog;
use crate::abilities::{Barrier, Bolt, Channel};
use crate::error::ContentError;

/// What an ability does, by kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BehaviorSpec {
    Bolt {
        damage: f64,
        lifetime: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        flags: DamageFlags,
        #[cfg_attr(feature = "serde", serde(default))]
        pierce: u32,
    },
    Barrier {
        steps: u32,
    },
    /// Applies the named status while held.
    Channel {
        status: String,
        #[cfg_attr(feature = "serde", serde(default))]
        max_steps: Option<u32>,
    },
}

impl BehaviorSpec {
    fn build(&self, statuses: &StatusCatalog) -> Result<Box<dyn AbilityBehavior>, ContentError> {
        let behavior: Box<dyn AbilityBehavior> = match self {
            Self::Bolt {
                damage,
                lifetime,
                flags,
                pierce,
            } => Box::new(
                Bolt::new(*damage, *lifetime)
                    .with_flags(*flags)
                    .with_pierce(*pierce),
            ),
            Self::Barrier { steps } => Box::new(Barrier::new(*steps)),
            Self::Channel { status, max_steps } => {
                let spec = statuses
                    .get(status)
                    .ok_or_else(|| ContentError::UnknownStatus(status.clone()))?;
                let mut channel = Channel::new(spec.clone());
                channel.max_steps = *max_steps;
                Box::new(channel)
            }
        };
        Ok(behavior)
    }
}

/// Definition of an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilitySpec {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub cooldown: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub charges_max: i32,
    /// Start with the cooldown completed instead of running.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start_ready: bool,
    pub behavior: BehaviorSpec,
}

impl AbilitySpec {
    pub fn new(name: impl Into<String>, cooldown: f64, behavior: BehaviorSpec) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cooldown,
            charges_max: 0,
            start_ready: false,
            behavior,
        }
    }

    pub fn build(&self, statuses: &StatusCatalog) -> Result<Ability, ContentError> {
        let behavior = self.behavior.build(statuses)?;
        let ability = Ability::from_boxed(
            self.name.as_str(),
            self.cooldown,
            self.charges_max,
            behavior,
        )?
        .with_description(self.description.as_str());

        Ok(if self.start_ready {
            ability.with_cooldown_completed()
        } else {
            ability
        })
    }
}

/// Named ability definitions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCatalog {
    pub abilities: Vec<AbilitySpec>,
}

impl AbilityCatalog {
    pub fn new(abilities: Vec<AbilitySpec>) -> Self {
        Self { abilities }
    }

    pub fn get(&self, name: &str) -> Option<&AbilitySpec> {
        self.abilities.iter().find(|spec| spec.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.abilities.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }

    pub fn instantiate(
        &self,
        name: &str,
        statuses: &StatusCatalog,
    ) -> Result<Ability, ContentError> {
        self.get(name)
            .ok_or_else(|| ContentError::UnknownAbility(name.to_owned()))?
            .build(statuses)
    }

    /// Checks that names are unique and every definition builds against `statuses`.
    pub fn validate(&self, statuses: &StatusCatalog) -> Result<(), ContentError> {
        super::ensure_unique("ability", self.names())?;
        for spec in &self.abilities {
            spec.build(statuses)?;
        }
        Ok(())
    }
}
