use skirmish_core::{DamageFlags, EntityId, Status, StatusComponent};

use crate::components::{
    DamageAmplifier, DamageOverTime, Invulnerable, Lifesteal, MovespeedModifier, ShieldBlock,
    Undying,
};
use crate::error::ContentError;

/// One component of a status definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ComponentSpec {
    DamageOverTime {
        per_second: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        flags: DamageFlags,
    },
    Movespeed {
        factor: f64,
    },
    ShieldBlock,
    DamageAmplifier {
        bonus: f64,
    },
    Undying {
        heal: f64,
    },
    Lifesteal {
        fraction: f64,
    },
    Invulnerable,
}

impl ComponentSpec {
    /// Builds a component for the status `owner`.
    ///
    /// `source` attributes damage-over-time ticks to the entity that applied the
    /// status.
    pub fn build(
        &self,
        owner: &str,
        source: Option<EntityId>,
    ) -> Result<Box<dyn StatusComponent>, ContentError> {
        let component: Box<dyn StatusComponent> = match *self {
            Self::DamageOverTime { per_second, flags } => {
                let mut dot = DamageOverTime::new(per_second).with_flags(flags);
                dot.source = source;
                Box::new(dot)
            }
            Self::Movespeed { factor } => {
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(ContentError::invalid(
                        owner,
                        format!("movespeed factor must be positive, got {factor}"),
                    ));
                }
                Box::new(MovespeedModifier::new(factor))
            }
            Self::ShieldBlock => Box::new(ShieldBlock),
            Self::DamageAmplifier { bonus } => Box::new(DamageAmplifier::new(bonus)),
            Self::Undying { heal } => Box::new(Undying::new(heal)),
            Self::Lifesteal { fraction } => Box::new(Lifesteal::new(fraction)),
            Self::Invulnerable => Box::new(Invulnerable),
        };
        Ok(component)
    }
}

fn default_stacks_max() -> i32 {
    1
}

fn default_stack_decay_rate() -> i32 {
    -1
}

/// Definition of a status.
///
/// Omitted fields default to a single stack that is removed outright on expiry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSpec {
    pub name: String,
    pub duration: f64,
    #[cfg_attr(feature = "serde", serde(default = "default_stacks_max"))]
    pub stacks_max: i32,
    #[cfg_attr(feature = "serde", serde(default = "default_stack_decay_rate"))]
    pub stack_decay_rate: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub components: Vec<ComponentSpec>,
}

impl StatusSpec {
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
            stacks_max: default_stacks_max(),
            stack_decay_rate: default_stack_decay_rate(),
            components: Vec::new(),
        }
    }

    pub fn with_stacks(mut self, stacks_max: i32, stack_decay_rate: i32) -> Self {
        self.stacks_max = stacks_max;
        self.stack_decay_rate = stack_decay_rate;
        self
    }

    pub fn with_component(mut self, component: ComponentSpec) -> Self {
        self.components.push(component);
        self
    }

    pub fn build(&self) -> Result<Status, ContentError> {
        self.build_from(None)
    }

    /// Builds the status as applied by `source`.
    pub fn build_from(&self, source: Option<EntityId>) -> Result<Status, ContentError> {
        let mut status = Status::new(
            self.name.as_str(),
            self.duration,
            self.stacks_max,
            self.stack_decay_rate,
        )?;
        for component in &self.components {
            status.push_component(component.build(&self.name, source)?);
        }
        Ok(status)
    }
}

/// Named status definitions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusCatalog {
    pub statuses: Vec<StatusSpec>,
}

impl StatusCatalog {
    pub fn new(statuses: Vec<StatusSpec>) -> Self {
        Self { statuses }
    }

    pub fn get(&self, name: &str) -> Option<&StatusSpec> {
        self.statuses.iter().find(|spec| spec.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.statuses.iter().map(|spec| spec.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn instantiate(&self, name: &str) -> Result<Status, ContentError> {
        self.instantiate_from(name, None)
    }

    pub fn instantiate_from(
        &self,
        name: &str,
        source: Option<EntityId>,
    ) -> Result<Status, ContentError> {
        self.get(name)
            .ok_or_else(|| ContentError::UnknownStatus(name.to_owned()))?
            .build_from(source)
    }

    /// Checks that names are unique and every definition builds.
    pub fn validate(&self) -> Result<(), ContentError> {
        super::ensure_unique("status", self.names())?;
        for spec in &self.statuses {
            spec.build()?;
        }
        Ok(())
    }
}
