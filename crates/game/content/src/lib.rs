//! Data-driven content definitions and loaders.
//!
//! This crate provides the stock behaviors plugged into `skirmish-core` and the
//! catalogs that describe them as data:
//! - Status components (damage over time, slows, shield blocks, death vetoes, ...)
//! - Ability behaviors (bolts, barriers, channels)
//! - Bullet behaviors
//! - Status and ability catalogs (data-driven via RON)
//! - Game configuration (data-driven via TOML)

pub mod abilities;
pub mod bullets;
pub mod catalog;
pub mod components;
pub mod error;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use abilities::{Barrier, Bolt, Channel};
pub use bullets::Projectile;
pub use catalog::{
    AbilityCatalog, AbilitySpec, BehaviorSpec, ComponentSpec, StatusCatalog, StatusSpec,
};
pub use components::{
    DamageAmplifier, DamageOverTime, Invulnerable, Lifesteal, MovespeedModifier, ShieldBlock,
    Undying,
};
pub use error::ContentError;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ConfigLoader, Content, ContentFactory, LoadResult, StatusLoader,
};
