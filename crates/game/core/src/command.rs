//! Requests that reach beyond the issuing entity.
//!
//! Entities, statuses and abilities only own their own state. Anything that touches
//! another entity or creates a new object is expressed as a [`Command`] and queued on
//! the [`Controller`](crate::Controller), where the host drains and executes it.

use crate::bullet::Bullet;
use crate::entity::{DamageFlags, EntityId};

#[derive(Debug)]
pub enum Command {
    /// Deal damage to `target`, attributed to `source` when present.
    Damage {
        target: EntityId,
        source: Option<EntityId>,
        amount: f64,
        flags: DamageFlags,
    },
    SpawnBullet(Bullet),
}

impl Command {
    pub fn damage(target: EntityId, source: Option<EntityId>, amount: f64) -> Self {
        Self::Damage {
            target,
            source,
            amount,
            flags: DamageFlags::empty(),
        }
    }
}
