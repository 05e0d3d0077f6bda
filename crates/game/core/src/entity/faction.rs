use bitflags::bitflags;

bitflags! {
    /// Affiliation of an entity, used to decide which entities a bullet may hit.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct Faction: u8 {
        const NEUTRAL = 1 << 0;
        const PLAYER  = 1 << 1;
        const ENEMY   = 1 << 2;
    }
}

impl Faction {
    /// Factions an attack from this faction is allowed to hit.
    ///
    /// Everything outside the affiliation, so an entity never hits its own side.
    pub fn hit_mask(self) -> Faction {
        !self
    }

    /// Returns true if an attack from `self` may hit an entity of `target`.
    pub fn can_hit(self, target: Faction) -> bool {
        self.hit_mask().intersects(target)
    }
}

bitflags! {
    /// Modifiers for a single damage resolution.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct DamageFlags: u8 {
        /// Skip the shield phase entirely; the shield is left untouched.
        const IGNORE_SHIELD = 1 << 0;
        /// Always run the health phase, even when the shield absorbed the hit.
        const PIERCE_SHIELD = 1 << 1;
        /// Damage caused in reaction to other damage (reflection, amplification).
        /// Reactive components ignore it so reactions cannot feed each other.
        const SECONDARY     = 1 << 2;
    }
}
