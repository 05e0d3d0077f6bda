/// Simulation constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Seconds an entity stays "in combat" after dealing or taking damage.
    pub combat_timer_max: f64,

    /// Length of one simulation step in seconds.
    pub fixed_timestep: f64,

    /// Upper bound on whole steps a host may run for a single frame before
    /// dropping the remaining accumulated time.
    pub max_steps_per_frame: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Ability slots per controller.
    pub const MAX_ABILITIES: usize = 8;
    /// Distinct statuses an entity can carry at once.
    pub const MAX_STATUSES: usize = 32;
    /// Nested command flushes allowed before further commands are dropped.
    ///
    /// Guards against components that answer damage with damage forever.
    pub const MAX_COMMAND_DEPTH: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBAT_TIMER_MAX: f64 = 5.0;
    pub const DEFAULT_FIXED_TIMESTEP: f64 = 1.0 / 60.0;
    pub const DEFAULT_MAX_STEPS_PER_FRAME: u32 = 8;

    pub fn new() -> Self {
        Self {
            combat_timer_max: Self::DEFAULT_COMBAT_TIMER_MAX,
            fixed_timestep: Self::DEFAULT_FIXED_TIMESTEP,
            max_steps_per_frame: Self::DEFAULT_MAX_STEPS_PER_FRAME,
        }
    }

    pub fn with_combat_timer_max(mut self, seconds: f64) -> Self {
        self.combat_timer_max = seconds;
        self
    }

    pub fn with_fixed_timestep(mut self, seconds: f64) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
