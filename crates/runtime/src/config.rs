//! Host configuration read from the environment.
use std::env;
use std::path::PathBuf;

use skirmish_core::GameConfig;

/// Settings for a headless simulation run.
///
/// Anything left unset defers to the loaded [`GameConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct RuntimeConfig {
    /// Simulation steps per second; overrides `GameConfig::fixed_timestep`.
    pub tick_rate: Option<f64>,
    /// Overrides `GameConfig::max_steps_per_frame`.
    pub max_steps_per_frame: Option<u32>,
    /// Directory holding `config.toml`, `statuses.ron` and `abilities.ron`.
    pub content_dir: PathBuf,
    /// Write logs to a file in this directory in addition to stderr.
    pub log_dir: Option<PathBuf>,
    /// Simulated seconds to run.
    pub duration: f64,
}

impl RuntimeConfig {
    pub const DEFAULT_DURATION: f64 = 10.0;

    /// Construct configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_TICK_RATE` - steps per second (must be positive)
    /// - `SKIRMISH_MAX_STEPS` - steps per frame before leftover time is dropped
    /// - `SKIRMISH_CONTENT_DIR` - content data directory (default: bundled data)
    /// - `SKIRMISH_LOG_DIR` - optional log file directory
    /// - `SKIRMISH_DURATION` - simulated seconds (default: 10)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`RuntimeConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(rate) = parse::<f64>(&lookup, "SKIRMISH_TICK_RATE") {
            config.tick_rate = (rate.is_finite() && rate > 0.0).then_some(rate);
        }
        if let Some(steps) = parse::<u32>(&lookup, "SKIRMISH_MAX_STEPS") {
            config.max_steps_per_frame = Some(steps.max(1));
        }
        if let Some(dir) = lookup("SKIRMISH_CONTENT_DIR") {
            config.content_dir = PathBuf::from(dir);
        }
        config.log_dir = lookup("SKIRMISH_LOG_DIR").map(PathBuf::from);
        if let Some(duration) = parse::<f64>(&lookup, "SKIRMISH_DURATION") {
            if duration.is_finite() && duration >= 0.0 {
                config.duration = duration;
            }
        }

        config
    }

    /// Applies the overrides on top of `game`.
    pub fn apply(&self, mut game: GameConfig) -> GameConfig {
        if let Some(rate) = self.tick_rate {
            game.fixed_timestep = 1.0 / rate;
        }
        if let Some(steps) = self.max_steps_per_frame {
            game.max_steps_per_frame = steps;
        }
        game
    }

    /// The content bundled with the workspace.
    pub fn bundled_content_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../game/content/data")
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: None,
            max_steps_per_frame: None,
            content_dir: Self::bundled_content_dir(),
            log_dir: None,
            duration: Self::DEFAULT_DURATION,
        }
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = RuntimeConfig::from_lookup(lookup(&[]));
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.apply(GameConfig::default()), GameConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("SKIRMISH_TICK_RATE", "20"),
            ("SKIRMISH_MAX_STEPS", "3"),
            ("SKIRMISH_CONTENT_DIR", "/srv/content"),
            ("SKIRMISH_LOG_DIR", "/var/log/skirmish"),
            ("SKIRMISH_DURATION", " 2.5 "),
        ]));

        assert_eq!(config.content_dir, PathBuf::from("/srv/content"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/skirmish")));
        assert_eq!(config.duration, 2.5);

        let game = config.apply(GameConfig::default());
        assert_eq!(game.fixed_timestep, 0.05);
        assert_eq!(game.max_steps_per_frame, 3);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("SKIRMISH_TICK_RATE", "-5"),
            ("SKIRMISH_MAX_STEPS", "many"),
            ("SKIRMISH_DURATION", "NaN"),
        ]));
        assert_eq!(config.tick_rate, None);
        assert_eq!(config.max_steps_per_frame, None);
        assert_eq!(config.duration, RuntimeConfig::DEFAULT_DURATION);
    }
}
