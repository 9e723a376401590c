//! Tunables loaded from an optional TOML file.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use snack_attack_core::{Fidelity, LevelSpeed};
use snack_attack_system_builder::PathCanvas;

/// Level settings expressed in raw pixels, before fidelity scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    pub(crate) maze_width: u32,
    pub(crate) maze_height: u32,
    pub(crate) block_width: u32,
    pub(crate) min_block_spacing: u32,
    pub(crate) fidelity: Fidelity,
    pub(crate) level_speed: LevelSpeed,
    /// Simulation steps per second.
    pub(crate) tick_rate: u32,
    pub(crate) enemies: EnemyCounts,
    pub(crate) seed: u64,
}

/// How many enemies of each kind enter the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct EnemyCounts {
    pub(crate) wanderer: u32,
    pub(crate) tracker: u32,
    pub(crate) invincible: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_width: 256,
            maze_height: 192,
            block_width: 12,
            min_block_spacing: 4,
            fidelity: Fidelity::Normal,
            level_speed: LevelSpeed::Slow,
            tick_rate: 720,
            enemies: EnemyCounts::default(),
            seed: 1,
        }
    }
}

impl Default for EnemyCounts {
    fn default() -> Self {
        Self {
            wanderer: 2,
            tracker: 1,
            invincible: 1,
        }
    }
}

impl Settings {
    /// Reads settings from `path`, or returns the defaults when no file is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read settings from {}", path.display()))?;
                Self::parse(&contents)
                    .with_context(|| format!("invalid settings in {}", path.display()))?
            }
            None => Self::default(),
        };
        settings.validate()?;
        Ok(settings)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse settings toml contents")
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.tick_rate > 0, "tick rate must be positive");
        ensure!(
            self.fidelity.scale_length(self.block_width) > 0,
            "block width {} vanishes at {:?} fidelity",
            self.block_width,
            self.fidelity
        );
        Ok(())
    }

    /// Authoring canvas in grid space.
    pub(crate) fn canvas(&self) -> PathCanvas {
        PathCanvas::new(
            self.fidelity.scale_length(self.maze_width),
            self.fidelity.scale_length(self.maze_height),
            self.fidelity.scale_length(self.block_width),
        )
    }

    /// Snapping step for painted tiles in grid space.
    pub(crate) fn spacing(&self) -> u32 {
        self.fidelity.scale_length(self.min_block_spacing)
    }

    /// Entity speed in grid units per second.
    pub(crate) fn speed(&self) -> f64 {
        self.level_speed.scaled_speed(self.fidelity)
    }

    pub(crate) fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate))
    }
}
