use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    algo::tabular::q_table::QTableAgentConfig,
    error::{Error, Result},
    train::TrainConfig,
};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side of the square grid
    pub grid_size: usize,
    /// Length of the snake at spawn
    pub initial_length: usize,
    /// Reward for eating food
    pub food_reward: f32,
    /// Reward of every move that neither eats nor ends the episode
    pub step_penalty: f32,
    /// Reward for dying, by collision or timeout
    pub death_penalty: f32,
    /// An episode times out after `timeout_factor * grid_size²` steps without food
    pub timeout_factor: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            initial_length: 3,
            food_reward: 10.0,
            step_penalty: -0.01,
            death_penalty: -10.0,
            timeout_factor: 2,
        }
    }
}

impl GameConfig {
    /// Check that a spawned snake fits on the centre row with room left for food
    pub fn validate(&self) -> Result<()> {
        let &Self {
            grid_size,
            initial_length,
            ..
        } = self;
        if initial_length == 0 {
            return Err(Error::InvalidConfig("initial_length must be positive".into()));
        }
        if grid_size * grid_size <= initial_length {
            return Err(Error::InvalidConfig(format!(
                "a {grid_size}x{grid_size} grid has no room for food next to a snake of length {initial_length}"
            )));
        }
        if grid_size / 2 + 1 < initial_length {
            return Err(Error::InvalidConfig(format!(
                "a snake of length {initial_length} does not fit left of the centre of a {grid_size}x{grid_size} grid"
            )));
        }
        if self.timeout_factor == 0 {
            return Err(Error::InvalidConfig("timeout_factor must be positive".into()));
        }
        Ok(())
    }
}

/// All configuration of a training run, loadable from a JSON file
///
/// Every section and field is optional in the file, missing ones take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub agent: QTableAgentConfig,
    pub train: TrainConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&json)?;
        config.game.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 10);
        assert_eq!(config.initial_length, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_impossible_grids() {
        let tiny = GameConfig {
            grid_size: 1,
            initial_length: 1,
            ..Default::default()
        };
        assert!(tiny.validate().is_err(), "no room for food");

        let long = GameConfig {
            grid_size: 4,
            initial_length: 4,
            ..Default::default()
        };
        assert!(long.validate().is_err(), "body runs off the grid");

        let empty = GameConfig {
            initial_length: 0,
            ..Default::default()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "game": { "grid_size": 12 }, "train": { "max_episodes": 50, "seed": 9 } }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.game.grid_size, 12);
        assert_eq!(config.game.death_penalty, -10.0);
        assert_eq!(config.train.max_episodes, 50);
        assert_eq!(config.train.seed, Some(9));
        assert_eq!(config.agent, QTableAgentConfig::default());
    }

    #[test]
    fn invalid_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "game": { "grid_size": 2, "initial_length": 3 } }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }
}
