use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::game::{Direction, Grid, Point};

/// Host-overridable game constants. Loaded once at startup; only the tick
/// interval may change mid-round, via the loop's command channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_size: i32,
    pub cell_size: u32,
    pub initial_snake: Vec<Point>,
    pub initial_direction: Direction,
    pub initial_food: Point,
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            cell_size: 25,
            initial_snake: vec![Point::new(5, 10), Point::new(4, 10), Point::new(3, 10)],
            initial_direction: Direction::Right,
            initial_food: Point::new(10, 5),
            tick_interval_ms: 50,
        }
    }
}

impl GameConfig {
    /// Reads the config from a YAML file; a missing path means defaults.
    /// Validation failures surface before the first tick.
    pub fn load(path: Option<&str>) -> Result<Self, String> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| format!("Failed to read config file {}: {}", path, e))?;
                serde_yaml_ng::from_str(&content)
                    .map_err(|e| format!("Failed to parse config file {}: {}", path, e))?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.grid_size < 10 || self.grid_size > 100 {
            return Err("Grid size must be between 10 and 100".to_string());
        }
        if self.tick_interval_ms < 10 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 10ms and 5000ms".to_string());
        }
        if self.initial_snake.len() < 2 {
            return Err("Initial snake needs at least 2 segments".to_string());
        }

        let grid = Grid::new(self.grid_size);
        if self.initial_snake.iter().any(|&p| !grid.in_bounds(p)) {
            return Err("Initial snake must be inside the grid".to_string());
        }
        for pair in self.initial_snake.windows(2) {
            let step = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
            if step != 1 {
                return Err("Initial snake segments must be orthogonally contiguous".to_string());
            }
        }
        let distinct: std::collections::HashSet<Point> =
            self.initial_snake.iter().copied().collect();
        if distinct.len() != self.initial_snake.len() {
            return Err("Initial snake must not overlap itself".to_string());
        }

        if !grid.in_bounds(self.initial_food) {
            return Err("Initial food must be inside the grid".to_string());
        }
        if distinct.contains(&self.initial_food) {
            return Err("Initial food must not sit on the snake".to_string());
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let config = GameConfig { grid_size: 5, ..GameConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_gapped_snake() {
        let config = GameConfig {
            initial_snake: vec![Point::new(5, 10), Point::new(3, 10)],
            ..GameConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_food_on_snake() {
        let config = GameConfig { initial_food: Point::new(4, 10), ..GameConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = GameConfig { grid_size: 30, tick_interval_ms: 100, ..GameConfig::default() };
        let yaml = serde_yaml_ng::to_string(&config).unwrap();
        let parsed: GameConfig = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(parsed.grid_size, 30);
        assert_eq!(parsed.tick_interval_ms, 100);
        assert_eq!(parsed.validate(), Ok(()));
    }
}
