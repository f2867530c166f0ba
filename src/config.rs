use egui::pos2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::ImageSpec;

/// Playfield extents. Fixed for the whole session; every entity reconciles
/// its motion against these bounds.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct Playfield {
    pub w: f32,
    pub h: f32,
}

/// Session bootstrap configuration: tick rate, playfield size and the image
/// manifest with its authored collision outlines.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    pub fps: f32,
    pub playfield: Playfield,
    pub manifest: Vec<ImageSpec>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tick rate must be positive, got {0}")]
    BadTickRate(f32),
}

impl Config {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps <= 0.0 {
            return Err(ConfigError::BadTickRate(self.fps));
        }
        Ok(())
    }

    /// The built-in single-level session: a 400x600 playfield at 60 ticks/s,
    /// with flat-colour sprites for the ball, paddle and bricks.
    pub fn classic() -> Self {
        Self {
            fps: 60.0,
            playfield: Playfield { w: 400.0, h: 600.0 },
            manifest: vec![
                ImageSpec {
                    name: "ball".to_owned(),
                    width: 20,
                    height: 20,
                    fill: [235, 235, 235, 255],
                    points: vec![
                        pos2(10., 0.),
                        pos2(17., 3.),
                        pos2(20., 10.),
                        pos2(17., 17.),
                        pos2(10., 20.),
                        pos2(3., 17.),
                        pos2(0., 10.),
                        pos2(3., 3.),
                    ],
                },
                ImageSpec {
                    name: "paddle".to_owned(),
                    width: 80,
                    height: 16,
                    fill: [90, 160, 255, 255],
                    points: vec![
                        pos2(0., 0.),
                        pos2(80., 0.),
                        pos2(80., 16.),
                        pos2(0., 16.),
                    ],
                },
                ImageSpec {
                    name: "brick".to_owned(),
                    width: 40,
                    height: 16,
                    fill: [230, 120, 60, 255],
                    points: vec![
                        pos2(0., 0.),
                        pos2(40., 0.),
                        pos2(40., 16.),
                        pos2(0., 16.),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_config_is_valid() {
        let config = Config::classic();
        assert!(config.validate().is_ok());
        assert_eq!(config.manifest.len(), 3);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = Config::classic();
        let raw = serde_json::to_string(&config).unwrap();

        let parsed = Config::from_json(&raw).unwrap();
        assert_eq!(parsed.fps, config.fps);
        assert_eq!(parsed.playfield, config.playfield);
        assert_eq!(parsed.manifest.len(), config.manifest.len());
    }

    #[test]
    fn test_config_rejects_bad_tick_rate() {
        let mut config = Config::classic();
        config.fps = 0.0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::BadTickRate(_))
        ));
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        assert!(matches!(
            Config::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
