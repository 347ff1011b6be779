use crate::camera::{CameraPose, ConfigError, Resolution};

/// Bootstrap inputs for a [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Initial render width in pixels.
    pub width: u32,
    /// Initial render height in pixels.
    pub height: u32,
    /// Initial horizontal field of view, in degrees.
    pub horizontal_fov_degrees: f32,
    /// Fixed seed for the per-frame random channels. `None` uses OS entropy.
    pub seed: Option<u64>,
    /// Pose used at startup and on every camera reset.
    pub pose: CameraPose,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            horizontal_fov_degrees: 45.0,
            seed: None,
            pose: CameraPose::default(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<Resolution, ConfigError> {
        let resolution = Resolution::new(self.width, self.height)?;
        let fov = self.horizontal_fov_degrees;
        if !fov.is_finite() {
            return Err(ConfigError::NonFinite("horizontal field of view"));
        }
        if fov <= 0.0 || fov >= 180.0 {
            return Err(ConfigError::FieldOfView(fov));
        }
        Ok(resolution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let res = SessionConfig::default().validate().unwrap();
        assert_eq!((res.width, res.height), (1280, 720));
    }

    #[test]
    fn degenerate_configs_are_rejected() {
        let zero = SessionConfig {
            width: 0,
            ..SessionConfig::default()
        };
        assert!(matches!(zero.validate(), Err(ConfigError::Resolution { .. })));

        let flat = SessionConfig {
            horizontal_fov_degrees: 180.0,
            ..SessionConfig::default()
        };
        assert_eq!(flat.validate(), Err(ConfigError::FieldOfView(180.0)));

        let nan = SessionConfig {
            horizontal_fov_degrees: f32::NAN,
            ..SessionConfig::default()
        };
        assert!(matches!(nan.validate(), Err(ConfigError::NonFinite(_))));
    }
}
