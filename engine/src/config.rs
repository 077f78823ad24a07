//! Configuration types for the engine
//!
//! Every tweakable constant of the sunset scene lives here. The defaults
//! reproduce the reference scene; a JSON file can override any subset of
//! them thanks to `#[serde(default)]` on every group.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable consulted for the config file path
pub const CONFIG_ENV_VAR: &str = "SUNSET_CONFIG";

/// Errors raised while loading or validating a [`SceneConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Top-level scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub assets: AssetConfig,
    pub mountains: MountainConfig,
    pub planet: PlanetConfig,
    pub sunset: SunsetConfig,
    pub lights: LightConfig,
    pub camera: CameraConfig,
    pub animation: AnimationConfig,
    pub gui: GuiConfig,
    /// Custom logging filter (None = default)
    pub log_filter: Option<String>,
}

impl SceneConfig {
    /// Load a config file and validate it
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: SceneConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        info!(path = ?path, "Loaded scene config");
        Ok(config)
    }

    /// Resolve the config from an explicit path, the environment, or defaults
    pub fn from_args(arg: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = arg.or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the config as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the scene cannot be built from
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mountains.validate()?;

        if !(1.0..).contains(&self.window.max_pixel_ratio) {
            return Err(invalid(
                "window.max_pixel_ratio",
                format!("must be >= 1, got {}", self.window.max_pixel_ratio),
            ));
        }
        if !(self.planet.radius > 0.0 && self.planet.inner_radius > 0.0) {
            return Err(invalid("planet.radius", "radii must be positive".into()));
        }
        if self.planet.width_segments < 3 || self.planet.height_segments < 2 {
            return Err(invalid(
                "planet.width_segments",
                "sphere needs at least 3x2 segments".into(),
            ));
        }
        let fov = self.camera.fov_y_degrees;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(invalid(
                "camera.fov_y_degrees",
                format!("must be in (0, 180), got {fov}"),
            ));
        }
        if !(self.camera.z_near > 0.0 && self.camera.z_far > self.camera.z_near) {
            return Err(invalid(
                "camera.z_near",
                format!(
                    "clip planes must satisfy 0 < near < far, got {}..{}",
                    self.camera.z_near, self.camera.z_far
                ),
            ));
        }
        if self.gui.toggle_key.chars().count() != 1 {
            return Err(invalid(
                "gui.toggle_key",
                format!("must be a single character, got {:?}", self.gui.toggle_key),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// Window size (None = 1280x720)
    pub size: Option<(u32, u32)>,
    /// Upper bound on rendered pixels per logical pixel
    pub max_pixel_ratio: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Sunset Planet".to_string(),
            size: None,
            max_pixel_ratio: 2.0,
        }
    }
}

/// Texture locations, relative to `root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Root directory for all textures
    pub root: PathBuf,
    pub planet_color: String,
    pub planet_ao: String,
    pub planet_normal: String,
    pub planet_opacity: String,
    pub mountain_arm: String,
    pub mountain_color: String,
    pub mountain_displacement: String,
    pub mountain_normal: String,
    pub sunset_alpha: String,
}

impl AssetConfig {
    /// Full path of a texture below the asset root
    pub fn texture_path(&self, relative: &str) -> PathBuf {
        let path = self.root.join(relative);
        debug!(relative = relative, path = ?path, "Resolved texture path");
        path
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("static/textures"),
            planet_color: "floor/metal_0033_color_1k.jpg".to_string(),
            planet_ao: "floor/metal_0033_ao_1k.jpg".to_string(),
            planet_normal: "floor/metal_0033_normal_opengl_1k.png".to_string(),
            planet_opacity: "floor/metal_0033_opacity_1k.jpg".to_string(),
            mountain_arm: "mountain/lichen_rock_1k/lichen_rock_arm_1k.jpg".to_string(),
            mountain_color: "mountain/lichen_rock_1k/lichen_rock_diff_1k.jpg".to_string(),
            mountain_displacement: "mountain/mossy_rock_1k/mt_everest_disp.png".to_string(),
            mountain_normal: "mountain/lichen_rock_1k/lichen_rock_nor_gl_1k.jpg".to_string(),
            sunset_alpha: "sunset/alpha.jpg".to_string(),
        }
    }
}

/// How the two panels of a slot decide their visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRule {
    /// Left is a coin flip, right is a coin flip only when left is shown
    #[default]
    Biased,
    /// Exactly one panel is shown unless the slot rolled `both_visible`
    Exclusive,
}

/// Mountain ring parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MountainConfig {
    pub pair_count: u32,
    pub radius: f32,
    /// Distance of each panel from the slot centre along X
    pub lateral_offset: f32,
    pub both_visible_probability: f64,
    pub side_probability: f64,
    pub visibility_rule: VisibilityRule,
    pub panel_size: f32,
    pub panel_segments: u32,
    pub displacement_scale: f32,
    pub displacement_bias: f32,
    pub texture_repeat: [f32; 2],
    /// Fixed seed for reproducible layouts (None = entropy)
    pub seed: Option<u64>,
}

impl MountainConfig {
    /// Angular distance between neighbouring slots
    pub fn angle_increment(&self) -> f32 {
        (PI * 2.0) / self.pair_count as f32
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pair_count == 0 {
            return Err(invalid("mountains.pair_count", "must be positive".into()));
        }
        if self.radius <= 0.0 {
            return Err(invalid(
                "mountains.radius",
                format!("must be positive, got {}", self.radius),
            ));
        }
        for (field, p) in [
            (
                "mountains.both_visible_probability",
                self.both_visible_probability,
            ),
            ("mountains.side_probability", self.side_probability),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("must be within [0, 1], got {p}")));
            }
        }
        if self.panel_segments == 0 || self.panel_size <= 0.0 {
            return Err(invalid(
                "mountains.panel_segments",
                "panel needs a positive size and at least one segment".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MountainConfig {
    fn default() -> Self {
        Self {
            pair_count: 8,
            radius: 2.0,
            lateral_offset: 0.4,
            both_visible_probability: 1.0 / 3.0,
            side_probability: 0.5,
            visibility_rule: VisibilityRule::Biased,
            panel_size: 0.5,
            panel_segments: 50,
            displacement_scale: 0.7,
            displacement_bias: -0.37,
            texture_repeat: [1.0, 0.6],
            seed: None,
        }
    }
}

/// Planet sphere parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub radius: f32,
    /// Radius of the opaque black core under the transparent shell
    pub inner_radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
    pub initial_rotation_z: f32,
    pub texture_repeat: [f32; 2],
    /// sRGB tint multiplied into the colour map
    pub color: [f32; 3],
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 2.005,
            inner_radius: 2.0,
            width_segments: 64,
            height_segments: 32,
            initial_rotation_z: PI / 2.0,
            texture_repeat: [6.0, 3.0],
            // CSS "green"
            color: [0.0, 128.0 / 255.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunsetConfig {
    pub size: f32,
}

impl Default for SunsetConfig {
    fn default() -> Self {
        Self { size: 2.0 }
    }
}

/// Directional + ambient light pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub directional_color: [f32; 3],
    pub directional_intensity: f32,
    pub directional_position: [f32; 3],
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            directional_color: [1.0, 1.0, 1.0],
            directional_intensity: 3.0,
            directional_position: [4.0, 0.0, 0.0],
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 70.0,
            z_near: 0.001,
            z_far: 100.0,
            position: [0.0, 2.4, 0.0],
            look_at: [0.0, 0.0, -3.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub enabled: bool,
    /// Group rotation speed about X, radians per second
    pub speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub width: f32,
    pub start_hidden: bool,
    pub toggle_key: String,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            width: 500.0,
            start_hidden: true,
            toggle_key: "h".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mountains.pair_count, 8);
        assert_eq!(config.mountains.radius, 2.0);
        assert_eq!(config.window.max_pixel_ratio, 2.0);
        assert_eq!(config.gui.toggle_key, "h");
    }

    #[test]
    fn test_texture_path() {
        let assets = AssetConfig {
            root: PathBuf::from("static/textures"),
            ..Default::default()
        };
        assert_eq!(
            assets.texture_path("sunset/alpha.jpg"),
            PathBuf::from("static/textures/sunset/alpha.jpg")
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "mountains": {{ "pair_count": 12, "visibility_rule": "exclusive" }} }}"#
        )
        .unwrap();

        let config = SceneConfig::load(file.path()).unwrap();
        assert_eq!(config.mountains.pair_count, 12);
        assert_eq!(config.mountains.visibility_rule, VisibilityRule::Exclusive);
        assert_eq!(config.mountains.radius, 2.0);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut config = SceneConfig::default();
        config.mountains.seed = Some(7);
        config.log_filter = Some("debug".into());
        config.save(&path).unwrap();

        assert_eq!(SceneConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_zero_pairs_rejected() {
        let mut config = SceneConfig::default();
        config.mountains.pair_count = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "mountains.pair_count",
                ..
            })
        ));
    }

    #[test]
    fn test_probability_out_of_range_rejected() {
        let mut config = SceneConfig::default();
        config.mountains.side_probability = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toggle_key_rejected() {
        let mut config = SceneConfig::default();
        config.gui.toggle_key = "hh".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_pixel_ratio_rejected() {
        let mut config = SceneConfig::default();
        config.window.max_pixel_ratio = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "window.max_pixel_ratio",
                ..
            })
        ));

        config.window.max_pixel_ratio = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_field_of_view_range() {
        for fov in [0.0, -10.0, 180.0, 200.0, f32::NAN] {
            let mut config = SceneConfig::default();
            config.camera.fov_y_degrees = fov;
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Invalid {
                        field: "camera.fov_y_degrees",
                        ..
                    })
                ),
                "fov {fov} should be rejected"
            );
        }

        let mut config = SceneConfig::default();
        config.camera.fov_y_degrees = 179.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let err = SceneConfig::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = SceneConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_angle_increment() {
        let config = MountainConfig::default();
        assert!((config.angle_increment() - PI / 4.0).abs() < 1e-6);
    }
}
