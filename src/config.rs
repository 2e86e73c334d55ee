//! Configuration loading for ShuddhiSim
//!
//! TOML-backed configuration with per-field defaults, so a partial file
//! (or none at all) always yields a runnable setup. Nine named room
//! layouts ship built in and can be overridden or extended from the file.

use crate::core::{Rect, Vec2};
use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

/// Robot physical parameters
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Footprint radius in pixels (default: 30)
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Walk step size: pixels traveled per tick (default: 2)
    #[serde(default = "default_wss")]
    pub wss: f32,

    /// Rotation sample step in degrees for heading resampling (default: 5)
    #[serde(default = "default_rss")]
    pub rss: f32,

    /// Score awarded the first time a tile is covered (default: 10)
    #[serde(default = "default_dirt_per_cover")]
    pub dirt_per_cover: u32,
}

/// Simulation run parameters
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    /// Full-coverage percentage at which the run completes (default: 90)
    #[serde(default = "default_stop_at_coverage")]
    pub stop_at_coverage: f32,

    /// Consecutive zero-displacement ticks before a stall warning
    /// (default: 50)
    #[serde(default = "default_stall_ticks")]
    pub stall_ticks: u32,

    /// Cleaning passes before a tile counts as fully cleaned (default: 4)
    #[serde(default = "default_clean_passes")]
    pub clean_passes: u8,

    /// Hard tick limit for the CLI runner; 0 means unlimited (default: 0)
    #[serde(default)]
    pub max_ticks: u64,
}

/// Room dimensions and named default layouts
#[derive(Clone, Debug, Deserialize)]
pub struct EnvironmentConfig {
    /// Room width in pixels (default: 800)
    #[serde(default = "default_width")]
    pub width: f32,

    /// Room height in pixels (default: 600)
    #[serde(default = "default_height")]
    pub height: f32,

    /// Tile edge length in pixels (default: 10)
    #[serde(default = "default_tile_size")]
    pub tile_size: f32,

    /// Named default layouts, keyed by id
    #[serde(default = "default_layouts")]
    pub defaults: BTreeMap<String, LayoutConfig>,
}

/// One named room layout: obstacle rectangles plus an optional robot
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LayoutConfig {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Obstacles as `[x, y, width, height]`
    #[serde(default)]
    pub obstacles: Vec<[f32; 4]>,

    /// Robot as `[x, y, radius]`
    #[serde(default)]
    pub robot: Option<[f32; 3]>,
}

impl LayoutConfig {
    /// Obstacles as geometry rectangles
    pub fn obstacle_rects(&self) -> Vec<Rect> {
        self.obstacles
            .iter()
            .map(|&[x, y, w, h]| Rect::new(x, y, w, h))
            .collect()
    }

    /// Robot placement as `(position, radius)`
    pub fn robot_placement(&self) -> Option<(Vec2, f32)> {
        self.robot.map(|[x, y, r]| (Vec2::new(x, y), r))
    }
}

fn default_radius() -> f32 {
    30.0
}

fn default_wss() -> f32 {
    2.0
}

fn default_rss() -> f32 {
    5.0
}

fn default_dirt_per_cover() -> u32 {
    10
}

fn default_stop_at_coverage() -> f32 {
    90.0
}

fn default_stall_ticks() -> u32 {
    50
}

fn default_clean_passes() -> u8 {
    4
}

fn default_width() -> f32 {
    800.0
}

fn default_height() -> f32 {
    600.0
}

fn default_tile_size() -> f32 {
    10.0
}

fn layout(name: &str, obstacles: &[[f32; 4]], robot: Option<[f32; 3]>) -> LayoutConfig {
    LayoutConfig {
        name: name.to_string(),
        obstacles: obstacles.to_vec(),
        robot,
    }
}

fn default_layouts() -> BTreeMap<String, LayoutConfig> {
    let mut defaults = BTreeMap::new();
    defaults.insert("0".into(), layout("Empty Room (Dynamic)", &[], None));
    defaults.insert(
        "1".into(),
        layout(
            "Basic Room",
            &[[490.0, 10.0, 300.0, 320.0], [10.0, 330.0, 210.0, 260.0]],
            Some([700.0, 520.0, 30.0]),
        ),
    );
    defaults.insert(
        "2".into(),
        layout(
            "Narrow Passage",
            &[[360.0, 10.0, 80.0, 460.0]],
            Some([730.0, 500.0, 30.0]),
        ),
    );
    defaults.insert(
        "3".into(),
        layout(
            "Split Room",
            &[[233.0, 10.0, 157.0, 247.0], [503.0, 493.0, 137.0, 97.0]],
            Some([699.0, 512.0, 30.0]),
        ),
    );
    defaults.insert(
        "4".into(),
        layout(
            "Divided Room",
            &[[389.0, 296.0, 401.0, 294.0]],
            Some([30.0, 511.0, 30.0]),
        ),
    );
    defaults.insert(
        "5".into(),
        layout(
            "Hummerkorb-Falle",
            &[
                [10.0, 10.0, 365.0, 95.0],
                [380.0, 252.0, 410.0, 337.0],
                [381.0, 220.0, 23.0, 32.0],
            ],
            Some([30.0, 503.0, 30.0]),
        ),
    );
    defaults.insert(
        "6".into(),
        layout(
            "Narrow Passage 2",
            &[[361.0, 10.0, 76.0, 462.0]],
            Some([580.0, 270.0, 30.0]),
        ),
    );
    defaults.insert(
        "7".into(),
        layout(
            "Normal Room",
            &[
                [10.0, 420.0, 447.0, 170.0],
                [10.0, 10.0, 165.0, 43.0],
                [611.0, 10.0, 179.0, 58.0],
                [10.0, 252.0, 86.0, 168.0],
            ],
            Some([730.0, 501.0, 30.0]),
        ),
    );
    defaults.insert(
        "8".into(),
        layout("Random Spiral", &[], Some([385.0, 285.0, 30.0])),
    );
    defaults
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            wss: default_wss(),
            rss: default_rss(),
            dirt_per_cover: default_dirt_per_cover(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stop_at_coverage: default_stop_at_coverage(),
            stall_ticks: default_stall_ticks(),
            clean_passes: default_clean_passes(),
            max_ticks: 0,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            tile_size: default_tile_size(),
            defaults: default_layouts(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            simulation: SimulationConfig::default(),
            environment: EnvironmentConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file; unset keys fall back to
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: SimConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Look up a named layout.
    pub fn layout(&self, id: &str) -> Option<&LayoutConfig> {
        self.environment.defaults.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_provide_runnable_setup() {
        let config = SimConfig::default();
        assert_eq!(config.robot.radius, 30.0);
        assert_eq!(config.robot.wss, 2.0);
        assert_eq!(config.simulation.stop_at_coverage, 90.0);
        assert_eq!(config.environment.width, 800.0);
        assert_eq!(config.environment.defaults.len(), 9);

        let basic = config.layout("1").unwrap();
        assert_eq!(basic.name, "Basic Room");
        assert_eq!(basic.obstacles.len(), 2);
        assert_eq!(basic.robot, Some([700.0, 520.0, 30.0]));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            [robot]
            radius = 20.0

            [environment]
            width = 400.0
            height = 300.0
            "#,
        )
        .unwrap();
        assert_eq!(config.robot.radius, 20.0);
        assert_eq!(config.robot.wss, 2.0);
        assert_eq!(config.environment.width, 400.0);
        assert_eq!(config.environment.tile_size, 10.0);
        assert!(config.layout("1").is_some());
    }

    #[test]
    fn load_reads_toml_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shuddhi.toml");
        std::fs::write(
            &path,
            "[simulation]\nstop_at_coverage = 75.0\nmax_ticks = 20000\n",
        )
        .unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.simulation.stop_at_coverage, 75.0);
        assert_eq!(config.simulation.max_ticks, 20000);
        assert_eq!(config.robot.radius, 30.0);

        assert!(SimConfig::load(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn layout_accessors_convert_to_geometry() {
        let config = SimConfig::default();
        let basic = config.layout("1").unwrap();
        let rects = basic.obstacle_rects();
        assert_eq!(rects[0], Rect::new(490.0, 10.0, 300.0, 320.0));
        let (pos, radius) = basic.robot_placement().unwrap();
        assert_eq!(pos, Vec2::new(700.0, 520.0));
        assert_eq!(radius, 30.0);
    }
}
