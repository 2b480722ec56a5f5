//! Configuration loading for MargaNav

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct MargaConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

/// Positioning source settings
#[derive(Clone, Debug, Deserialize)]
pub struct SourceConfig {
    /// Bridge driver: "sim" or "null" (default: "sim")
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Directory holding anchor map resources (default: "anchors")
    #[serde(default = "default_anchor_dir")]
    pub anchor_dir: String,

    /// Anchor map resource name; extension is ignored (default: "testroom")
    #[serde(default = "default_anchor_map")]
    pub anchor_map: String,
}

/// Readiness gate timeouts
#[derive(Clone, Debug, Deserialize)]
pub struct GateConfig {
    /// Seconds to wait for surface data, 0 = wait indefinitely (default: 8.0)
    #[serde(default = "default_surface_timeout")]
    pub surface_timeout_secs: f32,

    /// Seconds to wait for source init, 0 = wait indefinitely (default: 8.0)
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: f32,
}

/// Position filter settings
#[derive(Clone, Debug, Deserialize)]
pub struct TrackingConfig {
    /// Easing rate toward the last known position, 1/s (default: 5.0)
    #[serde(default = "default_follow_speed")]
    pub follow_speed: f32,

    /// Snap radius for projecting samples onto the surface, meters (default: 0.3)
    #[serde(default = "default_sample_radius")]
    pub sample_radius: f32,
}

/// Path planner throttle settings
#[derive(Clone, Debug, Deserialize)]
pub struct PlannerConfig {
    /// Ceiling on recomputation rate in Hz, clamped to >= 1 (default: 5.0)
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: f32,

    /// Planar movement that forces a recomputation, meters (default: 0.1)
    #[serde(default = "default_min_move_to_replan")]
    pub min_move_to_replan: f32,
}

/// Path consumer settings
#[derive(Clone, Debug, Deserialize)]
pub struct VisualizerConfig {
    /// Ceiling on redraw rate in Hz, clamped to >= 1 (default: 5.0)
    #[serde(default = "default_update_hz")]
    pub update_hz: f32,

    /// Corner lift above the walking surface, meters (default: 0.015)
    #[serde(default = "default_y_offset")]
    pub y_offset: f32,

    /// Per-corner movement below which a redraw is skipped, meters (default: 0.01)
    #[serde(default = "default_change_epsilon")]
    pub change_epsilon: f32,

    /// Polyline width handed to the sink, meters (default: 0.05)
    #[serde(default = "default_line_width")]
    pub line_width: f32,
}

/// Walkable surface settings
#[derive(Clone, Debug, Deserialize)]
pub struct SurfaceConfig {
    /// Surface kind: "grid" (default: "grid")
    #[serde(default = "default_surface_kind")]
    pub kind: String,

    /// Walkable extent minimum X, meters (default: 0.0)
    #[serde(default)]
    pub min_x: f32,

    /// Walkable extent minimum Z, meters (default: 0.0)
    #[serde(default)]
    pub min_z: f32,

    /// Walkable extent maximum X, meters (default: 8.0)
    #[serde(default = "default_max_x")]
    pub max_x: f32,

    /// Walkable extent maximum Z, meters (default: 6.0)
    #[serde(default = "default_max_z")]
    pub max_z: f32,

    /// Grid cell size, meters (default: 0.1)
    #[serde(default = "default_resolution")]
    pub resolution: f32,

    /// Height of the walking plane, meters (default: 0.0)
    #[serde(default)]
    pub floor_y: f32,

    /// Blocked axis-aligned rects as [min_x, min_z, max_x, max_z]
    #[serde(default)]
    pub obstacles: Vec<[f32; 4]>,

    /// Build calls required before surface data exists, 0 = immediate (default: 0)
    #[serde(default)]
    pub build_ticks: u32,
}

/// Guidance agent settings
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Initial agent position [x, y, z], meters (default: [0.5, 0.0, 0.5])
    #[serde(default = "default_start")]
    pub start: [f32; 3],

    /// Optional goal position [x, y, z], meters
    #[serde(default)]
    pub target: Option<[f32; 3]>,

    /// Host tick rate for the daemon loop, Hz (default: 30.0)
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f32,
}

/// Simulated bridge settings
#[derive(Clone, Debug, Deserialize)]
pub struct SimConfig {
    /// Random seed for reproducible noise, 0 = random each run (default: 0)
    #[serde(default)]
    pub random_seed: u64,

    /// Walking speed along the circuit, m/s (default: 0.6)
    #[serde(default = "default_sim_speed")]
    pub speed: f32,

    /// Circuit corners in the source frame as [x, y]
    #[serde(default = "default_circuit")]
    pub circuit: Vec<[f32; 2]>,

    /// Gaussian position noise standard deviation, meters (default: 0.05)
    #[serde(default = "default_noise_stddev")]
    pub noise_stddev: f32,

    /// Probability of an empty acquisition per request (default: 0.05)
    #[serde(default = "default_dropout_rate")]
    pub dropout_rate: f32,

    /// Probability of a degenerate payload per request (default: 0.02)
    #[serde(default = "default_malformed_rate")]
    pub malformed_rate: f32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            anchor_dir: default_anchor_dir(),
            anchor_map: default_anchor_map(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            surface_timeout_secs: default_surface_timeout(),
            source_timeout_secs: default_source_timeout(),
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            follow_speed: default_follow_speed(),
            sample_radius: default_sample_radius(),
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
            min_move_to_replan: default_min_move_to_replan(),
        }
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            update_hz: default_update_hz(),
            y_offset: default_y_offset(),
            change_epsilon: default_change_epsilon(),
            line_width: default_line_width(),
        }
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            kind: default_surface_kind(),
            min_x: 0.0,
            min_z: 0.0,
            max_x: default_max_x(),
            max_z: default_max_z(),
            resolution: default_resolution(),
            floor_y: 0.0,
            obstacles: Vec::new(),
            build_ticks: 0,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            target: None,
            tick_hz: default_tick_hz(),
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            speed: default_sim_speed(),
            circuit: default_circuit(),
            noise_stddev: default_noise_stddev(),
            dropout_rate: default_dropout_rate(),
            malformed_rate: default_malformed_rate(),
        }
    }
}

// Default value functions
fn default_driver() -> String {
    "sim".to_string()
}
fn default_anchor_dir() -> String {
    "anchors".to_string()
}
fn default_anchor_map() -> String {
    "testroom".to_string()
}
fn default_surface_timeout() -> f32 {
    8.0
}
fn default_source_timeout() -> f32 {
    8.0
}
fn default_follow_speed() -> f32 {
    5.0
}
fn default_sample_radius() -> f32 {
    0.3
}
fn default_refresh_hz() -> f32 {
    5.0
}
fn default_min_move_to_replan() -> f32 {
    0.1
}
fn default_update_hz() -> f32 {
    5.0
}
fn default_y_offset() -> f32 {
    0.015
}
fn default_change_epsilon() -> f32 {
    0.01
}
fn default_line_width() -> f32 {
    0.05
}
fn default_surface_kind() -> String {
    "grid".to_string()
}
fn default_max_x() -> f32 {
    8.0
}
fn default_max_z() -> f32 {
    6.0
}
fn default_resolution() -> f32 {
    0.1
}
fn default_start() -> [f32; 3] {
    [0.5, 0.0, 0.5]
}
fn default_tick_hz() -> f32 {
    30.0
}
fn default_sim_speed() -> f32 {
    0.6
}
fn default_circuit() -> Vec<[f32; 2]> {
    vec![[0.5, 0.5], [7.5, 0.5], [7.5, 5.5], [0.5, 5.5]]
}
fn default_noise_stddev() -> f32 {
    0.05
}
fn default_dropout_rate() -> f32 {
    0.05
}
fn default_malformed_rate() -> f32 {
    0.02
}

impl Default for MargaConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            gate: GateConfig::default(),
            tracking: TrackingConfig::default(),
            planner: PlannerConfig::default(),
            visualizer: VisualizerConfig::default(),
            surface: SurfaceConfig::default(),
            agent: AgentConfig::default(),
            sim: SimConfig::default(),
        }
    }
}

impl MargaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        let config: MargaConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
