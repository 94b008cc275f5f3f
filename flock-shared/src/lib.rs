#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use flock_core::{FlockConfig, SeparationMode, Vector2D};
use serde::{Deserialize, Serialize};

/// A bird position in arena units
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Vector2D> for Position {
    fn from(v: Vector2D) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Position> for Vector2D {
    fn from(p: Position) -> Self {
        Vector2D::new(p.x, p.y)
    }
}

/// Every bird's position after one step, in id order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub step: usize,
    pub positions: Vec<Position>,
}

impl Snapshot {
    pub fn new(step: usize, positions: &[Vector2D]) -> Self {
        Self {
            step,
            positions: positions.iter().copied().map(Position::from).collect(),
        }
    }

    /// Single-line JSON encoding, as stored in `.jsonl` output.
    #[cfg(feature = "std")]
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    #[cfg(feature = "std")]
    pub fn from_json_line(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }
}

/// Serialized form of [`SeparationMode`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SeparationSetting {
    #[default]
    Standard,
    CrossAxis,
}

impl From<SeparationSetting> for SeparationMode {
    fn from(setting: SeparationSetting) -> Self {
        match setting {
            SeparationSetting::Standard => SeparationMode::Standard,
            SeparationSetting::CrossAxis => SeparationMode::CrossAxis,
        }
    }
}

/// On-disk layout for snapshots
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// One `positions_NNN.csv` file per step
    #[default]
    Csv,
    /// A single `positions.jsonl` file, one snapshot per line
    Jsonl,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: String,
    pub format: SnapshotFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: String::from("out"),
            format: SnapshotFormat::Csv,
        }
    }
}

/// Simulation settings as read from a config file. Missing fields take the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlockSettings {
    pub bird_count: usize,
    pub time_step: f64,
    pub total_steps: usize,
    pub box_length: f64,
    pub close_distance: f64,
    pub repel_distance: f64,
    pub wall_distance: f64,
    pub force_to_center_scale: f64,
    pub force_repel_scale: f64,
    pub force_align_scale: f64,
    pub force_wall_scale: f64,
    pub separation: SeparationSetting,
    pub seed: Option<u64>,
    pub output: OutputSettings,
}

impl Default for FlockSettings {
    fn default() -> Self {
        let config = FlockConfig::default();
        Self {
            bird_count: config.bird_count,
            time_step: config.time_step,
            total_steps: config.total_steps,
            box_length: config.box_length,
            close_distance: config.close_distance,
            repel_distance: config.repel_distance,
            wall_distance: config.wall_distance,
            force_to_center_scale: config.force_to_center_scale,
            force_repel_scale: config.force_repel_scale,
            force_align_scale: config.force_align_scale,
            force_wall_scale: config.force_wall_scale,
            separation: SeparationSetting::Standard,
            seed: config.seed,
            output: OutputSettings::default(),
        }
    }
}

impl From<&FlockSettings> for FlockConfig {
    fn from(settings: &FlockSettings) -> Self {
        Self {
            bird_count: settings.bird_count,
            time_step: settings.time_step,
            total_steps: settings.total_steps,
            box_length: settings.box_length,
            close_distance: settings.close_distance,
            repel_distance: settings.repel_distance,
            wall_distance: settings.wall_distance,
            force_to_center_scale: settings.force_to_center_scale,
            force_repel_scale: settings.force_repel_scale,
            force_align_scale: settings.force_align_scale,
            force_wall_scale: settings.force_wall_scale,
            separation_mode: settings.separation.into(),
            seed: settings.seed,
        }
    }
}
