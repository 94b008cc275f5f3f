//! Loading and checking [`FlockSettings`].

use std::fs;
use std::path::Path;

use flock_shared::FlockSettings;

use crate::error::ConfigError;

/// Reads settings from a JSON file. Fields left out keep their defaults.
pub fn load_settings(path: &Path) -> Result<FlockSettings, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Rejects settings the step loop cannot run meaningfully with.
pub fn validate(settings: &FlockSettings) -> Result<(), ConfigError> {
    if settings.bird_count == 0 {
        return invalid("bird_count must be at least 1");
    }
    if !settings.time_step.is_finite() || settings.time_step <= 0.0 {
        return invalid(format!(
            "time_step must be positive and finite, got {}",
            settings.time_step
        ));
    }
    if !settings.box_length.is_finite() || settings.box_length <= 0.0 {
        return invalid(format!(
            "box_length must be positive and finite, got {}",
            settings.box_length
        ));
    }

    let radii = [
        ("close_distance", settings.close_distance),
        ("repel_distance", settings.repel_distance),
        ("wall_distance", settings.wall_distance),
    ];
    for (name, value) in radii {
        if !value.is_finite() || value < 0.0 {
            return invalid(format!("{name} must be non-negative, got {value}"));
        }
    }

    if settings.repel_distance >= settings.close_distance {
        return invalid(format!(
            "repel_distance ({}) must be smaller than close_distance ({})",
            settings.repel_distance, settings.close_distance
        ));
    }
    if settings.wall_distance * 2.0 >= settings.box_length {
        return invalid(format!(
            "wall margins ({} each) leave no interior in a box of {}",
            settings.wall_distance, settings.box_length
        ));
    }
    if settings.output.directory.is_empty() {
        return invalid("output directory must not be empty");
    }

    Ok(())
}

fn invalid(reason: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::Invalid(reason.into()))
}
