use serde::{Deserialize, Serialize};

use crate::text_mesh::TextStyle;

pub const DEFAULT_CUBE_COUNT: usize = 500;

/// Query-string key carrying the cube count across restarts.
pub const CUBE_COUNT_PARAM: &str = "numCubes";

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationConfig {
    pub cube_count: usize,
    /// Edge length of a cube (world units)
    pub cube_size: f32,
    pub cube_mass: f32,
    pub gravity_y: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Spawn square is [-extent, extent) on x and z
    pub spawn_half_extent: f32,
    pub spawn_height_min: f32,
    pub spawn_height_range: f32,
    /// Fixed physics timestep (seconds)
    pub physics_dt: f32,
    /// Maximum physics steps per frame before dropping accumulated time
    pub max_substeps: u32,
    /// Duration of the fly-to-letter animation (seconds)
    pub form_duration: f32,
    /// Release velocity jitter on x and z is in [-h, h)
    pub scatter_horizontal: f32,
    /// Release velocity on y is in [0, v)
    pub scatter_vertical: f32,
    pub coarse_style: TextStyle,
    pub detailed_style: TextStyle,
    /// Fixed seed for reproducible runs; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cube_count: DEFAULT_CUBE_COUNT,
            cube_size: 0.5,
            cube_mass: 1.0,
            gravity_y: -9.82,
            friction: 0.1,
            restitution: 0.7,
            spawn_half_extent: 10.0,
            spawn_height_min: 5.0,
            spawn_height_range: 10.0,
            physics_dt: 1.0 / 60.0,
            max_substeps: 10,
            form_duration: 2.0,
            scatter_horizontal: 1.0,
            scatter_vertical: 2.0,
            coarse_style: TextStyle::coarse(),
            detailed_style: TextStyle::detailed(),
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.cube_count == 0 {
            return Err("cube_count must be >= 1".to_string());
        }
        if !self.cube_size.is_finite() || self.cube_size <= 0.0 {
            return Err("cube_size must be finite and > 0".to_string());
        }
        if !self.cube_mass.is_finite() || self.cube_mass <= 0.0 {
            return Err("cube_mass must be finite and > 0".to_string());
        }
        if !self.gravity_y.is_finite() {
            return Err("gravity_y must be finite".to_string());
        }
        if !self.physics_dt.is_finite() || self.physics_dt <= 0.0 {
            return Err("physics_dt must be finite and > 0".to_string());
        }
        if self.max_substeps == 0 {
            return Err("max_substeps must be >= 1".to_string());
        }
        if !self.form_duration.is_finite() || self.form_duration <= 0.0 {
            return Err("form_duration must be finite and > 0".to_string());
        }
        if self.spawn_half_extent < 0.0 || self.spawn_height_range < 0.0 {
            return Err("spawn ranges must be >= 0".to_string());
        }
        if self.scatter_horizontal < 0.0 || self.scatter_vertical < 0.0 {
            return Err("scatter ranges must be >= 0".to_string());
        }
        self.coarse_style
            .validate()
            .map_err(|e| format!("coarse_style: {e}"))?;
        self.detailed_style
            .validate()
            .map_err(|e| format!("detailed_style: {e}"))?;
        Ok(())
    }
}

/// Cube count carried by a query string such as `?numCubes=800`.
///
/// Accepts leading digits the way a browser `parseInt` would (`"12abc"` is
/// 12). Returns `None` when the key is absent, unparsable or zero.
pub fn cube_count_from_query(query: &str) -> Option<usize> {
    let query = query.trim_start_matches('?');
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == CUBE_COUNT_PARAM)
        .and_then(|(_, value)| leading_integer(&value))
        .filter(|&count| count >= 1)
}

/// Cube count for startup: the query value, or [`DEFAULT_CUBE_COUNT`].
pub fn parse_cube_count(query: &str) -> usize {
    cube_count_from_query(query).unwrap_or(DEFAULT_CUBE_COUNT)
}

/// Query string (with leading `?`) that restarts with `count` cubes.
pub fn restart_query(count: usize) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair(CUBE_COUNT_PARAM, &count.to_string())
        .finish();
    format!("?{encoded}")
}

fn leading_integer(value: &str) -> Option<usize> {
    let trimmed = value.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    unsigned[..end].parse().ok()
}
