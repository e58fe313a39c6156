//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – execution mode and barycenter correction
//! - [`ParametersConfig`] – step size, step count and physical constants
//! - [`BodyConfig`]       – each body, either with an explicit state or with
//!   orbital elements around a named primary ([`OrbitConfig`])
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   mode: "sequential"        # or "threaded"
//!   barycentric: true         # recenter on the barycenter before stepping
//!
//! parameters:
//!   dt: 60.0                  # seconds per step
//!   steps: 1440               # number of steps
//!   g: 6.67408e-11            # optional, SI gravitational constant by default
//!   barrier_timeout_ms: 5000  # optional, threaded mode only
//!
//! bodies:
//!   - name: sun
//!     mass: 1.9885e30
//!     radius: 696342000.0
//!   - name: earth
//!     mass: 5.97237e24
//!     radius: 6378137.0
//!     orbit:
//!       primary: sun
//!       semi_major_axis: 149597887155.76578
//!       eccentricity: 0.01671022
//!       inclination: 1.5717062          # degrees
//!       argument_of_periapsis: 102.94719 # degrees, default 0
//!       longitude_of_ascending_node: -11.26064 # degrees, default 0
//!       eccentric_anomaly: 0.0           # radians, default 0
//!       # or mean_anomaly: 1.2             # radians, solved for E
//!   - name: craft
//!     mass: 1000.0
//!     radius: 1.0
//!     position: [ 1.0e11, 0.0, 0.0 ]
//!     velocity: [ 0.0, 3.0e4, 0.0 ]
//! ```
//!
//! The scenario builder maps this configuration into the runtime `System`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::SimResult;
use crate::simulation::engine::ExecutionMode;

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    #[serde(default)]
    pub mode: ExecutionMode, // sequential (default) or threaded
    #[serde(default = "default_true")]
    pub barycentric: bool, // recenter positions and momentum on the barycenter
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Sequential,
            barycentric: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64, // time step size
    pub steps: u64, // number of steps
    pub g: Option<f64>, // gravitational constant, SI if absent
    pub barrier_timeout_ms: Option<u64>, // threaded barrier timeout
}

/// Orbital elements of a body around a named primary
#[derive(Deserialize, Debug, Clone)]
pub struct OrbitConfig {
    pub primary: String, // name of the body being orbited
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub inclination: f64, // degrees
    #[serde(default)]
    pub argument_of_periapsis: f64, // degrees
    #[serde(default)]
    pub longitude_of_ascending_node: f64, // degrees
    pub eccentric_anomaly: Option<f64>, // radians, default 0
    pub mean_anomaly: Option<f64>, // radians, alternative to eccentric_anomaly
}

/// Configuration for a single body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String, // unique within the scenario
    pub mass: f64, // kg
    #[serde(default)]
    pub radius: f64, // m
    pub position: Option<Vec<f64>>, // explicit initial position
    pub velocity: Option<Vec<f64>>, // explicit initial velocity
    pub orbit: Option<OrbitConfig>, // initial state from orbital elements
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Vec<BodyConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
