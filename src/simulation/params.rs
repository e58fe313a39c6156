//! Physical constants and numerical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - step size and number of steps,
//! - gravitational constant `g` (SI by default, overridable for scaled units),
//! - how long the threaded coordinator waits at a barrier

use std::time::Duration;

pub const G: f64 = 6.67408e-11; // m^3 kg^-1 s^-2
pub const AU: f64 = 149_597_870_700.0; // meters
pub const DAY_SEC: f64 = 86_400.0; // one day in seconds
pub const YEAR_DAY: f64 = 365.2421875; // days in one tropical year
pub const YEAR_SEC: f64 = YEAR_DAY * DAY_SEC; // seconds in a year
pub const STEFAN_BOLTZMANN: f64 = 5.670374419e-8; // W m^-2 K^-4
pub const SOLAR_LUMINOSITY: f64 = 3.828e26; // W

/// Default time a threaded run waits for workers at a barrier
pub const DEFAULT_BARRIER_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64, // step size, seconds
    pub steps: u64, // number of steps to run
    pub g: f64, // gravitational constant
    pub barrier_timeout: Duration, // threaded mode only
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 60.0,
            steps: 0,
            g: G,
            barrier_timeout: DEFAULT_BARRIER_TIMEOUT,
        }
    }
}
