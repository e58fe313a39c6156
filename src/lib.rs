pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{SimError, SimResult};

pub use simulation::vector::{Vector3, VectorOps};
pub use simulation::states::{Body, BodyId, OrbitalElements, PointMass};
pub use simulation::orbit::{kepler_to_cartesian, orbital_period, barycenter, barycentric_velocity, validate_elements};
pub use simulation::orbit::{eccentric_anomaly_from_mean, orbital_period_days, mean_orbital_speed};
pub use simulation::orbit::{black_body_temperature, semi_major_axis_for_temperature, luminosity, solar_luminosity};
pub use simulation::forces::NewtonianGravity;
pub use simulation::integrator::{advance_body, integrate};
pub use simulation::system::System;
pub use simulation::scheduler::{ParallelStepScheduler, RunConfig, RunReport, WorkerState};
pub use simulation::scenario::Scenario;
pub use simulation::engine::{Engine, ExecutionMode};
pub use simulation::params::{Parameters, G, AU, DAY_SEC, YEAR_DAY, YEAR_SEC, STEFAN_BOLTZMANN, SOLAR_LUMINOSITY};

pub use configuration::config::{EngineConfig, ParametersConfig, BodyConfig, OrbitConfig, ScenarioConfig};

pub use benchmark::benchmark::{bench_step, bench_step_curve};
