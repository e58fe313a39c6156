//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - system state (`System` with every orbit resolved to absolute state)

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tracing::info;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::simulation::engine::{Engine, ExecutionMode};
use crate::simulation::params::{Parameters, DEFAULT_BARRIER_TIMEOUT, G};
use crate::simulation::scheduler::{ParallelStepScheduler, RunConfig, RunReport};
use crate::simulation::states::{Body, OrbitalElements};
use crate::simulation::system::System;
use crate::simulation::vector::Vector3;

/// Runtime bundle constructed from a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub system: System,
}

fn vec3(name: &str, field: &str, v: &[f64]) -> SimResult<Vector3> {
    match v {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(SimError::config(format!(
            "body '{name}': {field} needs 3 components, got {}",
            v.len()
        ))),
    }
}

fn runtime_body(bc: &BodyConfig) -> SimResult<Body> {
    let mut body = Body::new(bc.name.clone(), bc.mass, bc.radius);

    if bc.orbit.is_some() && (bc.position.is_some() || bc.velocity.is_some()) {
        return Err(SimError::config(format!(
            "body '{}': give either an orbit or an explicit position/velocity, not both",
            bc.name
        )));
    }

    if let Some(orbit) = &bc.orbit {
        let elements = OrbitalElements::new(orbit.semi_major_axis, orbit.eccentricity, orbit.inclination)
            .with_argument_of_periapsis(orbit.argument_of_periapsis)
            .with_longitude_of_ascending_node(orbit.longitude_of_ascending_node);
        let elements = match (orbit.eccentric_anomaly, orbit.mean_anomaly) {
            (Some(_), Some(_)) => {
                return Err(SimError::config(format!(
                    "body '{}': give either eccentric_anomaly or mean_anomaly, not both",
                    bc.name
                )));
            }
            (Some(e_anom), None) => elements.with_eccentric_anomaly(e_anom),
            (None, Some(m_anom)) => elements.with_mean_anomaly(m_anom)?,
            (None, None) => elements,
        };
        body = body.with_elements(elements);
    } else {
        let x = match &bc.position {
            Some(p) => vec3(&bc.name, "position", p)?,
            None => Vector3::zeros(),
        };
        let v = match &bc.velocity {
            Some(v) => vec3(&bc.name, "velocity", v)?,
            None => Vector3::zeros(),
        };
        body = body.with_state(x, v);
    }
    Ok(body)
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Parameters (runtime) from ParametersConfig
        let p_cfg = &cfg.parameters;
        if !(p_cfg.dt.is_finite() && p_cfg.dt >= 0.0) {
            return Err(SimError::config(format!("dt must be finite and non-negative, got {}", p_cfg.dt)));
        }
        let parameters = Parameters {
            dt: p_cfg.dt,
            steps: p_cfg.steps,
            g: p_cfg.g.unwrap_or(G),
            barrier_timeout: p_cfg
                .barrier_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_BARRIER_TIMEOUT),
        };

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            mode: cfg.engine.mode,
            barycentric: cfg.engine.barycentric,
        };

        // Bodies: every body goes in first so primaries can be named in any order
        let mut system = System::with_gravitational_constant(parameters.g);
        let mut ids = Vec::with_capacity(cfg.bodies.len());
        for bc in &cfg.bodies {
            ids.push(system.add_body(runtime_body(bc)?)?);
        }

        // Orbits: resolving a primary later re-resolves its satellites, so
        // declaration order does not matter
        for (bc, &id) in cfg.bodies.iter().zip(ids.iter()) {
            if let Some(orbit) = &bc.orbit {
                let primary = system
                    .find(&orbit.primary)
                    .ok_or_else(|| SimError::UnknownBody(orbit.primary.clone()))?;
                system.set_orbit(id, primary)?;
            }
        }

        if engine.barycentric {
            system.center_on_barycenter();
        }

        info!(bodies = system.len(), mode = ?engine.mode, "scenario built");

        Ok(Self {
            engine,
            parameters,
            system,
        })
    }

    fn run_config(&self) -> RunConfig {
        RunConfig::new(self.parameters.dt, self.parameters.steps)
            .with_barrier_timeout(self.parameters.barrier_timeout)
    }

    /// Run the configured number of steps in the configured mode
    pub fn run(&mut self) -> SimResult<RunReport> {
        let never = AtomicBool::new(false);
        self.run_with_cancel(&never)
    }

    /// As [`Scenario::run`], stopping at the next step boundary once
    /// `cancel` is set
    pub fn run_with_cancel(&mut self, cancel: &AtomicBool) -> SimResult<RunReport> {
        match self.engine.mode {
            ExecutionMode::Threaded => {
                ParallelStepScheduler::new(self.run_config()).run_with_cancel(&mut self.system, cancel)
            }
            ExecutionMode::Sequential => {
                let start = Instant::now();
                let mut done = 0;
                let mut cancelled = false;
                while done < self.parameters.steps {
                    if cancel.load(Ordering::Acquire) {
                        cancelled = true;
                        break;
                    }
                    self.system.step(self.parameters.dt);
                    done += 1;
                }
                let elapsed = start.elapsed();
                info!(steps = done, ?elapsed, cancelled, "sequential run finished");
                Ok(RunReport {
                    steps_completed: done,
                    elapsed,
                    cancelled,
                    worker_states: Vec::new(),
                })
            }
        }
    }
}
