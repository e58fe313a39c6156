//! The body arena and the sequential step.
//!
//! A `System` owns its bodies by value in insertion order. Orbit
//! relationships are stored on the bodies as [`BodyId`] handles into this
//! arena, so reallocation of the arena never invalidates them.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::error::{SimError, SimResult};

use super::forces::NewtonianGravity;
use super::integrator::integrate;
use super::orbit::{barycenter, barycentric_velocity, kepler_to_cartesian};
use super::params::G;
use super::states::{Body, BodyId, OrbitalElements, PointMass};
use super::vector::{Vector3, VectorOps};

#[derive(Debug, Clone)]
pub struct System {
    bodies: Vec<Body>, // arena, insertion ordered
    gravity: NewtonianGravity, // shared by orbit conversion and force pass
    pub t: f64, // elapsed simulated time
    pub steps: u64, // completed steps
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

impl System {
    /// Empty system using the SI gravitational constant
    pub fn new() -> Self {
        Self::with_gravitational_constant(G)
    }

    /// Empty system with a custom `g` (scaled unit systems, tests)
    pub fn with_gravitational_constant(g: f64) -> Self {
        Self {
            bodies: Vec::new(),
            gravity: NewtonianGravity::new(g),
            t: 0.0,
            steps: 0,
        }
    }

    pub fn g(&self) -> f64 {
        self.gravity.g
    }

    pub fn gravity(&self) -> NewtonianGravity {
        self.gravity
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Append a body and return its handle.
    ///
    /// The body is moved in, so it cannot be shared with another system. Any
    /// orbit handles it carried (e.g. cloned out of another system) are
    /// dropped; orbits are assigned with [`System::set_orbit`].
    pub fn add_body(&mut self, mut body: Body) -> SimResult<BodyId> {
        if !(body.mass().is_finite() && body.mass() > 0.0) {
            return Err(SimError::InvalidBody {
                name: body.name().to_string(),
                reason: format!("mass must be positive and finite, got {}", body.mass()),
            });
        }
        if !(body.radius().is_finite() && body.radius() >= 0.0) {
            return Err(SimError::InvalidBody {
                name: body.name().to_string(),
                reason: format!("radius must be non-negative and finite, got {}", body.radius()),
            });
        }
        if self.find(body.name()).is_some() {
            return Err(SimError::DuplicateBody(body.name().to_string()));
        }

        body.orbiting = None;
        body.satellites.clear();

        let id = BodyId(self.bodies.len());
        debug!(name = body.name(), %id, "adding body");
        self.bodies.push(body);
        Ok(id)
    }

    /// All bodies in insertion order; `bodies()[id.index()]` is `id`'s body
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Mutable access to one body's dynamic state (position, velocity),
    /// e.g. to apply an impulse between steps. Name, mass and orbit links
    /// stay read-only; orbits change only through [`System::set_orbit`].
    pub fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0)
    }

    /// Linear lookup by name
    pub fn get_body(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    /// Handle of the body called `name`
    pub fn find(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.name() == name).map(BodyId)
    }

    fn check_id(&self, id: BodyId) -> SimResult<()> {
        if id.0 < self.bodies.len() {
            Ok(())
        } else {
            Err(SimError::UnknownBodyId(id.0))
        }
    }

    // =========================================================================================
    // Orbit relationships
    // =========================================================================================

    /// Put `child` in orbit around `primary` using the orbital elements the
    /// child already carries.
    ///
    /// The child's absolute state becomes the primary's absolute state plus
    /// the Keplerian offset, and every body orbiting the child (directly or
    /// transitively) is re-resolved against its own primary.
    pub fn set_orbit(&mut self, child: BodyId, primary: BodyId) -> SimResult<()> {
        self.check_id(child)?;
        let elements = self.bodies[child.0]
            .elements()
            .copied()
            .ok_or_else(|| SimError::MissingElements {
                name: self.bodies[child.0].name().to_string(),
            })?;
        self.assign_orbit(child, primary, elements)
    }

    /// Give `child` new orbital elements and put it in orbit around
    /// `primary`. On error the child keeps its previous elements and orbit.
    pub fn add_satellite(&mut self, primary: BodyId, child: BodyId, elements: OrbitalElements) -> SimResult<()> {
        self.assign_orbit(child, primary, elements)?;
        self.bodies[child.0].set_elements(elements);
        Ok(())
    }

    fn assign_orbit(&mut self, child: BodyId, primary: BodyId, elements: OrbitalElements) -> SimResult<()> {
        self.check_id(child)?;
        self.check_id(primary)?;

        if child == primary {
            return Err(SimError::SelfOrbit {
                name: self.bodies[child.0].name().to_string(),
            });
        }

        // walk up from the new primary; meeting the child means a loop
        let mut cursor = Some(primary);
        while let Some(id) = cursor {
            if id == child {
                return Err(SimError::OrbitCycle {
                    child: self.bodies[child.0].name().to_string(),
                    primary: self.bodies[primary.0].name().to_string(),
                });
            }
            cursor = self.bodies[id.0].orbiting;
        }

        // everything fallible happens before the graph is touched
        let (rel_x, rel_v) = kepler_to_cartesian(self.g(), self.bodies[primary.0].mass(), &elements)?;

        // remove from the old primary before adding to the new one
        if let Some(old) = self.bodies[child.0].orbiting.take() {
            self.bodies[old.0].satellites.retain(|&s| s != child);
        }
        self.bodies[child.0].orbiting = Some(primary);
        if !self.bodies[primary.0].satellites.contains(&child) {
            self.bodies[primary.0].satellites.push(child);
        }

        let (px, pv) = (self.bodies[primary.0].position, self.bodies[primary.0].velocity);
        let b = &mut self.bodies[child.0];
        b.position = px + rel_x;
        b.velocity = pv + rel_v;

        debug!(
            child = self.bodies[child.0].name(),
            primary = self.bodies[primary.0].name(),
            "orbit assigned"
        );

        self.resolve_satellites(child)
    }

    /// Recompute the absolute state of every body below `root`, parents
    /// before children.
    fn resolve_satellites(&mut self, root: BodyId) -> SimResult<()> {
        let mut stack: Vec<BodyId> = self.bodies[root.0].satellites.clone();
        while let Some(id) = stack.pop() {
            let Some(primary) = self.bodies[id.0].orbiting else {
                continue;
            };
            let elements = self.bodies[id.0]
                .elements()
                .copied()
                .ok_or_else(|| SimError::MissingElements {
                    name: self.bodies[id.0].name().to_string(),
                })?;
            let (rel_x, rel_v) = kepler_to_cartesian(self.g(), self.bodies[primary.0].mass(), &elements)?;
            let (px, pv) = (self.bodies[primary.0].position, self.bodies[primary.0].velocity);
            let b = &mut self.bodies[id.0];
            b.position = px + rel_x;
            b.velocity = pv + rel_v;
            stack.extend(b.satellites.iter().copied());
        }
        Ok(())
    }

    /// Position and velocity of `id` relative to its primary
    pub fn relative_state(&self, id: BodyId) -> Option<(Vector3, Vector3)> {
        let b = self.body(id)?;
        let p = self.body(b.orbiting?)?;
        Some((b.position - p.position, b.velocity - p.velocity))
    }

    // =========================================================================================
    // Barycenter
    // =========================================================================================

    /// Mass-weighted center of all bodies
    pub fn barycenter(&self) -> Vector3 {
        barycenter(&self.bodies)
    }

    /// Shift every body so the barycenter sits at the origin and the total
    /// momentum is zero. Run once after all orbits are resolved, before the
    /// first step.
    pub fn center_on_barycenter(&mut self) {
        let bc = barycenter(&self.bodies);
        let bv = barycentric_velocity(&self.bodies);
        for b in self.bodies.iter_mut() {
            b.position -= bc;
            b.velocity -= bv;
        }
        debug!(shift = ?bc, drift = ?bv, "recentered on barycenter");
    }

    // =========================================================================================
    // Stepping
    // =========================================================================================

    /// Frozen positions and masses, in body order
    pub fn snapshot(&self) -> Vec<PointMass> {
        self.bodies.iter().map(Body::point_mass).collect()
    }

    /// Advance every body by `dt`.
    ///
    /// Pass 1 computes all accelerations from the positions at the start of
    /// the step; pass 2 moves every body. No position changes before every
    /// acceleration is known.
    pub fn step(&mut self, dt: f64) {
        let points = self.snapshot();
        let mut accels = vec![Vector3::zeros(); points.len()];
        self.gravity.accumulate_accels(&points, &mut accels);
        self.finish_step(&accels, dt);
    }

    /// Integrate with accelerations computed elsewhere and advance the clock
    pub(crate) fn finish_step(&mut self, accels: &[Vector3], dt: f64) {
        integrate(&mut self.bodies, accels, dt);
        self.t += dt;
        self.steps += 1;
        trace!(step = self.steps, t = self.t, "step done");
    }

    /// Run `steps` sequential steps of size `dt`, returning the wall time
    pub fn run(&mut self, dt: f64, steps: u64) -> Duration {
        let start = Instant::now();
        for _ in 0..steps {
            self.step(dt);
        }
        start.elapsed()
    }

    // =========================================================================================
    // Diagnostics
    // =========================================================================================

    /// Σ mᵢ vᵢ
    pub fn total_momentum(&self) -> Vector3 {
        self.bodies
            .iter()
            .fold(Vector3::zeros(), |acc, b| acc + b.mass() * b.velocity)
    }

    /// Σ ½ mᵢ |vᵢ|²
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| 0.5 * b.mass() * b.velocity.length_squared())
            .sum()
    }

    /// Σ_{i<j} -g mᵢ mⱼ / rᵢⱼ, skipping coincident pairs
    pub fn potential_energy(&self) -> f64 {
        let mut u = 0.0;
        for (i, bi) in self.bodies.iter().enumerate() {
            for bj in &self.bodies[i + 1..] {
                let r = bi.position.distance(&bj.position);
                if r > 0.0 {
                    u -= self.g() * bi.mass() * bj.mass() / r;
                }
            }
        }
        u
    }

    pub fn total_energy(&self) -> f64 {
        self.kinetic_energy() + self.potential_energy()
    }
}
