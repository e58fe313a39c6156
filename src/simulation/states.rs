//! Core state types for the simulation.
//!
//! - `Body`: a point mass with its dynamic state and orbit relationships
//! - `BodyId`: stable handle into one `System`'s body arena
//! - `OrbitalElements`: classical Keplerian elements relative to a primary
//! - `PointMass`: the frozen position/mass pair read by the force pass

use std::fmt;

use crate::error::SimResult;

use super::orbit::eccentric_anomaly_from_mean;
use super::vector::Vector3;

/// Handle to a body inside one [`crate::System`].
///
/// Ids are arena indices and stay valid for the life of the system
/// (bodies are never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Position of the body in [`crate::System::bodies`]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classical orbital elements of a body around its primary.
///
/// Angles `inclination`, `argument_of_periapsis` and
/// `longitude_of_ascending_node` are in degrees; `eccentric_anomaly` is in
/// radians.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalElements {
    pub semi_major_axis: f64, // a, meters
    pub eccentricity: f64, // e, 0 <= e < 1
    pub inclination: f64, // i, degrees
    pub argument_of_periapsis: f64, // w, degrees
    pub longitude_of_ascending_node: f64, // Om, degrees
    pub eccentric_anomaly: f64, // E, radians
}

impl OrbitalElements {
    /// Elements with periapsis, node and anomaly all at zero
    pub fn new(semi_major_axis: f64, eccentricity: f64, inclination: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination,
            ..Self::default()
        }
    }

    pub fn with_argument_of_periapsis(mut self, w: f64) -> Self {
        self.argument_of_periapsis = w;
        self
    }

    pub fn with_longitude_of_ascending_node(mut self, om: f64) -> Self {
        self.longitude_of_ascending_node = om;
        self
    }

    pub fn with_eccentric_anomaly(mut self, e_anom: f64) -> Self {
        self.eccentric_anomaly = e_anom;
        self
    }

    /// Set the position on the orbit from a mean anomaly (radians), solving
    /// Kepler's equation with the current eccentricity
    pub fn with_mean_anomaly(mut self, mean_anomaly: f64) -> SimResult<Self> {
        self.eccentric_anomaly = eccentric_anomaly_from_mean(mean_anomaly, self.eccentricity)?;
        Ok(self)
    }

    /// a(1 + e)
    pub fn aphelion(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }

    /// a(1 - e)
    pub fn perihelion(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }
}

/// A point mass taking part in the simulation.
///
/// `orbiting` and `satellites` are handles into the owning system, never
/// ownership. They are maintained by [`crate::System::set_orbit`].
#[derive(Debug, Clone)]
pub struct Body {
    name: String,
    mass: f64, // kg
    radius: f64, // m, not used by the force model
    elements: Option<OrbitalElements>,
    pub position: Vector3, // absolute position
    pub velocity: Vector3, // absolute velocity
    pub acceleration: Vector3, // acceleration from the last force pass
    pub(crate) orbiting: Option<BodyId>,
    pub(crate) satellites: Vec<BodyId>,
}

impl Body {
    /// Body at rest at the origin
    pub fn new(name: impl Into<String>, mass: f64, radius: f64) -> Self {
        Self {
            name: name.into(),
            mass,
            radius,
            elements: None,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            orbiting: None,
            satellites: Vec::new(),
        }
    }

    /// Set an explicit initial state
    pub fn with_state(mut self, position: Vector3, velocity: Vector3) -> Self {
        self.position = position;
        self.velocity = velocity;
        self
    }

    /// Attach orbital elements, resolved later by `System::set_orbit`
    pub fn with_elements(mut self, elements: OrbitalElements) -> Self {
        self.elements = Some(elements);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn elements(&self) -> Option<&OrbitalElements> {
        self.elements.as_ref()
    }

    pub(crate) fn set_elements(&mut self, elements: OrbitalElements) {
        self.elements = Some(elements);
    }

    /// The primary this body orbits, if any
    pub fn orbiting(&self) -> Option<BodyId> {
        self.orbiting
    }

    /// Bodies whose primary is this body, in assignment order
    pub fn satellites(&self) -> &[BodyId] {
        &self.satellites
    }

    pub fn aphelion(&self) -> Option<f64> {
        self.elements.as_ref().map(OrbitalElements::aphelion)
    }

    pub fn perihelion(&self) -> Option<f64> {
        self.elements.as_ref().map(OrbitalElements::perihelion)
    }

    /// Frozen copy of the data the force pass reads
    pub fn point_mass(&self) -> PointMass {
        PointMass {
            position: self.position,
            mass: self.mass,
        }
    }
}

/// Position and mass of one body at the start of a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMass {
    pub position: Vector3,
    pub mass: f64,
}
