//! Keplerian elements to Cartesian state, and barycenter helpers.
//!
//! [`kepler_to_cartesian`] takes the eccentric anomaly as its input; use
//! [`eccentric_anomaly_from_mean`] to get it from a mean anomaly first.
//! The remaining helpers are closed-form orbit and star quantities used when
//! laying out a system (period, mean speed, black-body temperature,
//! luminosity).

use std::f64::consts::{PI, TAU};

use crate::error::{SimError, SimResult};

use super::params::{DAY_SEC, SOLAR_LUMINOSITY, STEFAN_BOLTZMANN};
use super::states::{Body, OrbitalElements};
use super::vector::Vector3;

/// Check that `el` describes a bound, non-degenerate orbit.
pub fn validate_elements(el: &OrbitalElements) -> SimResult<()> {
    let fields = [
        ("semi_major_axis", el.semi_major_axis),
        ("eccentricity", el.eccentricity),
        ("inclination", el.inclination),
        ("argument_of_periapsis", el.argument_of_periapsis),
        ("longitude_of_ascending_node", el.longitude_of_ascending_node),
        ("eccentric_anomaly", el.eccentric_anomaly),
    ];
    if let Some((field, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(SimError::invalid_elements(format!("{field} is not finite ({value})")));
    }
    if el.semi_major_axis <= 0.0 {
        return Err(SimError::invalid_elements(format!(
            "semi-major axis must be positive, got {}",
            el.semi_major_axis
        )));
    }
    // e >= 1 makes 1 - e^2 non-positive and h undefined
    if !(0.0..1.0).contains(&el.eccentricity) {
        return Err(SimError::invalid_elements(format!(
            "eccentricity must be in [0, 1) for a bound orbit, got {}",
            el.eccentricity
        )));
    }
    Ok(())
}

/// Position and velocity of a body relative to its primary.
///
/// - `g`: gravitational constant
/// - `primary_mass`: mass `M` of the body being orbited
/// - `el`: orbital elements (angles in degrees, `E` in radians)
///
/// Returns `(position, velocity)` in the primary's frame.
pub fn kepler_to_cartesian(g: f64, primary_mass: f64, el: &OrbitalElements) -> SimResult<(Vector3, Vector3)> {
    validate_elements(el)?;
    if !(primary_mass.is_finite() && primary_mass > 0.0) {
        return Err(SimError::invalid_elements(format!(
            "primary mass must be positive, got {primary_mass}"
        )));
    }

    let a = el.semi_major_axis;
    let e = el.eccentricity;
    let i = el.inclination.to_radians();
    let w = el.argument_of_periapsis.to_radians();
    let om = el.longitude_of_ascending_node.to_radians();
    let ecc_anom = el.eccentric_anomaly;

    // true anomaly
    let v = 2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ecc_anom / 2.0).tan()).atan();
    // distance from the focus
    let r = a * (1.0 - e * ecc_anom.cos());
    // standard gravitational parameter and specific angular momentum
    let mu = g * primary_mass;
    let h = (mu * a * (1.0 - e * e)).sqrt();

    let (sin_om, cos_om) = om.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();
    let (sin_wv, cos_wv) = (w + v).sin_cos();
    let (sin_w, cos_w) = w.sin_cos();

    let position = r * Vector3::new(
        cos_om * cos_wv - sin_om * sin_wv * cos_i,
        sin_om * cos_wv + cos_om * sin_wv * cos_i,
        sin_i * sin_wv,
    );

    let k = mu / h;
    let velocity = k * Vector3::new(
        -(cos_om * (sin_wv + e * sin_w) + sin_om * (cos_wv + e * cos_w) * cos_i),
        -(sin_om * (sin_wv + e * sin_w) - cos_om * (cos_wv + e * cos_w) * cos_i),
        (cos_wv + e * cos_w) * sin_i,
    );

    Ok((position, velocity))
}

const KEPLER_MAX_ITERATIONS: usize = 64;
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Solve Kepler's equation `M = E - e sin E` for the eccentric anomaly `E`.
///
/// `mean_anomaly` is in radians and is reduced to `[0, 2π)` first, so the
/// result is also in `[0, 2π)`. Bisection over one revolution: the left side
/// is monotonic for `0 <= e < 1`, and 64 halvings of `2π` reach the
/// resolution of an `f64`.
pub fn eccentric_anomaly_from_mean(mean_anomaly: f64, eccentricity: f64) -> SimResult<f64> {
    if !mean_anomaly.is_finite() {
        return Err(SimError::invalid_elements(format!(
            "mean anomaly is not finite ({mean_anomaly})"
        )));
    }
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(SimError::invalid_elements(format!(
            "eccentricity must be in [0, 1) for a bound orbit, got {eccentricity}"
        )));
    }

    let m = mean_anomaly.rem_euclid(TAU);
    let (mut lo, mut hi) = (0.0, TAU);
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let residual = mid - eccentricity * mid.sin() - m;
        if residual.abs() <= KEPLER_TOLERANCE {
            return Ok(mid);
        }
        if residual > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// T = 2π sqrt(a³ / (g M))
pub fn orbital_period(g: f64, primary_mass: f64, semi_major_axis: f64) -> f64 {
    2.0 * PI * (semi_major_axis.powi(3) / (g * primary_mass)).sqrt()
}

/// [`orbital_period`] in days
pub fn orbital_period_days(g: f64, primary_mass: f64, semi_major_axis: f64) -> f64 {
    orbital_period(g, primary_mass, semi_major_axis) / DAY_SEC
}

/// Time-averaged orbital speed, `2πa/T` times the series in `e`
/// (1 - e²/4 - 3e⁴/64 - 5e⁶/256)
pub fn mean_orbital_speed(semi_major_axis: f64, period: f64, eccentricity: f64) -> f64 {
    let e2 = eccentricity * eccentricity;
    let series = 1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0;
    2.0 * PI * semi_major_axis / period * series
}

/// Black-body equilibrium temperature (K) of a planet at `distance` from a
/// star of surface temperature `star_temperature` (K) and radius
/// `star_radius`, with bond albedo `albedo`.
///
/// `distance` and `star_radius` share a unit.
pub fn black_body_temperature(star_temperature: f64, star_radius: f64, distance: f64, albedo: f64) -> f64 {
    star_temperature * ((1.0 - albedo).sqrt() * star_radius / (2.0 * distance)).sqrt()
}

/// Distance from the star at which a planet reaches `planet_temperature` (K);
/// inverse of [`black_body_temperature`], in the unit of `star_radius`
pub fn semi_major_axis_for_temperature(
    planet_temperature: f64,
    star_temperature: f64,
    star_radius: f64,
    albedo: f64,
) -> f64 {
    (1.0 - albedo).sqrt() * star_radius * star_temperature.powi(2) / (2.0 * planet_temperature.powi(2))
}

/// Stefan-Boltzmann luminosity (W) of a star of radius `radius` (m) and
/// surface temperature `temperature` (K)
pub fn luminosity(radius: f64, temperature: f64) -> f64 {
    STEFAN_BOLTZMANN * 4.0 * PI * radius * radius * temperature.powi(4)
}

/// [`luminosity`] in solar luminosities
pub fn solar_luminosity(radius: f64, temperature: f64) -> f64 {
    luminosity(radius, temperature) / SOLAR_LUMINOSITY
}

/// Mass-weighted mean position: Σ mᵢ xᵢ / Σ mᵢ.
///
/// Returns the origin for an empty (or massless) set of bodies.
pub fn barycenter(bodies: &[Body]) -> Vector3 {
    mass_weighted_mean(bodies, |b| b.position)
}

/// Mass-weighted mean velocity, i.e. total momentum over total mass
pub fn barycentric_velocity(bodies: &[Body]) -> Vector3 {
    mass_weighted_mean(bodies, |b| b.velocity)
}

fn mass_weighted_mean(bodies: &[Body], field: impl Fn(&Body) -> Vector3) -> Vector3 {
    let mut total_m = 0.0;
    let mut weighted = Vector3::zeros();
    for b in bodies {
        total_m += b.mass();
        weighted += b.mass() * field(b);
    }
    if total_m > 0.0 {
        weighted / total_m
    } else {
        Vector3::zeros()
    }
}
