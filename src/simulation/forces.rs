//! Pairwise Newtonian gravity for the n-body engine
//!
//! Two evaluation orders over the same per-pair arithmetic:
//! - [`NewtonianGravity::accumulate_accels`]: unordered pairs (i < j), the
//!   factor `g / r^3` is computed once per pair and applied to both bodies
//! - [`NewtonianGravity::row_accel`]: one body against every other body,
//!   used by the threaded scheduler where each worker owns one row
//!
//! Both add contributions to body i in ascending j order, so they produce
//! identical results.

use tracing::warn;

use super::params::G;
use super::states::PointMass;
use super::vector::{Vector3, VectorOps};

/// Direct-sum Newtonian gravity, no softening
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub g: f64, // gravitational constant
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self { g: G }
    }
}

impl NewtonianGravity {
    pub fn new(g: f64) -> Self {
        Self { g }
    }

    /// `g / r^3` for a pair displaced by `delta`, shared by both bodies of
    /// the pair.
    ///
    /// `None` for coincident bodies: the pair would divide by zero and
    /// represents a collision this model does not handle.
    #[inline]
    fn pair_factor(&self, delta: &Vector3) -> Option<f64> {
        let r2 = delta.length_squared();
        if r2 == 0.0 {
            return None;
        }
        Some(self.g / (r2 * r2.sqrt()))
    }

    /// Compute accelerations for every point mass into `out`.
    /// - `out` is zeroed first, then `out[i]` receives the sum over all j != i
    pub fn accumulate_accels(&self, points: &[PointMass], out: &mut [Vector3]) {
        for a in out.iter_mut() {
            a.reset();
        }

        let n = points.len();
        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let pi = &points[i];
            for j in (i + 1)..n {
                let pj = &points[j];

                // displacement from j to i
                let delta = pi.position - pj.position;

                let Some(k) = self.pair_factor(&delta) else {
                    warn!(i, j, "skipping pair at zero separation");
                    continue;
                };
                // i is pulled along -delta, j along +delta
                out[i] -= (k * pj.mass) * delta;
                out[j] += (k * pi.mass) * delta;
            }
        }
    }

    /// Acceleration of point `i` due to every other point.
    ///
    /// Recomputes the pair factor for every pair instead of sharing it with
    /// the other row, so a caller owning only row `i` never writes another
    /// row. The arithmetic matches [`NewtonianGravity::accumulate_accels`]
    /// term for term.
    pub fn row_accel(&self, i: usize, points: &[PointMass]) -> Vector3 {
        let mut acc = Vector3::zeros();
        let pi = &points[i];
        for (j, pj) in points.iter().enumerate() {
            if j == i {
                continue;
            }
            let delta = pi.position - pj.position;
            match self.pair_factor(&delta) {
                Some(k) => acc -= (k * pj.mass) * delta,
                None => warn!(i, j, "skipping pair at zero separation"),
            }
        }
        acc
    }
}
