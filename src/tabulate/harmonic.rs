use super::Potential;

/// Degrees to radians.
pub const DEG2RAD: f64 = std::f64::consts::PI / 180.0;

/// Harmonic angle `E = K (θ - θ0)²` with `K` in energy per radian².
///
/// Angles are given in degrees; the displacement is converted to radians before
/// the model is applied, and the derivative is converted back so the force is
/// per degree, which is what a degree-based table expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicAngle {
    pub k: f64,
    pub theta0: f64,
}

impl HarmonicAngle {
    pub fn new(k: f64, theta0: f64) -> Self {
        Self { k, theta0 }
    }
}

impl Default for HarmonicAngle {
    fn default() -> Self {
        Self::new(50.0, 120.0)
    }
}

impl Potential for HarmonicAngle {
    #[inline]
    fn energy(&self, theta: f64) -> f64 {
        let t = (theta - self.theta0) * DEG2RAD;
        self.k * t * t
    }

    #[inline]
    fn force(&self, theta: f64) -> f64 {
        let t = (theta - self.theta0) * DEG2RAD;
        -2.0 * self.k * t * DEG2RAD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabulate::numeric_force;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn energy_and_force_vanish_at_equilibrium() {
        let p = HarmonicAngle::default();
        assert_eq!(p.energy(120.0), 0.0);
        assert_eq!(p.force(120.0), 0.0);
    }

    #[test]
    fn energy_at_ninety_degrees() {
        let p = HarmonicAngle::default();
        let expected = 50.0 * (std::f64::consts::PI / 6.0).powi(2);
        assert!(f64_approx_equal(p.energy(90.0), expected));
        assert!(f64_approx_equal(p.energy(90.0), 13.707783890401887));
    }

    #[test]
    fn matches_closed_form_for_arbitrary_angles() {
        let p = HarmonicAngle::default();
        let d = std::f64::consts::PI / 180.0;
        for theta in [0.0, 1.5, 45.0, 90.0, 119.999, 133.7, 180.0] {
            let energy = 50.0 * ((theta - 120.0) * d).powi(2);
            let force = -2.0 * 50.0 * (theta - 120.0) * d * d;
            assert!(f64_approx_equal(p.energy(theta), energy), "energy at {}", theta);
            assert!(f64_approx_equal(p.force(theta), force), "force at {}", theta);
        }
    }

    #[test]
    fn force_restores_towards_equilibrium() {
        let p = HarmonicAngle::default();
        assert!(p.force(90.0) > 0.0);
        assert!(p.force(150.0) < 0.0);
    }

    #[test]
    fn analytic_force_agrees_with_numeric_derivative() {
        let p = HarmonicAngle::new(75.0, 109.47);
        for theta in [10.0, 60.0, 109.47, 170.0] {
            assert!((p.force(theta) - numeric_force(&p, theta)).abs() < 1e-6);
        }
    }
}
