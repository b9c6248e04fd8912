/// Step in degrees for the central-difference derivative.
const DIFF_STEP: f64 = 1.0e-6;

/// An angle potential. Both functions take the angle in degrees and must be
/// total on `[0, 180]`.
pub trait Potential {
    fn energy(&self, theta: f64) -> f64;

    /// Negative derivative of the energy with respect to the angle in degrees.
    fn force(&self, theta: f64) -> f64;
}

/// Adapts a pair of closures into a [`Potential`].
pub struct FnPotential<E, F> {
    energy: E,
    force: F,
}

impl<E, F> FnPotential<E, F>
where
    E: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
{
    pub fn new(energy: E, force: F) -> Self {
        Self { energy, force }
    }
}

impl<E, F> Potential for FnPotential<E, F>
where
    E: Fn(f64) -> f64,
    F: Fn(f64) -> f64,
{
    fn energy(&self, theta: f64) -> f64 {
        (self.energy)(theta)
    }

    fn force(&self, theta: f64) -> f64 {
        (self.force)(theta)
    }
}

/// Force as the negative central difference of the energy.
#[inline]
pub fn numeric_force<P: Potential + ?Sized>(potential: &P, theta: f64) -> f64 {
    -(potential.energy(theta + DIFF_STEP) - potential.energy(theta - DIFF_STEP)) / (2.0 * DIFF_STEP)
}
