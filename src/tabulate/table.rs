use anyhow::{Result, bail};
use log::debug;

use super::potential::{Potential, numeric_force};
use super::units::Units;

/// Upper end of the sampled domain in degrees; the lower end is zero.
pub const MAX_ANGLE: f64 = 180.0;

/// One sample of the table. `index` starts at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnglePoint {
    pub index: usize,
    pub angle: f64,
    pub energy: f64,
    pub force: f64,
}

/// A finished table. It has no mutating methods.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleTable {
    label: String,
    units: Units,
    eq: f64,
    points: Vec<AnglePoint>,
}

impl AngleTable {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Sampled angle with the lowest energy.
    pub fn eq(&self) -> f64 {
        self.eq
    }

    pub fn points(&self) -> &[AnglePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Samples a [`Potential`] at evenly spaced angles on `[0, 180]`.
#[derive(Debug, Clone)]
pub struct AngleTabulator {
    num_points: usize,
    diff_num: bool,
    eshift: bool,
}

impl Default for AngleTabulator {
    fn default() -> Self {
        Self {
            num_points: 181,
            diff_num: false,
            eshift: false,
        }
    }
}

impl AngleTabulator {
    pub fn new(num_points: usize) -> Self {
        Self {
            num_points,
            ..Self::default()
        }
    }

    /// Derive the force numerically instead of calling [`Potential::force`].
    pub fn with_diff_num(mut self, diff_num: bool) -> Self {
        self.diff_num = diff_num;
        self
    }

    /// Shift energies so the lowest sampled value is zero.
    pub fn with_eshift(mut self, eshift: bool) -> Self {
        self.eshift = eshift;
        self
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    pub fn tabulate<P: Potential + ?Sized>(
        &self,
        potential: &P,
        label: &str,
        units: Units,
    ) -> Result<AngleTable> {
        if self.num_points < 2 {
            bail!(
                "A table needs at least 2 points, got {}",
                self.num_points
            );
        }
        if label.trim().is_empty() || label.chars().any(char::is_whitespace) {
            bail!("Table label {:?} must be a single non-empty word", label);
        }

        let delta = MAX_ANGLE / (self.num_points - 1) as f64;
        let mut points: Vec<AnglePoint> = (0..self.num_points)
            .map(|i| {
                // Pin the last sample to 180 exactly
                let angle = if i == self.num_points - 1 {
                    MAX_ANGLE
                } else {
                    i as f64 * delta
                };
                let force = if self.diff_num {
                    numeric_force(potential, angle)
                } else {
                    potential.force(angle)
                };
                AnglePoint {
                    index: i + 1,
                    angle,
                    energy: potential.energy(angle),
                    force,
                }
            })
            .collect();

        // First occurrence wins on ties
        let min = points
            .iter()
            .fold(None, |best: Option<&AnglePoint>, p| match best {
                Some(b) if b.energy <= p.energy => Some(b),
                _ => Some(p),
            })
            .map(|p| (p.angle, p.energy))
            .unwrap_or((0.0, 0.0));
        let (eq, emin) = min;

        if self.eshift {
            debug!("Shifting energies by {}", -emin);
            for p in &mut points {
                p.energy -= emin;
            }
        }

        Ok(AngleTable {
            label: label.to_string(),
            units,
            eq,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabulate::{FnPotential, HarmonicAngle};

    const TOLERANCE: f64 = 1e-6;

    #[test]
    fn samples_evenly_including_both_ends() {
        let table = AngleTabulator::new(181)
            .tabulate(&HarmonicAngle::default(), "HARM", Units::Real)
            .unwrap();

        assert_eq!(table.len(), 181);
        let first = table.points()[0];
        let last = table.points()[180];
        assert_eq!((first.index, first.angle), (1, 0.0));
        assert_eq!((last.index, last.angle), (181, 180.0));
        assert_eq!(table.points()[120].angle, 120.0);
    }

    #[test]
    fn samples_are_exact_potential_evaluations() {
        let potential = HarmonicAngle::default();
        let table = AngleTabulator::new(7)
            .tabulate(&potential, "HARM", Units::Real)
            .unwrap();

        for p in table.points() {
            assert_eq!(p.energy, potential.energy(p.angle));
            assert_eq!(p.force, potential.force(p.angle));
        }
        assert_eq!(table.points()[1].angle, 30.0);
    }

    #[test]
    fn equilibrium_is_the_minimum_energy_angle() {
        let table = AngleTabulator::new(181)
            .tabulate(&HarmonicAngle::new(50.0, 104.0), "WATER", Units::Real)
            .unwrap();
        assert_eq!(table.eq(), 104.0);
        assert_eq!(table.label(), "WATER");
        assert_eq!(table.units(), Units::Real);
    }

    #[test]
    fn eshift_moves_minimum_to_zero() {
        let offset = FnPotential::new(|t: f64| (t - 90.0).powi(2) + 7.5, |t: f64| -2.0 * (t - 90.0));
        let table = AngleTabulator::new(19)
            .with_eshift(true)
            .tabulate(&offset, "OFF", Units::Lj)
            .unwrap();

        let min = table
            .points()
            .iter()
            .map(|p| p.energy)
            .fold(f64::INFINITY, f64::min);
        assert!(min.abs() < TOLERANCE);
        assert!((table.points()[0].energy - 8100.0).abs() < TOLERANCE);
    }

    #[test]
    fn diff_num_uses_numeric_derivative() {
        let wrong_force = FnPotential::new(|t: f64| 0.5 * t * t, |_| f64::NAN);
        let table = AngleTabulator::new(5)
            .with_diff_num(true)
            .tabulate(&wrong_force, "NUM", Units::Real)
            .unwrap();

        for p in table.points() {
            assert!((p.force + p.angle).abs() < 1e-4, "force at {}", p.angle);
        }
    }

    #[test]
    fn too_few_points_is_rejected() {
        let potential = HarmonicAngle::default();
        for n in [0, 1] {
            let err = AngleTabulator::new(n)
                .tabulate(&potential, "HARM", Units::Real)
                .unwrap_err();
            assert!(err.to_string().contains("at least 2 points"));
        }
        assert!(AngleTabulator::new(2).tabulate(&potential, "HARM", Units::Real).is_ok());
    }

    #[test]
    fn label_must_be_one_word() {
        let potential = HarmonicAngle::default();
        assert!(AngleTabulator::default().tabulate(&potential, "", Units::Real).is_err());
        assert!(AngleTabulator::default().tabulate(&potential, "TWO WORDS", Units::Real).is_err());
    }
}
