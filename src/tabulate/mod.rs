//! Tabulated angle potentials.
//!
//! A [`Potential`] is sampled on `[0, 180]` degrees by an [`AngleTabulator`]
//! into an immutable [`AngleTable`], which a [`TableWriter`] renders in the
//! simulator's `angle_style table` format.

mod format;
mod harmonic;
mod potential;
mod table;
mod units;
mod writer;

pub use format::{format_g, format_row};
pub use harmonic::{DEG2RAD, HarmonicAngle};
pub use potential::{FnPotential, Potential, numeric_force};
pub use table::{AnglePoint, AngleTable, AngleTabulator, MAX_ANGLE};
pub use units::Units;
pub use writer::{DEFAULT_COMMENT, TableWriter, open_output};
