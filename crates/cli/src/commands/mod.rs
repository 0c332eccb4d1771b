//! Command implementations.

pub mod curve;
pub mod simulate;

pub use curve::{run_curve, run_curve_table, CurvePoint};
pub use simulate::run_simulate;
