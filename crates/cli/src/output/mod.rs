//! Output formatting for CLI results.

pub mod curve;
pub mod simulation;

pub use curve::format_curve_table;
pub use simulation::format_simulation_report;
