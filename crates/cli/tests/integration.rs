//! Integration tests for the Oni CLI.
//!
//! These tests run the `oni` binary end to end against JSON fixtures under
//! `tests/fixtures/`.
//!
//! # Test Categories
//!
//! - **Curve command tests**: single-point and tabulated rates, flag and config overrides
//! - **Simulate command tests**: scenario replay, rejected steps, JSON reports
//! - **CLI validation tests**: Argument parsing, help text, error handling
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p oni-rs-cli --test integration
//! ```

mod integration {
    pub mod helpers;
    pub mod curve_tests;
    pub mod simulate_tests;
    pub mod cli_validation_tests;
}
