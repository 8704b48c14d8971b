// src/grover/mod.rs

//! Grover amplitude amplification.
//!
//! One iteration applies a phase oracle and then reflects the register
//! about the prepared starting state. After roughly `π/4 · sqrt(S/M)`
//! iterations most of the probability sits on the `M` marked states.
//! [`RetryController`] measures, verifies classically and tries again when
//! the measured candidate is wrong.

pub mod diffusion;
pub mod driver;
pub mod iterations;
pub mod retry;

pub use diffusion::{amplitude_preparation, reflect_about_prepared, uniform_preparation};
pub use driver::{DriverState, GroverDriver};
pub use iterations::{
    SearchParameters, exact_iterations, grover_iterations, single_solution_iterations,
    success_probability,
};
pub use retry::{RetryController, RetryState, SearchProblem, VerifiedSolution};
