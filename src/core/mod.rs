// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod qubit;
pub mod state;

pub use error::{QsearchError, Result};
pub use qubit::{Qubit, QubitId, Register};
pub use state::{BitString, StateVector};

pub mod constants;
pub use constants::qsearch_constants::{AMPLITUDE_TOLERANCE, NORM_TOLERANCE, PI};
