// src/validation/mod.rs

//! Provides functions to validate a [`StateVector`].

use crate::core::constants::qsearch_constants::NORM_TOLERANCE;
use crate::core::{QsearchError, Result, StateVector};

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to `NORM_TOLERANCE`.
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QsearchError::Simulation)` if normalization fails.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = state.norm_sqr();
    if (norm_sq - 1.0).abs() > effective_tolerance {
        Err(QsearchError::simulation(format!(
            "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
            norm_sq, effective_tolerance
        )))
    } else {
        Ok(())
    }
}

/// Checks that every amplitude is a finite complex number.
pub fn check_finite(state: &StateVector) -> Result<()> {
    match state
        .amplitudes()
        .iter()
        .position(|c| !c.re.is_finite() || !c.im.is_finite())
    {
        Some(index) => Err(QsearchError::simulation(format!(
            "Non-finite amplitude at basis index {}",
            index
        ))),
        None => Ok(()),
    }
}

/// Performs the basic validity checks on a state: finiteness, then normalization.
pub fn validate_state(state: &StateVector, norm_tolerance: Option<f64>) -> Result<()> {
    check_finite(state)?;
    check_normalization(state, norm_tolerance)?;
    Ok(())
}
