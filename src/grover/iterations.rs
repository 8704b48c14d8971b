// src/grover/iterations.rs

//! Analytic iteration counts for amplitude amplification.
//!
//! With `M` marked states out of `S`, one Grover iteration rotates the state
//! by `2θ` where `sin θ = sqrt(M / S)`. After `k` iterations the probability
//! of measuring a marked state is `sin²((2k + 1)θ)`.

use crate::core::{PI, QsearchError, Result};

/// Size of a search space and number of marked states in it.
///
/// Only [`SearchParameters::new`] builds one, so `1 <= solutions <=
/// 2^register_len` always holds and `register_len < 64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParameters {
    register_len: usize,
    solutions: u64,
}

impl SearchParameters {
    /// Checks `1 <= solutions <= 2^register_len`.
    pub fn new(register_len: usize, solutions: u64) -> Result<Self> {
        let space = space_size(register_len)?;
        check_counts(space, solutions)?;
        Ok(Self { register_len, solutions })
    }

    /// Number of qubits in the searched register.
    pub fn register_len(&self) -> usize {
        self.register_len
    }

    /// Number of marked states.
    pub fn solutions(&self) -> u64 {
        self.solutions
    }

    /// `2^register_len`.
    pub fn space_size(&self) -> u64 {
        1u64 << self.register_len
    }
}

fn space_size(register_len: usize) -> Result<u64> {
    1u64.checked_shl(register_len as u32)
        .filter(|_| register_len < 64)
        .ok_or_else(|| {
            QsearchError::configuration(format!("Register of {} qubits is too large", register_len))
        })
}

fn check_counts(space: u64, solutions: u64) -> Result<()> {
    if space == 0 {
        return Err(QsearchError::configuration("Search space is empty"));
    }
    if solutions == 0 {
        return Err(QsearchError::configuration("Search needs at least one solution"));
    }
    if solutions > space {
        return Err(QsearchError::configuration(format!(
            "{} solutions cannot fit in a space of {} states",
            solutions, space
        )));
    }
    Ok(())
}

fn rotation_angle(space: u64, solutions: u64) -> Result<f64> {
    check_counts(space, solutions)?;
    Ok((solutions as f64 / space as f64).sqrt().asin())
}

/// `round(π/4 · sqrt(S/M))`, the usual count for a uniform superposition.
pub fn grover_iterations(params: &SearchParameters) -> usize {
    let ratio = params.space_size() as f64 / params.solutions as f64;
    (PI / 4.0 * ratio.sqrt()).round() as usize
}

/// Count for exactly one solution in a domain of `domain` equally weighted
/// states: `round(π / (4 · asin(1/sqrt(D))) - 1/2)`.
///
/// Only the domain size matters, not the register width; a 10-value domain
/// in a 4-qubit register gives 2.
pub fn single_solution_iterations(domain: u64) -> Result<usize> {
    exact_iterations(domain, 1)
}

/// `round(π/(4θ) - 1/2)` with `θ = asin(sqrt(M/S))`.
pub fn exact_iterations(space: u64, solutions: u64) -> Result<usize> {
    let theta = rotation_angle(space, solutions)?;
    Ok((0.25 * PI / theta - 0.5).round().max(0.0) as usize)
}

/// Probability that a measurement after `iterations` rounds yields a marked
/// state.
pub fn success_probability(space: u64, solutions: u64, iterations: usize) -> Result<f64> {
    let theta = rotation_angle(space, solutions)?;
    Ok(((2 * iterations + 1) as f64 * theta).sin().powi(2))
}
