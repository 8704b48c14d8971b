// src/grover/retry.rs

//! Bounded measure-and-verify loop around the Grover driver.

use super::driver::GroverDriver;
use super::iterations::success_probability;
use crate::circuits::Circuit;
use crate::core::{BitString, QsearchError, Qubit, Result};
use crate::oracles::PhaseOracle;
use crate::scope::with_register;
use crate::simulation::Substrate;
use std::fmt;
use tracing::{debug, info};

/// A search problem the retry controller can amplify and verify.
pub trait SearchProblem {
    /// Decoded candidate type.
    type Solution: fmt::Debug;

    /// Width of the searched register.
    fn register_len(&self) -> usize;

    /// Number of Grover iterations per attempt.
    fn iterations(&self) -> Result<usize>;

    /// Number of marked states, when known. Only used for diagnostics.
    fn solution_count(&self) -> Option<u64> {
        None
    }

    /// Circuit preparing the initial superposition on `register`.
    fn preparation(&self, register: &[Qubit]) -> Result<Circuit>;

    /// Flips the sign of every marked state of `register`.
    fn apply_oracle(&self, sim: &mut dyn Substrate, register: &[Qubit]) -> Result<()>;

    /// Turns measured bits into a candidate.
    fn decode(&self, bits: &BitString) -> Self::Solution;

    /// Classical check of a candidate.
    fn verify(&self, candidate: &Self::Solution) -> bool;
}

/// Adapts a problem's oracle for the driver.
struct ProblemOracle<'p, P: ?Sized>(&'p P);

impl<P: SearchProblem + ?Sized> PhaseOracle for ProblemOracle<'_, P> {
    fn input_len(&self) -> usize {
        self.0.register_len()
    }

    fn apply_phase(&self, sim: &mut dyn Substrate, input: &[Qubit]) -> Result<()> {
        self.0.apply_oracle(sim, input)
    }
}

/// Where the controller is within an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryState {
    #[default]
    Searching,
    Verifying,
    Accepted,
}

/// A candidate that passed classical verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedSolution<T> {
    pub value: T,
    /// The raw measurement the value was decoded from.
    pub bits: BitString,
    /// Attempts used, including the accepted one.
    pub attempts: usize,
    pub accepted: bool,
}

/// Repeats amplification, measurement and verification until a candidate
/// verifies or `max_attempts` is reached.
#[derive(Debug, Clone)]
pub struct RetryController {
    max_attempts: usize,
    iteration_override: Option<usize>,
    state: RetryState,
}

impl RetryController {
    pub fn new(max_attempts: usize) -> Result<Self> {
        if max_attempts == 0 {
            return Err(QsearchError::configuration("max_attempts must be at least 1"));
        }
        Ok(Self { max_attempts, iteration_override: None, state: RetryState::Searching })
    }

    /// Uses `iterations` instead of the problem's own estimate.
    pub fn with_iteration_override(mut self, iterations: Option<usize>) -> Self {
        self.iteration_override = iterations;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn state(&self) -> RetryState {
        self.state
    }

    /// Iterations each attempt runs: the override when set, otherwise the
    /// problem's own count.
    pub fn iterations_for<P>(&self, problem: &P) -> Result<usize>
    where
        P: SearchProblem + ?Sized,
    {
        match self.iteration_override {
            Some(k) => Ok(k),
            None => problem.iterations(),
        }
    }

    /// Runs the search.
    ///
    /// Every attempt allocates a fresh register and releases it before the
    /// candidate is checked, so nothing carries over between attempts.
    /// Returns [`QsearchError::SearchExhausted`] when no candidate verifies.
    pub fn search<P>(
        &mut self,
        sim: &mut dyn Substrate,
        problem: &P,
    ) -> Result<VerifiedSolution<P::Solution>>
    where
        P: SearchProblem + ?Sized,
    {
        let iterations = self.iterations_for(problem)?;
        if let Some(solutions) = problem.solution_count() {
            let space = 1u64 << problem.register_len().min(63);
            if let Ok(p) = success_probability(space, solutions, iterations) {
                debug!(
                    iterations,
                    solutions,
                    success_probability = p,
                    "expected success per attempt"
                );
            }
        }

        let oracle = ProblemOracle(problem);
        let mut driver = GroverDriver::new();
        for attempt in 1..=self.max_attempts {
            self.state = RetryState::Searching;
            let bits = with_register(sim, problem.register_len(), |sim, register| {
                let preparation = problem.preparation(register)?;
                driver.run(sim, register, &preparation, &oracle, iterations)?;
                sim.measure(register)
            })?;

            self.state = RetryState::Verifying;
            let value = problem.decode(&bits);
            match check_candidate(problem, &value) {
                Ok(()) => {
                    self.state = RetryState::Accepted;
                    info!(attempt, candidate = ?value, "candidate verified");
                    return Ok(VerifiedSolution { value, bits, attempts: attempt, accepted: true });
                }
                Err(e) if e.is_recoverable() => debug!(attempt, error = %e, "retrying"),
                Err(e) => return Err(e),
            }
        }

        self.state = RetryState::Searching;
        Err(QsearchError::SearchExhausted { attempts: self.max_attempts })
    }
}

/// Classical check of a decoded candidate.
fn check_candidate<P>(problem: &P, candidate: &P::Solution) -> Result<()>
where
    P: SearchProblem + ?Sized,
{
    if problem.verify(candidate) {
        Ok(())
    } else {
        Err(QsearchError::VerificationFailure { candidate: format!("{:?}", candidate) })
    }
}
