// src/grover/driver.rs

use super::diffusion::reflect_about_prepared;
use crate::circuits::Circuit;
use crate::core::{QsearchError, Qubit, Result};
use crate::oracles::PhaseOracle;
use crate::simulation::Substrate;
use tracing::trace;

/// Progress of a single amplification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriverState {
    #[default]
    Uninitialized,
    /// The preparation circuit has been applied.
    Superposed,
    /// `k` oracle + diffusion rounds have completed.
    Iterating(usize),
    Done,
}

/// Runs amplitude amplification on a register the caller owns.
///
/// The driver does not allocate, measure or release anything; it leaves
/// the amplified state on `register` for the caller to measure.
#[derive(Debug, Default)]
pub struct GroverDriver {
    state: DriverState,
}

impl GroverDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Applies `preparation`, then `iterations` rounds of the phase oracle
    /// followed by the reflection about the prepared state.
    ///
    /// `register` must start in |0...0>. Every call starts over from
    /// [`DriverState::Uninitialized`].
    pub fn run(
        &mut self,
        sim: &mut dyn Substrate,
        register: &[Qubit],
        preparation: &Circuit,
        oracle: &dyn PhaseOracle,
        iterations: usize,
    ) -> Result<DriverState> {
        self.transition(DriverState::Uninitialized);
        if oracle.input_len() != register.len() {
            return Err(QsearchError::configuration(format!(
                "Oracle expects {} qubits but the search register has {}",
                oracle.input_len(),
                register.len()
            )));
        }

        sim.apply_circuit(preparation)?;
        self.transition(DriverState::Superposed);
        for k in 1..=iterations {
            oracle.apply_phase(sim, register)?;
            reflect_about_prepared(sim, preparation, register)?;
            self.transition(DriverState::Iterating(k));
        }
        self.transition(DriverState::Done);
        Ok(self.state)
    }

    fn transition(&mut self, next: DriverState) {
        trace!(from = ?self.state, to = ?next, "grover driver transition");
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grover::diffusion::uniform_preparation;
    use crate::grover::iterations::success_probability;
    use crate::oracles::{Oracle, ValueOracle};
    use crate::scope::with_register;
    use crate::simulation::Simulator;

    #[test]
    fn test_one_iteration_over_four_states_is_certain() -> Result<()> {
        let marking = ValueOracle::new(3, 2)?;
        let oracle = Oracle::Marking(&marking);
        let mut sim = Simulator::seeded(21);
        let mut driver = GroverDriver::new();
        with_register(&mut sim, 2, |sim, reg| {
            let state = driver.run(sim, reg, &uniform_preparation(reg), &oracle, 1)?;
            assert_eq!(state, DriverState::Done);
            let probs = sim.probabilities(reg)?;
            let expected = success_probability(4, 1, 1)?;
            assert!((probs[3] - expected).abs() < 1e-9, "{:?}", probs);
            Ok(())
        })
    }

    #[test]
    fn test_zero_iterations_leaves_preparation() -> Result<()> {
        let marking = ValueOracle::new(1, 3)?;
        let oracle = Oracle::Marking(&marking);
        let mut sim = Simulator::seeded(21);
        let mut driver = GroverDriver::new();
        with_register(&mut sim, 3, |sim, reg| {
            driver.run(sim, reg, &uniform_preparation(reg), &oracle, 0)?;
            for p in sim.probabilities(reg)? {
                assert!((p - 0.125).abs() < 1e-9);
            }
            Ok(())
        })
    }

    #[test]
    fn test_register_mismatch_rejected() -> Result<()> {
        let marking = ValueOracle::new(1, 3)?;
        let oracle = Oracle::Marking(&marking);
        let mut sim = Simulator::seeded(21);
        let mut driver = GroverDriver::new();
        let result = with_register(&mut sim, 2, |sim, reg| {
            driver.run(sim, reg, &uniform_preparation(reg), &oracle, 1)
        });
        assert!(matches!(result, Err(QsearchError::Configuration { .. })));
        Ok(())
    }
}
