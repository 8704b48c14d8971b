// src/simulation/mod.rs

//! The quantum execution substrate.
//!
//! [`Substrate`] is the contract the search core is written against:
//! scoped allocation, gate application, measurement and reset. [`Simulator`]
//! implements it with a dense state vector held by the internal
//! `SimulationEngine`.

pub(crate) mod engine;

use crate::circuits::Circuit;
use crate::core::constants::qsearch_constants::DEFAULT_MAX_QUBITS;
use crate::core::{BitString, Qubit, Register, Result, StateVector};
use crate::operations::Operation;
use crate::validation::validate_state;
use engine::SimulationEngine;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Operations the search core needs from a quantum execution engine.
///
/// Implementations must honor unitary composition and the allocation
/// discipline: a qubit is usable from `allocate` until `release`, and must
/// be reset to |0> before it is released.
pub trait Substrate {
    /// Allocates `n` fresh qubits in |0>.
    fn allocate(&mut self, n: usize) -> Result<Register>;

    /// Returns a register to the substrate. Fails with `UseAfterFree` if a
    /// qubit still carries |1> amplitude.
    fn release(&mut self, register: Register) -> Result<()>;

    /// Applies one (possibly controlled) operation.
    fn apply(&mut self, op: &Operation) -> Result<()>;

    /// Measures `qubits` in the computational basis, collapsing the state.
    fn measure(&mut self, qubits: &[Qubit]) -> Result<BitString>;

    /// Forces `qubit` to |0> regardless of its prior state.
    fn reset(&mut self, qubit: Qubit) -> Result<()>;

    /// Resets every qubit of `qubits`.
    fn reset_all(&mut self, qubits: &[Qubit]) -> Result<()> {
        for qubit in qubits {
            self.reset(*qubit)?;
        }
        Ok(())
    }

    /// Applies every operation of `circuit` in order.
    fn apply_circuit(&mut self, circuit: &Circuit) -> Result<()> {
        for op in circuit.operations() {
            self.apply(op)?;
        }
        Ok(())
    }
}

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Seed for measurement sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Maximum number of simultaneously live qubits.
    pub max_qubits: usize,
    /// Validate normalization after every operation.
    pub strict_normalization: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_qubits: DEFAULT_MAX_QUBITS,
            strict_normalization: false,
        }
    }
}

/// Dense state-vector implementation of [`Substrate`].
pub struct Simulator {
    engine: SimulationEngine,
    rng: StdRng,
    config: SimulatorConfig,
}

impl Simulator {
    /// Creates a simulator with default settings and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_config(SimulatorConfig::default())
    }

    /// Creates a simulator whose measurements are reproducible for `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::with_config(SimulatorConfig { seed: Some(seed), ..SimulatorConfig::default() })
    }

    pub fn with_config(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { engine: SimulationEngine::new(), rng, config }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Number of currently allocated qubits.
    pub fn live_qubits(&self) -> usize {
        self.engine.num_qubits()
    }

    /// The full state vector of all live qubits.
    pub fn state(&self) -> &StateVector {
        self.engine.state()
    }

    /// Marginal probabilities of every outcome of `qubits` without
    /// measuring. Outcome `o` has bit `r` equal to the value of `qubits[r]`.
    pub fn probabilities(&self, qubits: &[Qubit]) -> Result<Vec<f64>> {
        self.engine.probabilities(qubits)
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate for Simulator {
    fn allocate(&mut self, n: usize) -> Result<Register> {
        let qubits = self.engine.allocate(n, self.config.max_qubits)?;
        trace!(count = n, live = self.engine.num_qubits(), "allocated qubits");
        Ok(Register::new(qubits))
    }

    fn release(&mut self, register: Register) -> Result<()> {
        let qubits = register.into_qubits();
        self.engine.release(&qubits)?;
        trace!(count = qubits.len(), live = self.engine.num_qubits(), "released qubits");
        Ok(())
    }

    fn apply(&mut self, op: &Operation) -> Result<()> {
        self.engine.apply_operation(op)?;
        if self.config.strict_normalization {
            validate_state(self.engine.state(), None)?;
        }
        Ok(())
    }

    fn measure(&mut self, qubits: &[Qubit]) -> Result<BitString> {
        let bits = self.engine.measure(qubits, &mut self.rng)?;
        trace!(outcome = %bits, "measured");
        Ok(bits)
    }

    fn reset(&mut self, qubit: Qubit) -> Result<()> {
        let outcome = self.engine.measure(&[qubit], &mut self.rng)?;
        if outcome.to_u64() == 1 {
            self.engine.apply_operation(&Operation::gate(crate::operations::Gate::PauliX, qubit))?;
        }
        Ok(())
    }
}
