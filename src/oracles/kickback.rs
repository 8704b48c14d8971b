// src/oracles/kickback.rs

use super::{MarkingOracle, PhaseOracle, check_input_len};
use crate::circuits::CircuitBuilder;
use crate::core::{Qubit, Result};
use crate::operations::{Gate, Operation};
use crate::scope::{with_register, within};
use crate::simulation::Substrate;

/// Phase oracle built from a marking oracle by phase kickback.
///
/// An auxiliary qubit is prepared in |-> = (|0> - |1>)/√2 and used as the
/// marking target. |-> is an eigenstate of X with eigenvalue -1, so the
/// conditional flip becomes a conditional -1 phase on the input while the
/// auxiliary qubit itself is unchanged.
#[derive(Debug, Clone)]
pub struct PhaseKickback<O: MarkingOracle> {
    oracle: O,
}

impl<O: MarkingOracle> PhaseKickback<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    pub fn inner(&self) -> &O {
        &self.oracle
    }
}

impl<O: MarkingOracle> PhaseOracle for PhaseKickback<O> {
    fn input_len(&self) -> usize {
        self.oracle.input_len()
    }

    fn apply_phase(&self, sim: &mut dyn Substrate, input: &[Qubit]) -> Result<()> {
        check_input_len(self.oracle.input_len(), input.len())?;
        with_register(sim, 1 + self.oracle.scratch_len(), |sim, aux| {
            let (target, scratch) = (aux[0], &aux[1..]);
            let minus = CircuitBuilder::new()
                .add_op(Operation::gate(Gate::PauliX, target))
                .add_op(Operation::gate(Gate::Hadamard, target))
                .build();
            let marking = self.oracle.marking_circuit(input, target, scratch)?;
            within(sim, &minus, |sim| sim.apply_circuit(&marking))
        })
    }
}
