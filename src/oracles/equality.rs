// src/oracles/equality.rs

//! Equality marking: flip a target when two registers hold the same value.

use super::{MarkingOracle, check_input_len, check_scratch_len};
use crate::circuits::{Circuit, CircuitBuilder, within_apply};
use crate::core::{QsearchError, Qubit, Result};
use crate::operations::{Control, Gate, Operation};

/// Flips `target` iff `c0` and `c1` hold identical values.
///
/// `c1 ^= c0` is computed in place with CNOTs, the target is flipped when
/// `c1` is all zero, and the XOR is undone afterwards. `c0` and `c1` must
/// have the same length.
pub fn equality_circuit(c0: &[Qubit], c1: &[Qubit], target: Qubit) -> Result<Circuit> {
    if c0.len() != c1.len() {
        return Err(QsearchError::configuration(format!(
            "Equality oracle needs registers of equal length, got {} and {}",
            c0.len(),
            c1.len()
        )));
    }
    let xor = CircuitBuilder::new()
        .add_ops(c0.iter().zip(c1).map(|(a, b)| Operation::cnot(*a, *b)))
        .build();
    let flip = CircuitBuilder::new()
        .add_op(Operation::controlled(Gate::PauliX, Control::all_zeros(c1), target))
        .build();
    Ok(within_apply(&xor, &flip))
}

/// Compares the two halves of a `2 * width` qubit input register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EqualityOracle {
    width: usize,
}

impl EqualityOracle {
    pub fn new(width: usize) -> Self {
        Self { width }
    }
}

impl MarkingOracle for EqualityOracle {
    fn input_len(&self) -> usize {
        2 * self.width
    }

    fn marking_circuit(
        &self,
        input: &[Qubit],
        target: Qubit,
        _scratch: &[Qubit],
    ) -> Result<Circuit> {
        check_input_len(self.input_len(), input.len())?;
        let (c0, c1) = input.split_at(self.width);
        equality_circuit(c0, c1, target)
    }
}

/// Marks the single input value equal to a classical constant.
///
/// The constant is loaded into a scratch register, compared with the
/// equality circuit, and unloaded again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueOracle {
    value: u64,
    width: usize,
}

impl ValueOracle {
    pub fn new(value: u64, width: usize) -> Result<Self> {
        if width < 64 && value >> width != 0 {
            return Err(QsearchError::configuration(format!(
                "Value {} does not fit in {} qubits",
                value, width
            )));
        }
        Ok(Self { value, width })
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

impl MarkingOracle for ValueOracle {
    fn input_len(&self) -> usize {
        self.width
    }

    fn scratch_len(&self) -> usize {
        self.width
    }

    fn marking_circuit(
        &self,
        input: &[Qubit],
        target: Qubit,
        scratch: &[Qubit],
    ) -> Result<Circuit> {
        check_input_len(self.input_len(), input.len())?;
        check_scratch_len(self.scratch_len(), scratch.len())?;
        let reference = &scratch[..self.width];
        let load = CircuitBuilder::new().xor_constant(self.value, reference).build();
        Ok(within_apply(&load, &equality_circuit(reference, input, target)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::oracles::{OracleMode, apply_marking};
    use crate::scope::with_register;
    use crate::simulation::{Simulator, Substrate};

    /// Loads `value` into a register, runs the oracle and measures the target.
    fn mark_value(oracle: &dyn MarkingOracle, value: u64) -> Result<bool> {
        let mut sim = Simulator::seeded(17);
        with_register(&mut sim, oracle.input_len() + 1, |sim, reg| {
            let (input, target) = reg.split_at(oracle.input_len());
            sim.apply_circuit(&CircuitBuilder::new().xor_constant(value, input).build())?;
            apply_marking(sim, oracle, OracleMode::Forward, input, target[0])?;
            let flipped = sim.measure(target)?.to_u64() == 1;
            assert_eq!(sim.measure(input)?.to_u64(), value, "input must be left unchanged");
            Ok(flipped)
        })
    }

    #[test]
    fn test_equality_marks_equal_halves() -> Result<()> {
        let oracle = EqualityOracle::new(2);
        for c0 in 0..4u64 {
            for c1 in 0..4u64 {
                let marked = mark_value(&oracle, c0 | (c1 << 2))?;
                assert_eq!(marked, c0 == c1, "c0={} c1={}", c0, c1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_value_oracle_marks_only_value() -> Result<()> {
        let oracle = ValueOracle::new(5, 3)?;
        for x in 0..8u64 {
            assert_eq!(mark_value(&oracle, x)?, x == 5, "x={}", x);
        }
        Ok(())
    }

    #[test]
    fn test_value_too_wide_rejected() {
        assert!(ValueOracle::new(8, 3).is_err());
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let mut sim = Simulator::seeded(1);
        let result =
            with_register(&mut sim, 4, |_, reg| equality_circuit(&reg[..1], &reg[1..3], reg[3]));
        assert!(matches!(result, Err(QsearchError::Configuration { .. })));
    }
}
