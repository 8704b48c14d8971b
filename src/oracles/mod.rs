// src/oracles/mod.rs

//! Marking and phase oracles.
//!
//! A [`MarkingOracle`] flips a target qubit exactly when its input register
//! satisfies a predicate, for every basis state of a superposition at once.
//! It is described as a [`Circuit`], so its adjoint and controlled variants
//! come for free ([`OracleMode`]). A [`PhaseOracle`] instead multiplies the
//! amplitude of every satisfying input by -1; [`PhaseKickback`] turns the
//! former into the latter.

pub mod coloring;
pub mod equality;
pub mod isbn;
pub mod kickback;

pub use coloring::VertexColoringOracle;
pub use equality::{EqualityOracle, ValueOracle, equality_circuit};
pub use isbn::{IsbnConstants, IsbnOracle, is_isbn_valid, isbn_check_constants};
pub use kickback::PhaseKickback;

use crate::circuits::Circuit;
use crate::core::{QsearchError, Qubit, Result};
use crate::operations::Control;
use crate::scope::with_register;
use crate::simulation::Substrate;

/// A circuit that flips `target` iff the input satisfies a predicate.
///
/// Implementations may use `scratch_len()` scratch qubits, which are handed
/// to them in |0> and must be returned in |0>.
pub trait MarkingOracle {
    /// Number of input qubits the oracle reads.
    fn input_len(&self) -> usize;

    /// Number of scratch qubits the circuit needs.
    fn scratch_len(&self) -> usize {
        0
    }

    /// Builds the marking circuit for concrete qubits.
    fn marking_circuit(&self, input: &[Qubit], target: Qubit, scratch: &[Qubit]) -> Result<Circuit>;
}

impl<O: MarkingOracle + ?Sized> MarkingOracle for &O {
    fn input_len(&self) -> usize {
        (**self).input_len()
    }

    fn scratch_len(&self) -> usize {
        (**self).scratch_len()
    }

    fn marking_circuit(
        &self,
        input: &[Qubit],
        target: Qubit,
        scratch: &[Qubit],
    ) -> Result<Circuit> {
        (**self).marking_circuit(input, target, scratch)
    }
}

/// An operation that flips the sign of every satisfying input state and
/// leaves computational-basis contents otherwise unchanged.
pub trait PhaseOracle {
    /// Number of input qubits the oracle reads.
    fn input_len(&self) -> usize;

    /// Applies the phase flip to `input`.
    fn apply_phase(&self, sim: &mut dyn Substrate, input: &[Qubit]) -> Result<()>;
}

/// How a marking oracle is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleMode<'a> {
    Forward,
    Adjoint,
    /// Only acts on basis states where every control holds its value.
    Controlled(&'a [Control]),
}

/// Either kind of oracle, as accepted by the search driver.
#[derive(Clone, Copy)]
pub enum Oracle<'a> {
    Marking(&'a dyn MarkingOracle),
    Phase(&'a dyn PhaseOracle),
}

/// Marking oracles are applied through phase kickback.
impl PhaseOracle for Oracle<'_> {
    fn input_len(&self) -> usize {
        match self {
            Oracle::Marking(oracle) => oracle.input_len(),
            Oracle::Phase(oracle) => oracle.input_len(),
        }
    }

    fn apply_phase(&self, sim: &mut dyn Substrate, input: &[Qubit]) -> Result<()> {
        match self {
            Oracle::Marking(oracle) => PhaseKickback::new(*oracle).apply_phase(sim, input),
            Oracle::Phase(oracle) => oracle.apply_phase(sim, input),
        }
    }
}

/// Runs `oracle` on `input` with `target`, allocating and releasing its
/// scratch qubits around the call.
pub fn apply_marking<S, O>(
    sim: &mut S,
    oracle: &O,
    mode: OracleMode<'_>,
    input: &[Qubit],
    target: Qubit,
) -> Result<()>
where
    S: Substrate + ?Sized,
    O: MarkingOracle + ?Sized,
{
    check_input_len(oracle.input_len(), input.len())?;
    with_register(sim, oracle.scratch_len(), |sim, scratch| {
        let circuit = oracle.marking_circuit(input, target, scratch)?;
        let circuit = match mode {
            OracleMode::Forward => circuit,
            OracleMode::Adjoint => circuit.adjoint(),
            OracleMode::Controlled(controls) => circuit.controlled_by(controls),
        };
        sim.apply_circuit(&circuit)
    })
}

pub(crate) fn check_input_len(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(QsearchError::configuration(format!(
            "Oracle expects an input register of {} qubits, got {}",
            expected, actual
        )));
    }
    Ok(())
}

pub(crate) fn check_scratch_len(expected: usize, actual: usize) -> Result<()> {
    if actual < expected {
        return Err(QsearchError::configuration(format!(
            "Oracle needs {} scratch qubits, got {}",
            expected, actual
        )));
    }
    Ok(())
}
