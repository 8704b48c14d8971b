// src/scope.rs

//! Scoped helpers that guarantee cleanup on every exit path.
//!
//! `within` applies a transform, runs a body and then always applies the
//! transform's adjoint, even if the body failed. `with_register` allocates
//! qubits, runs a body and then always resets and releases them.

use crate::circuits::Circuit;
use crate::core::{Register, Result};
use crate::simulation::Substrate;

/// Applies `transform`, runs `body`, then applies `transform.adjoint()`.
///
/// The body's error takes precedence over an error from the uncompute step.
pub fn within<S, T, F>(sim: &mut S, transform: &Circuit, body: F) -> Result<T>
where
    S: Substrate + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    sim.apply_circuit(transform)?;
    let outcome = body(sim);
    let undo = sim.apply_circuit(&transform.adjoint());
    finish(outcome, undo)
}

/// Allocates `n` qubits, runs `body`, then resets and releases them.
pub fn with_register<S, T, F>(sim: &mut S, n: usize, body: F) -> Result<T>
where
    S: Substrate + ?Sized,
    F: FnOnce(&mut S, &Register) -> Result<T>,
{
    let register = sim.allocate(n)?;
    let outcome = body(sim, &register);
    let cleanup = sim.reset_all(&register).and_then(|()| sim.release(register));
    finish(outcome, cleanup)
}

fn finish<T>(outcome: Result<T>, cleanup: Result<()>) -> Result<T> {
    match (outcome, cleanup) {
        (Err(e), _) => Err(e),
        (Ok(_), Err(e)) => Err(e),
        (Ok(value), Ok(())) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QsearchError;
    use crate::operations::{Gate, Operation};
    use crate::simulation::Simulator;

    #[test]
    fn test_with_register_releases_on_error() {
        let mut sim = Simulator::seeded(11);
        let result: Result<()> = with_register(&mut sim, 3, |sim, reg| {
            sim.apply_circuit(&CircuitBuilder::new().each(Gate::Hadamard, reg).build())?;
            Err(QsearchError::configuration("body failed"))
        });
        assert!(matches!(result, Err(QsearchError::Configuration { .. })));
        assert_eq!(sim.live_qubits(), 0, "qubits must be released after a failing body");
    }

    #[test]
    fn test_within_conjugates_body() -> Result<()> {
        let mut sim = Simulator::seeded(11);
        with_register(&mut sim, 2, |sim, reg| {
            let transform = CircuitBuilder::new().each(Gate::Hadamard, reg).build();
            // H Z H = X, so only the first qubit ends up flipped.
            within(sim, &transform, |sim| sim.apply(&Operation::gate(Gate::PauliZ, reg[0])))?;
            let probs = sim.probabilities(reg)?;
            assert!((probs[0b01] - 1.0).abs() < 1e-9, "unexpected distribution {:?}", probs);
            Ok(())
        })
    }

    #[test]
    fn test_within_without_body_is_identity() -> Result<()> {
        let mut sim = Simulator::seeded(5);
        with_register(&mut sim, 3, |sim, reg| {
            let transform = CircuitBuilder::new()
                .each(Gate::Hadamard, reg)
                .add_op(Operation::gate(Gate::Ry(0.7), reg[2]))
                .add_op(Operation::cnot(reg[2], reg[0]))
                .build();
            within(sim, &transform, |_| Ok(()))?;
            assert!(sim.measure(reg)?.is_all_zero());
            Ok(())
        })
    }
}
