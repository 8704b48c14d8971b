// src/grover/diffusion.rs

//! State preparation and the reflection about the prepared state.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{AMPLITUDE_TOLERANCE, QsearchError, Qubit, Result};
use crate::operations::{Control, Gate, Operation};
use crate::scope::within;
use crate::simulation::Substrate;

/// Hadamard on every qubit: the uniform superposition over `2^n` states.
pub fn uniform_preparation(register: &[Qubit]) -> Circuit {
    CircuitBuilder::new().each(Gate::Hadamard, register).build()
}

/// Prepares `sum_i sqrt(w_i) |i>` from |0...0> with a tree of controlled Ry
/// rotations, where `w_i` are the squared `amplitudes` after normalization.
///
/// `amplitudes[i]` belongs to basis state `i` read little-endian from
/// `register`; missing trailing entries are zero. The most significant qubit
/// is rotated first, then every lower qubit once per value of the qubits
/// above it, so the circuit has at most `2^n - 1` rotations.
pub fn amplitude_preparation(amplitudes: &[f64], register: &[Qubit]) -> Result<Circuit> {
    let n = register.len();
    let dim = 1usize
        .checked_shl(n as u32)
        .filter(|_| n < usize::BITS as usize)
        .ok_or_else(|| {
            QsearchError::configuration(format!("Register of {} qubits is too large", n))
        })?;
    if amplitudes.is_empty() || amplitudes.len() > dim {
        return Err(QsearchError::configuration(format!(
            "Expected between 1 and {} amplitudes for {} qubits, got {}",
            dim,
            n,
            amplitudes.len()
        )));
    }
    if let Some(bad) = amplitudes.iter().find(|a| !a.is_finite() || **a < 0.0) {
        return Err(QsearchError::configuration(format!(
            "Amplitudes must be finite and non-negative, got {}",
            bad
        )));
    }

    let mut weights = vec![0.0; dim];
    for (w, a) in weights.iter_mut().zip(amplitudes) {
        *w = a * a;
    }
    if weights.iter().sum::<f64>() <= AMPLITUDE_TOLERANCE {
        return Err(QsearchError::configuration("Amplitudes are all zero"));
    }

    let mut builder = CircuitBuilder::new();
    for q in (0..n).rev() {
        let above = n - 1 - q;
        let block = 1usize << q;
        for prefix in 0..(1usize << above) {
            let base = prefix << (q + 1);
            let zero: f64 = weights[base..base + block].iter().sum();
            let one: f64 = weights[base + block..base + 2 * block].iter().sum();
            if one <= AMPLITUDE_TOLERANCE {
                continue;
            }
            let angle = 2.0 * one.sqrt().atan2(zero.sqrt());
            let controls = (0..above)
                .map(|j| Control { qubit: register[q + 1 + j], on: (prefix >> j) & 1 == 1 })
                .collect();
            builder = builder.add_op(Operation::controlled(Gate::Ry(angle), controls, register[q]));
        }
    }
    Ok(builder.build())
}

/// Reflects `register` about the state that `preparation` produces from
/// |0...0>, up to a global phase.
///
/// Undoes the preparation, maps |0...0> to |1...1>, flips the sign of
/// |1...1> with a Z on the last qubit controlled on all others, and
/// reverses the first two steps.
pub fn reflect_about_prepared<S>(
    sim: &mut S,
    preparation: &Circuit,
    register: &[Qubit],
) -> Result<()>
where
    S: Substrate + ?Sized,
{
    let Some((last, rest)) = register.split_last() else {
        return Err(QsearchError::configuration("Cannot reflect an empty register"));
    };
    let transform = CircuitBuilder::new()
        .add_circuit(&preparation.adjoint())
        .each(Gate::PauliX, register)
        .build();
    let flip = Operation::controlled(Gate::PauliZ, Control::all_ones(rest), *last);
    within(sim, &transform, |sim| sim.apply(&flip))
}
