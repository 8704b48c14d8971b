// src/operations/mod.rs

//! Defines the operations a substrate applies to its qubits.
//!
//! The vocabulary is deliberately small: the single-qubit gates needed for
//! superposition, bit flips, phase flips and real-amplitude state
//! preparation, each optionally conditioned on any number of control
//! qubits, plus one reversible arithmetic permutation used by the
//! check-digit oracle.

use crate::core::Qubit;
use num_complex::Complex;
use num_traits::Zero;

/// A single-qubit unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Maps |0> to (|0> + |1>)/√2 and |1> to (|0> - |1>)/√2.
    Hadamard,
    /// Bit flip.
    PauliX,
    /// Phase flip of the |1> component.
    PauliZ,
    /// Real rotation `[[cos a, -sin a], [sin a, cos a]]` with `a = theta / 2`.
    Ry(f64),
    /// Multiplies the |1> component by `e^(i*theta)`.
    Phase(f64),
}

impl Gate {
    /// The 2x2 matrix of the gate in the {|0>, |1>} basis.
    pub fn matrix(&self) -> [[Complex<f64>; 2]; 2] {
        use std::f64::consts::FRAC_1_SQRT_2;
        let one = Complex::new(1.0, 0.0);
        match *self {
            Gate::Hadamard => [
                [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(FRAC_1_SQRT_2, 0.0)],
                [Complex::new(FRAC_1_SQRT_2, 0.0), Complex::new(-FRAC_1_SQRT_2, 0.0)],
            ],
            Gate::PauliX => [[Complex::zero(), one], [one, Complex::zero()]],
            Gate::PauliZ => [[one, Complex::zero()], [Complex::zero(), -one]],
            Gate::Ry(theta) => {
                let (sin_a, cos_a) = (theta / 2.0).sin_cos();
                [
                    [Complex::new(cos_a, 0.0), Complex::new(-sin_a, 0.0)],
                    [Complex::new(sin_a, 0.0), Complex::new(cos_a, 0.0)],
                ]
            }
            Gate::Phase(theta) => [
                [one, Complex::zero()],
                [Complex::zero(), Complex::new(theta.cos(), theta.sin())],
            ],
        }
    }

    /// The inverse gate.
    pub fn adjoint(&self) -> Gate {
        match *self {
            Gate::Ry(theta) => Gate::Ry(-theta),
            Gate::Phase(theta) => Gate::Phase(-theta),
            other => other, // H, X and Z are self-inverse
        }
    }

    /// Short label used when rendering circuits.
    pub fn symbol(&self) -> &'static str {
        match self {
            Gate::Hadamard => "H",
            Gate::PauliX => "X",
            Gate::PauliZ => "Z",
            Gate::Ry(_) => "Ry",
            Gate::Phase(_) => "P",
        }
    }
}

/// Conditions an operation on a qubit holding a specific classical value.
///
/// `on == true` is the usual control on |1>; `on == false` controls on |0>,
/// which is how "flip the target iff the register is all zero" is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Control {
    pub qubit: Qubit,
    pub on: bool,
}

impl Control {
    pub fn one(qubit: Qubit) -> Self {
        Self { qubit, on: true }
    }

    pub fn zero(qubit: Qubit) -> Self {
        Self { qubit, on: false }
    }

    /// Controls on every qubit of `qubits` being |1>.
    pub fn all_ones(qubits: &[Qubit]) -> Vec<Control> {
        qubits.iter().copied().map(Control::one).collect()
    }

    /// Controls on every qubit of `qubits` being |0>.
    pub fn all_zeros(qubits: &[Qubit]) -> Vec<Control> {
        qubits.iter().copied().map(Control::zero).collect()
    }
}

/// An operation applied to the qubits of a substrate.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// A single-qubit gate, applied only on basis states where every
    /// control holds its required value.
    Single {
        gate: Gate,
        target: Qubit,
        controls: Vec<Control>,
    },

    /// Modular multiply-accumulate on little-endian integers:
    /// `|x>|y> -> |x>|(y + multiplier * x) mod modulus>` for `y < modulus`.
    /// Basis states with `y >= modulus` are left untouched, which keeps the
    /// map a permutation of basis states and therefore unitary.
    ModularMultiplyAdd {
        multiplier: u64,
        modulus: u64,
        input: Vec<Qubit>,
        accumulator: Vec<Qubit>,
        controls: Vec<Control>,
    },
}

impl Operation {
    /// Uncontrolled single-qubit gate.
    pub fn gate(gate: Gate, target: Qubit) -> Self {
        Operation::Single { gate, target, controls: Vec::new() }
    }

    /// Single-qubit gate conditioned on `controls`.
    pub fn controlled(gate: Gate, controls: Vec<Control>, target: Qubit) -> Self {
        Operation::Single { gate, target, controls }
    }

    /// Controlled-NOT, the reversible XOR of `control` into `target`.
    pub fn cnot(control: Qubit, target: Qubit) -> Self {
        Self::controlled(Gate::PauliX, vec![Control::one(control)], target)
    }

    /// Every qubit the operation reads or writes, controls included.
    pub fn involved_qubits(&self) -> Vec<Qubit> {
        match self {
            Operation::Single { target, controls, .. } => {
                let mut qubits: Vec<Qubit> = controls.iter().map(|c| c.qubit).collect();
                qubits.push(*target);
                qubits
            }
            Operation::ModularMultiplyAdd { input, accumulator, controls, .. } => controls
                .iter()
                .map(|c| c.qubit)
                .chain(input.iter().copied())
                .chain(accumulator.iter().copied())
                .collect(),
        }
    }

    /// The inverse operation.
    ///
    /// Subtracting `a*x` modulo `N` is adding `(N - a mod N) * x`, so the
    /// arithmetic permutation stays within its own variant.
    pub fn adjoint(&self) -> Operation {
        match self {
            Operation::Single { gate, target, controls } => Operation::Single {
                gate: gate.adjoint(),
                target: *target,
                controls: controls.clone(),
            },
            Operation::ModularMultiplyAdd { multiplier, modulus, input, accumulator, controls } => {
                let m = (*modulus).max(1);
                Operation::ModularMultiplyAdd {
                    multiplier: (m - multiplier % m) % m,
                    modulus: *modulus,
                    input: input.clone(),
                    accumulator: accumulator.clone(),
                    controls: controls.clone(),
                }
            }
        }
    }

    /// The same operation with `extra` prepended to its controls.
    pub fn with_controls(&self, extra: &[Control]) -> Operation {
        let mut op = self.clone();
        match &mut op {
            Operation::Single { controls, .. } | Operation::ModularMultiplyAdd { controls, .. } => {
                let mut merged = extra.to_vec();
                merged.append(controls);
                *controls = merged;
            }
        }
        op
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(id: u64) -> Qubit {
        Qubit::new(id)
    }

    #[test]
    fn test_gate_adjoint_undoes_rotation() {
        let theta = 0.73;
        let m = Gate::Ry(theta).matrix();
        let m_inv = Gate::Ry(theta).adjoint().matrix();
        for row in 0..2 {
            for col in 0..2 {
                let entry = m_inv[row][0] * m[0][col] + m_inv[row][1] * m[1][col];
                let expected = if row == col { 1.0 } else { 0.0 };
                assert!((entry.re - expected).abs() < 1e-12 && entry.im.abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_modular_adjoint_negates_multiplier() {
        let op = Operation::ModularMultiplyAdd {
            multiplier: 6,
            modulus: 11,
            input: vec![q(0)],
            accumulator: vec![q(1)],
            controls: vec![],
        };
        match op.adjoint() {
            Operation::ModularMultiplyAdd { multiplier, .. } => assert_eq!(multiplier, 5),
            other => panic!("unexpected adjoint {:?}", other),
        }
    }

    #[test]
    fn test_with_controls_prepends() {
        let op = Operation::cnot(q(1), q(2)).with_controls(&[Control::zero(q(0))]);
        assert_eq!(op.involved_qubits(), vec![q(0), q(1), q(2)]);
    }
}
