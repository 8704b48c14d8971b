// src/oracles/isbn.rs

//! ISBN-10 check-digit recovery as a modular-arithmetic marking oracle.
//!
//! An ISBN-10 `d0..d9` is valid when `sum((10 - j) * d_j) mod 11 == 0`.
//! With one digit `x` unknown at position `i` this becomes
//! `(b + a * x) mod 11 == 0` where `a = 10 - i` and `b` is the weighted sum
//! of the known digits.

use super::{MarkingOracle, check_input_len, check_scratch_len};
use crate::circuits::{Circuit, CircuitBuilder, within_apply};
use crate::core::{QsearchError, Qubit, Result};
use crate::operations::{Control, Gate, Operation};

/// Number of digits in an ISBN-10.
pub const ISBN_LENGTH: usize = 10;
/// Modulus of the ISBN-10 check equation.
pub const ISBN_MODULUS: u64 = 11;
/// Qubits per digit register; enough for 0..=10.
pub const DIGIT_QUBITS: usize = 4;

/// Constants `(a, b)` of the check equation `(b + a * x) mod 11 == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsbnConstants {
    pub a: u64,
    pub b: u64,
    /// Index of the missing digit.
    pub missing_index: usize,
}

fn weight(index: usize) -> u64 {
    (ISBN_LENGTH - index) as u64
}

/// Derives the check constants for `digits`, where exactly one entry is
/// negative (the missing digit) and all others are in `0..=9`.
pub fn isbn_check_constants(digits: &[i32]) -> Result<IsbnConstants> {
    if digits.len() != ISBN_LENGTH {
        return Err(QsearchError::configuration(format!(
            "Expected {} ISBN digits, got {}",
            ISBN_LENGTH,
            digits.len()
        )));
    }
    let missing: Vec<usize> =
        digits.iter().enumerate().filter(|(_, d)| **d < 0).map(|(i, _)| i).collect();
    let missing_index = match missing.as_slice() {
        [index] => *index,
        _ => {
            return Err(QsearchError::configuration(format!(
                "Expected exactly one missing ISBN digit, found {}",
                missing.len()
            )));
        }
    };
    if let Some(bad) = digits.iter().find(|d| **d > 9) {
        return Err(QsearchError::configuration(format!(
            "ISBN digit {} is out of range 0..=9",
            bad
        )));
    }

    let b = digits
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != missing_index)
        .map(|(i, d)| weight(i) * *d as u64)
        .sum::<u64>()
        % ISBN_MODULUS;
    Ok(IsbnConstants { a: weight(missing_index), b, missing_index })
}

/// Classical ISBN-10 validity check on a complete digit sequence.
pub fn is_isbn_valid(digits: &[u8; ISBN_LENGTH]) -> bool {
    digits
        .iter()
        .enumerate()
        .map(|(i, d)| weight(i) * *d as u64)
        .sum::<u64>()
        % ISBN_MODULUS
        == 0
}

/// Flips the target iff the 4-qubit digit register `x` satisfies
/// `(b + a * x) mod 11 == 0`.
///
/// `b` is XORed into a 4-qubit scratch register, `a * x` is added to it
/// modulo 11, the target is flipped when the scratch register is zero, and
/// the arithmetic is undone. Every `x` in `0..=15` is evaluated, so values
/// above 9 can be marked as well; those are rejected classically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsbnOracle {
    constants: IsbnConstants,
}

impl IsbnOracle {
    pub fn new(constants: IsbnConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &IsbnConstants {
        &self.constants
    }
}

impl MarkingOracle for IsbnOracle {
    fn input_len(&self) -> usize {
        DIGIT_QUBITS
    }

    fn scratch_len(&self) -> usize {
        DIGIT_QUBITS
    }

    fn marking_circuit(
        &self,
        input: &[Qubit],
        target: Qubit,
        scratch: &[Qubit],
    ) -> Result<Circuit> {
        check_input_len(self.input_len(), input.len())?;
        check_scratch_len(self.scratch_len(), scratch.len())?;
        let accumulator = &scratch[..DIGIT_QUBITS];

        let compute = CircuitBuilder::new()
            .xor_constant(self.constants.b, accumulator)
            .add_op(Operation::ModularMultiplyAdd {
                multiplier: self.constants.a,
                modulus: ISBN_MODULUS,
                input: input.to_vec(),
                accumulator: accumulator.to_vec(),
                controls: Vec::new(),
            })
            .build();
        let flip = CircuitBuilder::new()
            .add_op(Operation::controlled(Gate::PauliX, Control::all_zeros(accumulator), target))
            .build();
        Ok(within_apply(&compute, &flip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITS: [i32; 10] = [0, 3, 0, 6, -1, 0, 6, 1, 5, 2];

    #[test]
    fn test_constants_for_known_example() -> Result<()> {
        let constants = isbn_check_constants(&DIGITS)?;
        assert_eq!(constants.a, 6);
        assert_eq!(constants.b, (3 * 9 + 6 * 7 + 6 * 4 + 3 + 5 * 2 + 2) % 11);
        assert_eq!(constants.b, 9);
        assert_eq!(constants.missing_index, 4);
        Ok(())
    }

    #[test]
    fn test_only_correct_digit_completes_isbn() -> Result<()> {
        let constants = isbn_check_constants(&DIGITS)?;
        for x in 0..10u8 {
            let mut digits = [0u8; 10];
            for (slot, d) in digits.iter_mut().zip(DIGITS) {
                *slot = if d < 0 { x } else { d as u8 };
            }
            let satisfies = (constants.b + constants.a * x as u64) % ISBN_MODULUS == 0;
            assert_eq!(is_isbn_valid(&digits), x == 4, "digit {}", x);
            assert_eq!(satisfies, x == 4, "digit {}", x);
        }
        Ok(())
    }

    #[test]
    fn test_rejects_malformed_digits() {
        assert!(isbn_check_constants(&[0, 1, 2]).is_err());
        assert!(isbn_check_constants(&[0, 3, 0, 6, 4, 0, 6, 1, 5, 2]).is_err(), "no missing digit");
        let two_missing = [-1, 3, 0, 6, -1, 0, 6, 1, 5, 2];
        assert!(isbn_check_constants(&two_missing).is_err(), "two missing digits");
        let out_of_range = [12, 3, 0, 6, -1, 0, 6, 1, 5, 2];
        assert!(isbn_check_constants(&out_of_range).is_err(), "digit out of range");
    }
}
