// src/problems/isbn.rs

//! Recovery of one missing ISBN-10 digit by amplitude amplification.

use crate::circuits::Circuit;
use crate::core::{BitString, Qubit, Result};
use crate::grover::{SearchProblem, amplitude_preparation, single_solution_iterations};
use crate::oracles::isbn::{DIGIT_QUBITS, ISBN_LENGTH};
use crate::oracles::{
    IsbnConstants, IsbnOracle, PhaseKickback, PhaseOracle, is_isbn_valid, isbn_check_constants,
};
use crate::simulation::Substrate;

/// Values a digit can take.
const DIGIT_DOMAIN: usize = 10;

/// An ISBN-10 with exactly one unknown digit, marked by a negative entry.
#[derive(Debug, Clone)]
pub struct IsbnSearch {
    digits: Vec<i32>,
    oracle: IsbnOracle,
}

impl IsbnSearch {
    pub fn new(digits: &[i32]) -> Result<Self> {
        let constants = isbn_check_constants(digits)?;
        Ok(Self { digits: digits.to_vec(), oracle: IsbnOracle::new(constants) })
    }

    pub fn constants(&self) -> &IsbnConstants {
        self.oracle.constants()
    }

    pub fn digits(&self) -> &[i32] {
        &self.digits
    }

    /// The full ISBN with `digit` in the missing slot, or `None` if `digit`
    /// is not a decimal digit.
    pub fn complete(&self, digit: u64) -> Option<[u8; ISBN_LENGTH]> {
        let digit = u8::try_from(digit).ok().filter(|d| *d <= 9)?;
        let mut full = [0u8; ISBN_LENGTH];
        for (slot, d) in full.iter_mut().zip(&self.digits) {
            *slot = if *d < 0 { digit } else { *d as u8 };
        }
        Some(full)
    }
}

impl SearchProblem for IsbnSearch {
    type Solution = u64;

    fn register_len(&self) -> usize {
        DIGIT_QUBITS
    }

    fn iterations(&self) -> Result<usize> {
        single_solution_iterations(DIGIT_DOMAIN as u64)
    }

    fn solution_count(&self) -> Option<u64> {
        Some(1)
    }

    /// Equal superposition of the ten digit values; 10..=15 get no amplitude.
    fn preparation(&self, register: &[Qubit]) -> Result<Circuit> {
        amplitude_preparation(&[1.0; DIGIT_DOMAIN], register)
    }

    fn apply_oracle(&self, sim: &mut dyn Substrate, register: &[Qubit]) -> Result<()> {
        PhaseKickback::new(&self.oracle).apply_phase(sim, register)
    }

    fn decode(&self, bits: &BitString) -> u64 {
        bits.to_u64()
    }

    fn verify(&self, candidate: &u64) -> bool {
        self.complete(*candidate).is_some_and(|full| is_isbn_valid(&full))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIGITS: [i32; 10] = [0, 3, 0, 6, -1, 0, 6, 1, 5, 2];

    #[test]
    fn test_complete_fills_missing_slot() -> Result<()> {
        let search = IsbnSearch::new(&DIGITS)?;
        assert_eq!(search.complete(4), Some([0, 3, 0, 6, 4, 0, 6, 1, 5, 2]));
        assert_eq!(search.complete(10), None);
        Ok(())
    }

    #[test]
    fn test_verify_only_accepts_four() -> Result<()> {
        let search = IsbnSearch::new(&DIGITS)?;
        let accepted: Vec<u64> = (0..16).filter(|x| search.verify(x)).collect();
        assert_eq!(accepted, vec![4]);
        assert_eq!(search.iterations()?, 2);
        Ok(())
    }
}
