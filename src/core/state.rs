// src/core/state.rs

use num_complex::Complex;
use std::fmt;

/// The amplitude vector of every live qubit in a substrate.
///
/// Basis index `k` encodes one classical assignment: bit `p` of `k` is the
/// value of the qubit stored at bit position `p`. The dimension is always
/// `2^n` for `n` live qubits (a single amplitude when no qubit is live).
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
}

impl StateVector {
    pub(crate) fn new(initial_vector: Vec<Complex<f64>>) -> Self {
        Self { amplitudes: initial_vector }
    }

    /// Provides read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of basis states represented.
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Sum of squared magnitudes; `1.0` for a valid state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State[")?;
        for (i, c) in self.amplitudes.iter().enumerate() {
            write!(f, "{}{:.4}", if i > 0 { ", " } else { "" }, c)?;
        }
        write!(f, "]")
    }
}

/// Classical outcome of measuring a register.
///
/// Bit `i` is the outcome of the register's `i`-th qubit. Only a substrate
/// produces bit strings, and they are immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub(crate) fn new(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// The measured bits in register order.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Reads the bits as a little-endian unsigned integer.
    pub fn to_u64(&self) -> u64 {
        bits_to_u64(&self.bits)
    }

    /// Reads consecutive chunks of `size` bits as little-endian integers.
    /// Used to decode per-vertex colors from a coloring register.
    pub fn chunk_values(&self, size: usize) -> Vec<u64> {
        self.bits.chunks(size.max(1)).map(bits_to_u64).collect()
    }

    /// Returns `true` if every bit is zero.
    pub fn is_all_zero(&self) -> bool {
        self.bits.iter().all(|b| !b)
    }
}

fn bits_to_u64(bits: &[bool]) -> u64 {
    bits.iter()
        .enumerate()
        .filter(|(_, b)| **b)
        .fold(0u64, |acc, (i, _)| acc | (1 << i))
}

/// Little-endian bit decomposition of `value` over `width` bits.
pub fn u64_to_bits(value: u64, width: usize) -> Vec<bool> {
    (0..width).map(|i| (value >> i) & 1 == 1).collect()
}

impl fmt::Display for BitString {
    // Printed most significant bit first, like a ket label.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|")?;
        for b in self.bits.iter().rev() {
            write!(f, "{}", if *b { '1' } else { '0' })?;
        }
        write!(f, ">")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_string_little_endian() {
        let bits = BitString::new(vec![true, false, true, true]);
        assert_eq!(bits.to_u64(), 13);
        assert_eq!(format!("{}", bits), "|1101>");
        assert_eq!(bits.chunk_values(2), vec![1, 3]);
    }

    #[test]
    fn test_u64_to_bits_matches_decoding() {
        for value in 0..16u64 {
            let bits = BitString::new(u64_to_bits(value, 4));
            assert_eq!(bits.to_u64(), value);
        }
        assert!(BitString::new(u64_to_bits(0, 3)).is_all_zero());
    }
}
