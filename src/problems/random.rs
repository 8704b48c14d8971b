// src/problems/random.rs

//! Random numbers from measured superpositions.

use crate::core::{QsearchError, Result};
use crate::grover::uniform_preparation;
use crate::scope::with_register;
use crate::simulation::Substrate;
use tracing::trace;

/// Measures one qubit in (|0> + |1>)/√2.
pub fn random_bit<S: Substrate + ?Sized>(sim: &mut S) -> Result<bool> {
    Ok(sample_bits(sim, 1)? == 1)
}

/// Uniform integer in `min..=max`.
///
/// Measures just enough superposed qubits to cover `max - min` and rejects
/// samples above it.
pub fn random_number<S: Substrate + ?Sized>(sim: &mut S, min: u64, max: u64) -> Result<u64> {
    if min > max {
        return Err(QsearchError::configuration(format!(
            "Empty sampling range: min {} is greater than max {}",
            min, max
        )));
    }
    let span = max - min;
    let width = (u64::BITS - span.leading_zeros()) as usize;
    loop {
        let sample = sample_bits(sim, width)?;
        if sample <= span {
            return Ok(min + sample);
        }
        trace!(sample, span, "rejected sample");
    }
}

fn sample_bits<S: Substrate + ?Sized>(sim: &mut S, width: usize) -> Result<u64> {
    if width == 0 {
        return Ok(0);
    }
    with_register(sim, width, |sim, register| {
        sim.apply_circuit(&uniform_preparation(register))?;
        Ok(sim.measure(register)?.to_u64())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Simulator;

    #[test]
    fn test_stays_in_range() -> Result<()> {
        let mut sim = Simulator::seeded(99);
        for _ in 0..200 {
            let value = random_number(&mut sim, 3, 9)?;
            assert!((3..=9).contains(&value), "value {} out of range", value);
        }
        assert_eq!(sim.live_qubits(), 0);
        Ok(())
    }

    #[test]
    fn test_covers_small_range() -> Result<()> {
        let mut sim = Simulator::seeded(5);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[random_number(&mut sim, 0, 2)? as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
        Ok(())
    }

    #[test]
    fn test_degenerate_and_empty_ranges() -> Result<()> {
        let mut sim = Simulator::seeded(5);
        assert_eq!(random_number(&mut sim, 7, 7)?, 7);
        assert!(matches!(random_number(&mut sim, 8, 7), Err(QsearchError::Configuration { .. })));
        Ok(())
    }

    #[test]
    fn test_random_bit_takes_both_values() -> Result<()> {
        let mut sim = Simulator::seeded(12);
        let ones = (0..64).map(|_| random_bit(&mut sim)).collect::<Result<Vec<_>>>()?;
        assert!(ones.iter().any(|b| *b) && ones.iter().any(|b| !*b));
        Ok(())
    }
}
