// src/simulation/engine.rs
use crate::core::constants::qsearch_constants::{AMPLITUDE_TOLERANCE, RELEASE_TOLERANCE};
use crate::core::{BitString, QsearchError, Qubit, QubitId, Result, StateVector};
use crate::operations::{Control, Operation};
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// State-vector engine behind [`crate::simulation::Simulator`].
///
/// Each live qubit occupies one bit position of the basis index. Newly
/// allocated qubits take the next free (highest) positions; releasing a
/// qubit removes its bit and shifts the positions above it down by one.
pub(crate) struct SimulationEngine {
    /// Maps live qubit IDs to their bit position in the basis index.
    positions: HashMap<QubitId, usize>,
    /// Amplitudes of all 2^N basis states of the live qubits.
    state: StateVector,
    /// Number of live qubits (N).
    num_qubits: usize,
    /// Next identifier handed out by `allocate`. Never reused.
    next_id: u64,
}

impl SimulationEngine {
    /// Creates an engine with no live qubits: a single amplitude of 1.
    pub(crate) fn new() -> Self {
        Self {
            positions: HashMap::new(),
            state: StateVector::new(vec![Complex::new(1.0, 0.0)]),
            num_qubits: 0,
            next_id: 0,
        }
    }

    pub(crate) fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub(crate) fn state(&self) -> &StateVector {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn set_state(&mut self, state: StateVector) -> Result<()> {
        if state.dim() != self.state.dim() {
            Err(QsearchError::simulation(format!(
                "Cannot set state: provided dimension {} does not match engine dimension {}",
                state.dim(),
                self.state.dim()
            )))
        } else {
            self.state = state;
            Ok(())
        }
    }

    /// Appends `n` qubits in |0>, tensoring them onto the existing state.
    /// `max_qubits` bounds the number of simultaneously live qubits.
    pub(crate) fn allocate(&mut self, n: usize, max_qubits: usize) -> Result<Vec<Qubit>> {
        if self.num_qubits + n > max_qubits {
            return Err(QsearchError::Allocation {
                requested: n,
                live: self.num_qubits,
                capacity: max_qubits,
            });
        }
        let new_dim = 1usize.checked_shl((self.num_qubits + n) as u32).ok_or_else(|| {
            QsearchError::simulation(
                "Number of qubits too large, state vector dimension overflows usize.",
            )
        })?;

        // New qubits sit above every existing bit, so the old amplitudes keep
        // their indices and every index with a new bit set starts at zero.
        let mut amplitudes = self.state.amplitudes().to_vec();
        amplitudes.resize(new_dim, Complex::zero());
        self.state = StateVector::new(amplitudes);

        let mut qubits = Vec::with_capacity(n);
        for _ in 0..n {
            let qubit = Qubit::new(self.next_id);
            self.next_id += 1;
            self.positions.insert(qubit.id(), self.num_qubits);
            self.num_qubits += 1;
            qubits.push(qubit);
        }
        Ok(qubits)
    }

    /// Removes `qubits` from the state. Every qubit must be in |0>: any
    /// residual |1> probability would otherwise be silently discarded.
    pub(crate) fn release(&mut self, qubits: &[Qubit]) -> Result<()> {
        let mut released = Vec::with_capacity(qubits.len());
        for qubit in qubits {
            let position = *self.position(*qubit)?;
            let residual = self.probability_of_one(position);
            if residual > RELEASE_TOLERANCE {
                return Err(QsearchError::UseAfterFree { qubit: qubit.id(), residual });
            }
            released.push((qubit.id(), position));
        }

        // Highest positions first so lower positions stay valid while compacting.
        released.sort_by(|a, b| b.1.cmp(&a.1));
        for (id, position) in released {
            self.remove_position(position);
            self.positions.remove(&id);
            for p in self.positions.values_mut() {
                if *p > position {
                    *p -= 1;
                }
            }
            self.num_qubits -= 1;
        }
        self.renormalize();
        Ok(())
    }

    /// Applies a single operation to the state.
    pub(crate) fn apply_operation(&mut self, op: &Operation) -> Result<()> {
        self.check_distinct(&op.involved_qubits())?;
        match op {
            Operation::Single { gate, target, controls } => {
                let target_pos = *self.position(*target)?;
                let (ctrl_mask, ctrl_value) = self.control_mask(controls)?;
                self.apply_single_qubit_gate(target_pos, ctrl_mask, ctrl_value, &gate.matrix());
            }
            Operation::ModularMultiplyAdd { multiplier, modulus, input, accumulator, controls } => {
                if *modulus == 0 {
                    return Err(QsearchError::configuration(
                        "Modulus of a modular multiply-add must be positive",
                    ));
                }
                if accumulator.len() < 64 && *modulus > (1u64 << accumulator.len()) {
                    return Err(QsearchError::configuration(format!(
                        "Accumulator of {} qubits cannot hold residues modulo {}",
                        accumulator.len(),
                        modulus
                    )));
                }
                let input_pos = self.positions_of(input)?;
                let acc_pos = self.positions_of(accumulator)?;
                let (ctrl_mask, ctrl_value) = self.control_mask(controls)?;
                self.apply_modular_multiply_add(
                    *multiplier,
                    *modulus,
                    &input_pos,
                    &acc_pos,
                    ctrl_mask,
                    ctrl_value,
                );
            }
        }
        Ok(())
    }

    /// Marginal outcome probabilities for `qubits`. Outcome `o` has bit `r`
    /// equal to the value of `qubits[r]`.
    pub(crate) fn probabilities(&self, qubits: &[Qubit]) -> Result<Vec<f64>> {
        let positions = self.positions_of(qubits)?;
        let mut probs = vec![0.0; 1usize << positions.len()];
        for (i, amp) in self.state.amplitudes().iter().enumerate() {
            probs[gather(i, &positions)] += amp.norm_sqr();
        }
        Ok(probs)
    }

    /// Projective measurement of `qubits`: samples an outcome from the
    /// marginal distribution, then collapses and renormalizes the state.
    pub(crate) fn measure<R: Rng>(&mut self, qubits: &[Qubit], rng: &mut R) -> Result<BitString> {
        self.check_distinct(qubits)?;
        let positions = self.positions_of(qubits)?;
        let probs = self.probabilities(qubits)?;
        let total: f64 = probs.iter().sum();
        if !total.is_finite() || total < AMPLITUDE_TOLERANCE {
            return Err(QsearchError::simulation("Measurement failed: state has negligible norm"));
        }

        let p_sample: f64 = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        // Fall back to the last non-negligible outcome if rounding leaves
        // p_sample at the very top of the range.
        let mut outcome = probs.iter().rposition(|p| *p > AMPLITUDE_TOLERANCE).unwrap_or(0);
        for (index, p) in probs.iter().enumerate() {
            cumulative += *p;
            if p_sample < cumulative && *p > AMPLITUDE_TOLERANCE {
                outcome = index;
                break;
            }
        }

        for (i, amp) in self.state.amplitudes_mut().iter_mut().enumerate() {
            if gather(i, &positions) != outcome {
                *amp = Complex::zero();
            }
        }
        self.renormalize();

        Ok(BitString::new((0..qubits.len()).map(|r| (outcome >> r) & 1 == 1).collect()))
    }

    fn position(&self, qubit: Qubit) -> Result<&usize> {
        self.positions.get(&qubit.id()).ok_or_else(|| QsearchError::InvalidOperand {
            qubit: qubit.id(),
            message: "qubit is not allocated in this substrate (released or foreign)".to_string(),
        })
    }

    fn positions_of(&self, qubits: &[Qubit]) -> Result<Vec<usize>> {
        qubits.iter().map(|q| self.position(*q).copied()).collect()
    }

    fn check_distinct(&self, qubits: &[Qubit]) -> Result<()> {
        let mut seen = HashSet::with_capacity(qubits.len());
        for qubit in qubits {
            if !seen.insert(*qubit) {
                return Err(QsearchError::InvalidOperand {
                    qubit: qubit.id(),
                    message: "qubit appears more than once in a single operation".to_string(),
                });
            }
        }
        Ok(())
    }

    fn control_mask(&self, controls: &[Control]) -> Result<(usize, usize)> {
        let mut mask = 0usize;
        let mut value = 0usize;
        for control in controls {
            let bit = 1usize << *self.position(control.qubit)?;
            mask |= bit;
            if control.on {
                value |= bit;
            }
        }
        Ok((mask, value))
    }

    fn probability_of_one(&self, position: usize) -> f64 {
        let bit = 1usize << position;
        self.state
            .amplitudes()
            .iter()
            .enumerate()
            .filter(|(i, _)| i & bit != 0)
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }

    /// Drops the bit at `position` from every basis index, keeping the
    /// half of the state where that bit is zero.
    fn remove_position(&mut self, position: usize) {
        let bit = 1usize << position;
        let lower_mask = bit - 1;
        let dim = self.state.dim();
        let amplitudes = self.state.amplitudes();
        let mut new_vec = vec![Complex::zero(); dim / 2];
        for (j, slot) in new_vec.iter_mut().enumerate() {
            let i = ((j & !lower_mask) << 1) | (j & lower_mask);
            *slot = amplitudes[i];
        }
        self.state = StateVector::new(new_vec);
    }

    fn renormalize(&mut self) {
        let norm = self.state.norm_sqr().sqrt();
        if norm > AMPLITUDE_TOLERANCE && (norm - 1.0).abs() > f64::EPSILON {
            for amp in self.state.amplitudes_mut() {
                *amp /= norm;
            }
        }
    }

    /// Applies a 2x2 matrix to the qubit at `target_pos` on every basis
    /// pair whose control bits match `ctrl_value` under `ctrl_mask`.
    fn apply_single_qubit_gate(
        &mut self,
        target_pos: usize,
        ctrl_mask: usize,
        ctrl_value: usize,
        matrix: &[[Complex<f64>; 2]; 2],
    ) {
        let target_mask = 1usize << target_pos;
        let amplitudes = self.state.amplitudes_mut();
        for i0 in 0..amplitudes.len() {
            if i0 & target_mask != 0 || i0 & ctrl_mask != ctrl_value {
                continue;
            }
            let i1 = i0 | target_mask;
            let psi_0 = amplitudes[i0];
            let psi_1 = amplitudes[i1];
            amplitudes[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
            amplitudes[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
        }
    }

    fn apply_modular_multiply_add(
        &mut self,
        multiplier: u64,
        modulus: u64,
        input_pos: &[usize],
        acc_pos: &[usize],
        ctrl_mask: usize,
        ctrl_value: usize,
    ) {
        let amplitudes = self.state.amplitudes();
        let mut new_vec = vec![Complex::zero(); amplitudes.len()];
        let a = (multiplier % modulus) as u128;
        for (i, amp) in amplitudes.iter().enumerate() {
            if amp.is_zero() {
                continue;
            }
            let mut j = i;
            if i & ctrl_mask == ctrl_value {
                let x = gather(i, input_pos) as u128;
                let y = gather(i, acc_pos) as u64;
                if y < modulus {
                    let y_new = ((y as u128 + a * x) % modulus as u128) as usize;
                    j = scatter(i, acc_pos, y_new);
                }
            }
            new_vec[j] = *amp;
        }
        self.state = StateVector::new(new_vec);
    }
}

/// Reads the bits of `index` at `positions` as a little-endian integer.
fn gather(index: usize, positions: &[usize]) -> usize {
    positions
        .iter()
        .enumerate()
        .fold(0, |acc, (r, p)| acc | (((index >> p) & 1) << r))
}

/// Overwrites the bits of `index` at `positions` with `value` (little-endian).
fn scatter(index: usize, positions: &[usize], value: usize) -> usize {
    positions.iter().enumerate().fold(index, |acc, (r, p)| {
        let bit = 1usize << p;
        if (value >> r) & 1 == 1 { acc | bit } else { acc & !bit }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Gate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::f64::consts::FRAC_1_SQRT_2;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_complex_vec_approx_equal(
        actual: &[Complex<f64>],
        expected: &[Complex<f64>],
        context: &str,
    ) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, actual[i], expected[i], context
            );
        }
    }

    #[test]
    fn test_allocate_grows_state() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let qubits = engine.allocate(3, 8)?;
        assert_eq!(qubits.len(), 3);
        assert_eq!(engine.state().dim(), 8);
        assert_eq!(engine.state().amplitudes()[0], Complex::new(1.0, 0.0));
        Ok(())
    }

    #[test]
    fn test_allocate_beyond_capacity_fails() {
        let mut engine = SimulationEngine::new();
        match engine.allocate(5, 4) {
            Err(QsearchError::Allocation { requested, capacity, .. }) => {
                assert_eq!(requested, 5);
                assert_eq!(capacity, 4);
            }
            other => panic!("Expected Allocation error, got {:?}", other.map(|q| q.len())),
        }
    }

    #[test]
    fn test_hadamard_then_cnot_makes_bell_pair() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(2, 8)?;
        engine.apply_operation(&Operation::gate(Gate::Hadamard, q[0]))?;
        engine.apply_operation(&Operation::cnot(q[0], q[1]))?;
        let s = Complex::new(FRAC_1_SQRT_2, 0.0);
        let expected = vec![s, Complex::zero(), Complex::zero(), s];
        assert_complex_vec_approx_equal(engine.state().amplitudes(), &expected, "Bell pair");
        Ok(())
    }

    #[test]
    fn test_control_on_zero() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(2, 8)?;
        let flip = Operation::controlled(Gate::PauliX, vec![Control::zero(q[0])], q[1]);
        engine.apply_operation(&flip)?;
        // |00> -> |10> in (q1 q0) order, basis index 2
        assert!((engine.state().amplitudes()[2].re - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_modular_multiply_add_is_permutation() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(8, 8)?;
        let (input, acc) = q.split_at(4);
        let mut state = vec![Complex::zero(); 256];
        // |x = 3>|y = 2>
        state[3 | (2 << 4)] = Complex::new(1.0, 0.0);
        engine.set_state(StateVector::new(state))?;
        let op = Operation::ModularMultiplyAdd {
            multiplier: 6,
            modulus: 11,
            input: input.to_vec(),
            accumulator: acc.to_vec(),
            controls: vec![],
        };
        engine.apply_operation(&op)?;
        // 2 + 6*3 = 20 = 9 mod 11
        assert!((engine.state().amplitudes()[3 | (9 << 4)].re - 1.0).abs() < TEST_TOLERANCE);
        engine.apply_operation(&op.adjoint())?;
        assert!((engine.state().amplitudes()[3 | (2 << 4)].re - 1.0).abs() < TEST_TOLERANCE);
        Ok(())
    }

    #[test]
    fn test_release_requires_reset() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(2, 8)?;
        engine.apply_operation(&Operation::gate(Gate::PauliX, q[1]))?;
        match engine.release(&q[1..]) {
            Err(QsearchError::UseAfterFree { qubit, .. }) => assert_eq!(qubit, q[1].id()),
            other => panic!("Expected UseAfterFree, got {:?}", other),
        }
        engine.apply_operation(&Operation::gate(Gate::PauliX, q[1]))?;
        engine.release(&q[1..])?;
        assert_eq!(engine.num_qubits(), 1);
        assert_eq!(engine.state().dim(), 2);
        Ok(())
    }

    #[test]
    fn test_release_middle_qubit_keeps_others() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(3, 8)?;
        engine.apply_operation(&Operation::gate(Gate::PauliX, q[2]))?;
        engine.release(&q[1..2])?;
        // q2 moved down to position 1
        let probs = engine.probabilities(&[q[0], q[2]])?;
        assert!((probs[0b10] - 1.0).abs() < TEST_TOLERANCE);
        match engine.apply_operation(&Operation::gate(Gate::PauliX, q[1])) {
            Err(QsearchError::InvalidOperand { qubit, .. }) => assert_eq!(qubit, q[1].id()),
            other => panic!("Expected InvalidOperand, got {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_measure_collapses() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(2, 8)?;
        engine.apply_operation(&Operation::gate(Gate::Hadamard, q[0]))?;
        engine.apply_operation(&Operation::cnot(q[0], q[1]))?;
        let mut rng = StdRng::seed_from_u64(7);
        let first = engine.measure(&q[..1], &mut rng)?;
        let second = engine.measure(&q[1..], &mut rng)?;
        assert_eq!(first.bits(), second.bits(), "Bell pair outcomes must agree");
        Ok(())
    }

    #[test]
    fn test_repeated_operand_rejected() -> Result<()> {
        let mut engine = SimulationEngine::new();
        let q = engine.allocate(1, 8)?;
        assert!(engine.apply_operation(&Operation::cnot(q[0], q[0])).is_err());
        Ok(())
    }
}
