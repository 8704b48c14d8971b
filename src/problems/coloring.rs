// src/problems/coloring.rs

//! Graph coloring: check a given coloring with the oracle, or search for one.

use crate::circuits::{Circuit, CircuitBuilder};
use crate::core::{BitString, QsearchError, Qubit, Result};
use crate::grover::{SearchParameters, SearchProblem, grover_iterations, uniform_preparation};
use crate::operations::Gate;
use crate::oracles::{
    MarkingOracle, OracleMode, PhaseKickback, PhaseOracle, VertexColoringOracle, apply_marking,
};
use crate::scope::with_register;
use crate::simulation::Substrate;
use tracing::debug;

/// Largest input register `count_valid_colorings` will enumerate.
const MAX_ENUMERATED_QUBITS: usize = 24;

/// A graph whose vertices get one of `2^bits_per_color` colors.
#[derive(Debug, Clone)]
pub struct GraphColoring {
    oracle: VertexColoringOracle,
    solutions: Option<u64>,
}

impl GraphColoring {
    pub fn new(
        vertex_count: usize,
        edges: Vec<(usize, usize)>,
        bits_per_color: usize,
    ) -> Result<Self> {
        Ok(Self {
            oracle: VertexColoringOracle::new(vertex_count, edges, bits_per_color)?,
            solutions: None,
        })
    }

    /// Uses a known number of valid colorings instead of counting them.
    pub fn with_solution_count(mut self, solutions: u64) -> Self {
        self.solutions = Some(solutions);
        self
    }

    pub fn oracle(&self) -> &VertexColoringOracle {
        &self.oracle
    }

    pub fn vertex_count(&self) -> usize {
        self.oracle.vertex_count()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        self.oracle.edges()
    }

    pub fn bits_per_color(&self) -> usize {
        self.oracle.bits_per_color()
    }

    /// `true` if `colors` has one color per vertex, every color fits in
    /// `bits_per_color` bits, and no edge joins two equal colors.
    pub fn is_valid_coloring(&self, colors: &[u64]) -> bool {
        let limit = 1u64 << self.bits_per_color().min(63);
        colors.len() == self.vertex_count()
            && colors.iter().all(|c| *c < limit)
            && self.edges().iter().all(|&(u, v)| colors[u] != colors[v])
    }

    /// Splits a bit-level coloring into per-vertex color values.
    pub fn decode_colors(&self, bits: &[bool]) -> Vec<u64> {
        bits.chunks(self.bits_per_color())
            .map(|chunk| {
                chunk.iter().enumerate().filter(|(_, b)| **b).fold(0, |acc, (i, _)| acc | (1 << i))
            })
            .collect()
    }

    /// Brute-force count of valid colorings. Exponential in the number of
    /// input qubits.
    pub fn count_valid_colorings(&self) -> Result<u64> {
        let width = self.oracle.input_len();
        if width > MAX_ENUMERATED_QUBITS {
            return Err(QsearchError::configuration(format!(
                "Refusing to enumerate 2^{} colorings",
                width
            )));
        }
        let bits = self.bits_per_color();
        let mask = (1u64 << bits) - 1;
        let count = (0..1u64 << width)
            .filter(|assignment| {
                let colors: Vec<u64> =
                    (0..self.vertex_count()).map(|v| (assignment >> (v * bits)) & mask).collect();
                self.is_valid_coloring(&colors)
            })
            .count();
        Ok(count as u64)
    }

    /// Loads a classical coloring into a register, runs the marking oracle
    /// and measures its target.
    ///
    /// Returns `true` when the oracle judged the coloring valid.
    pub fn check_coloring_with_oracle<S>(&self, sim: &mut S, coloring: &[bool]) -> Result<bool>
    where
        S: Substrate + ?Sized,
    {
        let width = self.oracle.input_len();
        if coloring.len() != width {
            return Err(QsearchError::configuration(format!(
                "Expected a coloring of {} bits, got {}",
                width,
                coloring.len()
            )));
        }
        with_register(sim, width + 1, |sim, register| {
            let (input, target) = register.split_at(width);
            sim.apply_circuit(&load_bits(coloring, input))?;
            apply_marking(sim, &self.oracle, OracleMode::Forward, input, target[0])?;
            let verdict = sim.measure(target)?.to_u64() == 1;
            debug!(coloring = ?self.decode_colors(coloring), verdict, "oracle checked coloring");
            Ok(verdict)
        })
    }
}

fn load_bits(bits: &[bool], register: &[Qubit]) -> Circuit {
    let set: Vec<Qubit> = bits.iter().zip(register).filter(|(b, _)| **b).map(|(_, q)| *q).collect();
    CircuitBuilder::new().each(Gate::PauliX, &set).build()
}

impl SearchProblem for GraphColoring {
    type Solution = Vec<u64>;

    fn register_len(&self) -> usize {
        self.oracle.input_len()
    }

    fn iterations(&self) -> Result<usize> {
        let solutions = match self.solutions {
            Some(count) => count,
            None => self.count_valid_colorings()?,
        };
        let params = SearchParameters::new(self.register_len(), solutions)?;
        Ok(grover_iterations(&params))
    }

    fn solution_count(&self) -> Option<u64> {
        self.solutions
    }

    fn preparation(&self, register: &[Qubit]) -> Result<Circuit> {
        Ok(uniform_preparation(register))
    }

    fn apply_oracle(&self, sim: &mut dyn Substrate, register: &[Qubit]) -> Result<()> {
        PhaseKickback::new(&self.oracle).apply_phase(sim, register)
    }

    fn decode(&self, bits: &BitString) -> Vec<u64> {
        bits.chunk_values(self.bits_per_color())
    }

    fn verify(&self, candidate: &Vec<u64>) -> bool {
        self.is_valid_coloring(candidate)
    }
}
