// src/oracles/coloring.rs

//! Graph-coloring validity as a marking oracle.

use super::equality::equality_circuit;
use super::{MarkingOracle, check_input_len, check_scratch_len};
use crate::circuits::{Circuit, CircuitBuilder, within_apply};
use crate::core::{QsearchError, Qubit, Result};
use crate::operations::{Control, Gate, Operation};

/// Marks vertex colorings in which no edge joins two equal colors.
///
/// The input register holds `vertex_count` chunks of `bits_per_color`
/// qubits; chunk `v` is the color of vertex `v`. Each edge gets a private
/// conflict qubit that is flipped when its endpoints share a color, and the
/// target is flipped when every conflict qubit is still zero. The conflict
/// qubits are uncomputed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexColoringOracle {
    vertex_count: usize,
    edges: Vec<(usize, usize)>,
    bits_per_color: usize,
}

impl VertexColoringOracle {
    pub fn new(
        vertex_count: usize,
        edges: Vec<(usize, usize)>,
        bits_per_color: usize,
    ) -> Result<Self> {
        if bits_per_color == 0 {
            return Err(QsearchError::configuration("Colors need at least one qubit"));
        }
        if bits_per_color >= 64 {
            return Err(QsearchError::configuration(format!(
                "{} qubits per color do not fit a 64-bit color value",
                bits_per_color
            )));
        }
        if vertex_count.checked_mul(bits_per_color).is_none() {
            return Err(QsearchError::configuration(format!(
                "{} vertices of {} qubits overflow the register width",
                vertex_count, bits_per_color
            )));
        }
        for &(u, v) in &edges {
            if u >= vertex_count || v >= vertex_count {
                return Err(QsearchError::configuration(format!(
                    "Edge ({}, {}) references a vertex outside 0..{}",
                    u, v, vertex_count
                )));
            }
            if u == v {
                return Err(QsearchError::configuration(format!(
                    "Edge ({}, {}) is a self-loop",
                    u, v
                )));
            }
        }
        Ok(Self { vertex_count, edges, bits_per_color })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    pub fn bits_per_color(&self) -> usize {
        self.bits_per_color
    }

    fn color<'q>(&self, input: &'q [Qubit], vertex: usize) -> &'q [Qubit] {
        &input[vertex * self.bits_per_color..(vertex + 1) * self.bits_per_color]
    }
}

impl MarkingOracle for VertexColoringOracle {
    // Overflow is rejected in `new`.
    fn input_len(&self) -> usize {
        self.vertex_count * self.bits_per_color
    }

    fn scratch_len(&self) -> usize {
        self.edges.len()
    }

    fn marking_circuit(
        &self,
        input: &[Qubit],
        target: Qubit,
        scratch: &[Qubit],
    ) -> Result<Circuit> {
        check_input_len(self.input_len(), input.len())?;
        check_scratch_len(self.scratch_len(), scratch.len())?;
        let conflicts = &scratch[..self.edges.len()];

        let mut mark_conflicts = CircuitBuilder::new();
        for (&(u, v), &conflict) in self.edges.iter().zip(conflicts) {
            mark_conflicts = mark_conflicts.add_circuit(&equality_circuit(
                self.color(input, u),
                self.color(input, v),
                conflict,
            )?);
        }
        let flip = CircuitBuilder::new()
            .add_op(Operation::controlled(Gate::PauliX, Control::all_zeros(conflicts), target))
            .build();
        Ok(within_apply(&mark_conflicts.build(), &flip))
    }
}
