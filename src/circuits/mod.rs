// src/circuits/mod.rs

//! Ordered sequences of [`Operation`]s.
//!
//! A `Circuit` is the unit oracles and state preparations are described
//! in. Because a circuit is plain data it can be reversed ([`Circuit::adjoint`])
//! or conditioned on extra qubits ([`Circuit::controlled_by`]), which gives
//! every oracle its forward, inverse and controlled invocation modes from a
//! single description.

use crate::core::Qubit;
use crate::operations::{Control, Gate, Operation};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Represents an ordered sequence of operations applied to a set of qubits.
#[derive(Clone, PartialEq)]
pub struct Circuit {
    /// The unique set of qubits touched by any operation.
    qubits: HashSet<Qubit>,

    /// The ordered sequence of operations; order is significant.
    operations: Vec<Operation>,
}

impl Circuit {
    /// Creates a new, empty circuit.
    pub fn new() -> Self {
        Self {
            qubits: HashSet::new(),
            operations: Vec::new(),
        }
    }

    /// Adds a single operation to the end of the circuit's sequence,
    /// registering the qubits it touches.
    pub fn add_operation(&mut self, op: Operation) {
        for qubit in op.involved_qubits() {
            self.qubits.insert(qubit);
        }
        self.operations.push(op);
    }

    /// Adds multiple operations from an iterator to the end of the sequence.
    pub fn add_operations<I>(&mut self, ops: I)
    where
        I: IntoIterator<Item = Operation>,
    {
        for op in ops {
            self.add_operation(op);
        }
    }

    /// Appends every operation of `other`, in order.
    pub fn append(&mut self, other: &Circuit) {
        self.add_operations(other.operations.iter().cloned());
    }

    /// Returns a reference to the set of qubits involved in this circuit.
    pub fn qubits(&self) -> &HashSet<Qubit> {
        &self.qubits
    }

    /// Returns the ordered sequence of operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The inverse circuit: operations reversed, each replaced by its adjoint.
    pub fn adjoint(&self) -> Circuit {
        let mut inverse = Circuit::new();
        inverse.add_operations(self.operations.iter().rev().map(Operation::adjoint));
        inverse
    }

    /// The circuit conditioned on `controls`.
    ///
    /// Every operation receives the extra controls. For compute/uncompute
    /// pairs this is more than strictly needed but always correct.
    pub fn controlled_by(&self, controls: &[Control]) -> Circuit {
        let mut controlled = Circuit::new();
        controlled.add_operations(self.operations.iter().map(|op| op.with_controls(controls)));
        controlled
    }
}

/// `transform`, then `body`, then `transform.adjoint()` as one circuit.
///
/// This is the circuit form of a compute/apply/uncompute block: whatever
/// `transform` writes into scratch or input qubits is undone after `body`.
pub fn within_apply(transform: &Circuit, body: &Circuit) -> Circuit {
    let mut circuit = transform.clone();
    circuit.append(body);
    circuit.append(&transform.adjoint());
    circuit
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `Circuit` instances using method chaining.
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    pub fn new() -> Self {
        Self { circuit: Circuit::new() }
    }

    /// Adds a single operation to the circuit being built.
    pub fn add_op(mut self, op: Operation) -> Self {
        self.circuit.add_operation(op);
        self
    }

    /// Adds multiple operations from an iterator to the circuit being built.
    pub fn add_ops<I>(mut self, ops: I) -> Self
    where
        I: IntoIterator<Item = Operation>,
    {
        self.circuit.add_operations(ops);
        self
    }

    /// Appends a whole circuit.
    pub fn add_circuit(mut self, other: &Circuit) -> Self {
        self.circuit.append(other);
        self
    }

    /// Applies `gate` to each qubit in `targets`.
    pub fn each(self, gate: Gate, targets: &[Qubit]) -> Self {
        self.add_ops(targets.iter().map(|q| Operation::gate(gate, *q)))
    }

    /// Flips the qubits of `targets` whose bit in `value` is set (little-endian).
    /// Starting from |0...0>, this loads the classical integer `value`.
    pub fn xor_constant(self, value: u64, targets: &[Qubit]) -> Self {
        self.add_ops(
            targets
                .iter()
                .enumerate()
                .filter(|(i, _)| (value >> i) & 1 == 1)
                .map(|(_, q)| Operation::gate(Gate::PauliX, *q)),
        )
    }

    pub fn build(self) -> Circuit {
        self.circuit
    }
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operations.is_empty() {
            return writeln!(f, "qsearch::Circuit[0 operations on 0 qubits]");
        }

        let ops = &self.operations;
        let num_ops = ops.len();

        let mut sorted_qubits: Vec<Qubit> = self.qubits.iter().cloned().collect();
        sorted_qubits.sort();
        let num_qubits = sorted_qubits.len();
        let qubit_to_row: HashMap<Qubit, usize> =
            sorted_qubits.iter().enumerate().map(|(i, q)| (*q, i)).collect();

        let max_label_width =
            sorted_qubits.iter().map(|q| format!("{}", q).len()).max().unwrap_or(0);
        let label_padding = " ".repeat(max_label_width + 2);

        const GATE_WIDTH: usize = 7;
        const WIRE: &str = "───────";
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_ops]; num_qubits];
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_ops]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!(
                    "{}{}{}",
                    H_WIRE.to_string().repeat(pre_dashes),
                    symbol,
                    H_WIRE.to_string().repeat(post_dashes)
                )
            }
        }

        for (t, op) in ops.iter().enumerate() {
            let mut rows: Vec<usize> = Vec::new();
            match op {
                Operation::Single { gate, target, controls } => {
                    for control in controls {
                        if let Some(r) = qubit_to_row.get(&control.qubit) {
                            op_grid[*r][t] = format_gate(if control.on { "@" } else { "o" });
                            rows.push(*r);
                        }
                    }
                    if let Some(r) = qubit_to_row.get(target) {
                        op_grid[*r][t] = format_gate(gate.symbol());
                        rows.push(*r);
                    }
                }
                Operation::ModularMultiplyAdd { multiplier, controls, input, accumulator, .. } => {
                    for control in controls {
                        if let Some(r) = qubit_to_row.get(&control.qubit) {
                            op_grid[*r][t] = format_gate(if control.on { "@" } else { "o" });
                            rows.push(*r);
                        }
                    }
                    for q in input {
                        if let Some(r) = qubit_to_row.get(q) {
                            op_grid[*r][t] = format_gate("x");
                            rows.push(*r);
                        }
                    }
                    let label = format!("+{}x", multiplier);
                    for q in accumulator {
                        if let Some(r) = qubit_to_row.get(q) {
                            op_grid[*r][t] = format_gate(&label);
                            rows.push(*r);
                        }
                    }
                }
            }
            if let (Some(r_min), Some(r_max)) = (rows.iter().min(), rows.iter().max()) {
                for row_vec in v_connect.iter_mut().take(*r_max).skip(*r_min) {
                    row_vec[t] = V_WIRE;
                }
            }
        }

        writeln!(f, "qsearch::Circuit[{} operations on {} qubits]", num_ops, num_qubits)?;
        for r in 0..num_qubits {
            let label = format!("{}: ", sorted_qubits[r]);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_ops {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
