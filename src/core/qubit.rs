// src/core/qubit.rs

use std::fmt;
use std::ops::Deref;

/// Unique identifier of a qubit within one substrate instance.
/// Identifiers are never reused, so a stale handle to a released qubit
/// is always detected instead of aliasing a newer allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QubitId(pub u64);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Handle to a single two-level state element owned by a substrate.
///
/// A `Qubit` is only a name: the amplitudes live in the substrate that
/// allocated it, and every operation addresses the qubit through that
/// substrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qubit {
    id: QubitId,
}

impl Qubit {
    pub(crate) fn new(id_val: u64) -> Self {
        Self { id: QubitId(id_val) }
    }

    /// Gets the unique identifier of this qubit.
    pub fn id(&self) -> QubitId {
        self.id
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// An ordered, fixed-length sequence of qubits.
///
/// Position `0` is the least significant bit whenever the register is read
/// as an integer. A register is owned by the scope that allocated it and is
/// handed back to the substrate by value on release, so it cannot be used
/// afterwards.
#[derive(Debug, PartialEq, Eq)]
pub struct Register {
    qubits: Vec<Qubit>,
}

impl Register {
    pub(crate) fn new(qubits: Vec<Qubit>) -> Self {
        Self { qubits }
    }

    /// The qubits of this register in positional order.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Splits the register into consecutive chunks of `size` qubits.
    /// The final chunk is shorter if the length is not a multiple of `size`.
    pub fn chunks(&self, size: usize) -> impl Iterator<Item = &[Qubit]> {
        self.qubits.chunks(size.max(1))
    }

    pub(crate) fn into_qubits(self) -> Vec<Qubit> {
        self.qubits
    }
}

impl Deref for Register {
    type Target = [Qubit];

    fn deref(&self) -> &[Qubit] {
        &self.qubits
    }
}

impl AsRef<[Qubit]> for Register {
    fn as_ref(&self) -> &[Qubit] {
        &self.qubits
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Register[")?;
        for (i, q) in self.qubits.iter().enumerate() {
            write!(f, "{}{}", if i > 0 { ", " } else { "" }, q)?;
        }
        write!(f, "]")
    }
}
