// src/lib.rs

//! `qsearch` - Grover search demonstrations on a small state-vector simulator
//!
//! The crate builds oracles as reversible circuits, turns them into phase
//! flips by phase kickback, amplifies the marked states with Grover
//! iterations and verifies every measured candidate classically before
//! accepting it. Three demonstrations are included: graph coloring, recovery
//! of a missing ISBN-10 digit, and random numbers from measured
//! superpositions.

pub mod circuits;
pub mod config;
pub mod core;
pub mod grover;
pub mod operations;
pub mod oracles;
pub mod problems;
pub mod scope;
pub mod simulation;
pub mod validation;

// Re-export the most common types for easier top-level use
pub use circuits::{Circuit, CircuitBuilder};
pub use config::DemoConfig;
pub use crate::core::{BitString, QsearchError, Qubit, QubitId, Register, Result};
pub use grover::{GroverDriver, RetryController, SearchParameters, SearchProblem, VerifiedSolution};
pub use operations::{Control, Gate, Operation};
pub use oracles::{MarkingOracle, Oracle, OracleMode, PhaseKickback, PhaseOracle};
pub use problems::{GraphColoring, IsbnSearch, random_number};
pub use scope::{with_register, within};
pub use simulation::{Simulator, SimulatorConfig, Substrate};
pub use validation::{check_normalization, validate_state};

/// Crate version, as reported by the demo binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Example 1: Recovering a missing ISBN digit
// The missing digit sits in a 4-qubit register prepared over the ten
// decimal values; two Grover iterations make digit 4 the likely outcome and
// the controller verifies it classically.
/// ```
/// use qsearch::{IsbnSearch, RetryController, Simulator};
///
/// let search = IsbnSearch::new(&[0, 3, 0, 6, -1, 0, 6, 1, 5, 2])?;
/// let mut sim = Simulator::seeded(7);
/// let solution = RetryController::new(20)?.search(&mut sim, &search)?;
///
/// assert_eq!(solution.value, 4);
/// assert!(solution.accepted);
/// # Ok::<(), qsearch::QsearchError>(())
/// ```
#[doc(hidden)]
const _: () = ();

// Example 2: Checking a coloring with the marking oracle
/// ```
/// use qsearch::{GraphColoring, Simulator};
///
/// let graph = GraphColoring::new(3, vec![(0, 1), (1, 2)], 1)?;
/// let mut sim = Simulator::seeded(1);
///
/// // Colors 0, 1, 0 alternate along the path.
/// assert!(graph.check_coloring_with_oracle(&mut sim, &[false, true, false])?);
/// assert!(!graph.check_coloring_with_oracle(&mut sim, &[true, true, false])?);
/// # Ok::<(), qsearch::QsearchError>(())
/// ```
#[doc(hidden)]
const _: () = ();
