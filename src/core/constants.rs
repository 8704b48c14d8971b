//! Numerical constants shared by the simulator and the search routines.

/// Tolerances and fixed problem constants.
pub mod qsearch_constants {
    /// Allowed deviation of the squared norm from 1.0.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Probabilities below this are treated as zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
    /// Largest residual |1> probability tolerated when releasing a qubit.
    pub const RELEASE_TOLERANCE: f64 = 1e-10;
    /// Default qubit capacity of the simulator (2^24 amplitudes).
    pub const DEFAULT_MAX_QUBITS: usize = 24;
    /// Used for rotation angles.
    pub const PI: f64 = std::f64::consts::PI;
}
