//! Error handling logic

use super::qubit::QubitId;
use thiserror::Error;

/// Convenient `Result` alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QsearchError>;

/// Error types raised by the substrate, the oracles and the search loop.
///
/// `Configuration` and `Allocation` are fatal and propagate immediately.
/// `VerificationFailure` is recovered locally by the retry controller.
/// `SearchExhausted` is surfaced to the caller instead of an unverified answer.
#[derive(Debug, Error)]
pub enum QsearchError {
    /// Register-size or solution-count mismatch, malformed problem input.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Configuration failure message
        message: String,
    },

    /// The substrate cannot provide the requested number of qubits.
    #[error("Allocation error: {requested} qubits requested, {live} live, capacity {capacity}")]
    Allocation {
        /// Number of qubits requested
        requested: usize,
        /// Number of qubits currently allocated
        live: usize,
        /// Maximum number of simultaneously live qubits
        capacity: usize,
    },

    /// An operation addressed a qubit that is not (or no longer) allocated,
    /// or addressed the same qubit twice.
    #[error("Invalid operand ({qubit}): {message}")]
    InvalidOperand {
        /// Offending qubit
        qubit: QubitId,
        /// InvalidOperand failure message
        message: String,
    },

    /// A qubit was released without first being returned to |0>.
    #[error("Use after free ({qubit}): released with residual |1> probability {residual:.3e}")]
    UseAfterFree {
        /// Offending qubit
        qubit: QubitId,
        /// Probability mass left on the |1> branch of the qubit
        residual: f64,
    },

    /// A measured candidate does not satisfy the classical predicate.
    #[error("Verification failure: candidate {candidate} rejected")]
    VerificationFailure {
        /// Measured candidate rendered for diagnostics
        candidate: String,
    },

    /// The retry controller reached its attempt cap without a verified answer.
    #[error("Search exhausted after {attempts} attempts without a verified solution")]
    SearchExhausted {
        /// Number of attempts made
        attempts: usize,
    },

    /// Internal inconsistency in the state vector (e.g. loss of normalization).
    #[error("Simulation error: {message}")]
    Simulation {
        /// Simulation failure message
        message: String,
    },

    /// A configuration file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        /// Path that was being read
        path: std::path::PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A configuration file could not be parsed.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl QsearchError {
    /// Builds a [`QsearchError::Configuration`] from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        QsearchError::Configuration { message: message.into() }
    }

    /// Builds a [`QsearchError::Simulation`] from any displayable message.
    pub fn simulation(message: impl Into<String>) -> Self {
        QsearchError::Simulation { message: message.into() }
    }

    /// Returns `true` for errors the retry controller may recover from.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QsearchError::VerificationFailure { .. })
    }
}
