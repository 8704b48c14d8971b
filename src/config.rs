//! Configuration for the demonstration programs.
//!
//! [`DemoConfig`] holds every input the demos use: the graph to color, the
//! ISBN with its missing digit, the random-number bounds, the retry policy
//! and the simulator settings. The defaults reproduce the stock demos. It
//! round-trips through JSON so a run can be driven from a file.
//!
//! # Example
//!
//! ```rust
//! use qsearch::config::DemoConfig;
//!
//! let cfg = DemoConfig::default();
//! cfg.validate().expect("default config is valid");
//!
//! assert_eq!(cfg.coloring.vertex_count, 5);
//! assert_eq!(cfg.isbn.digits.len(), 10);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{QsearchError, Result};
use crate::grover::{SearchParameters, SearchProblem};
use crate::oracles::isbn_check_constants;
use crate::problems::{GraphColoring, IsbnSearch};
use crate::simulation::SimulatorConfig;

/// Complete configuration of a demo run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub simulator: SimulatorConfig,
    pub search: SearchConfig,
    pub coloring: ColoringConfig,
    pub isbn: IsbnConfig,
    pub random: RandomConfig,
}

/// Retry policy shared by the search demos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Attempts before giving up with `SearchExhausted`. Default: **10**.
    pub max_attempts: usize,
    /// Replaces the analytic iteration count when set. Default: none.
    pub iteration_override: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { max_attempts: 10, iteration_override: None }
    }
}

/// The graph-coloring demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColoringConfig {
    /// Default: **5**.
    pub vertex_count: usize,
    /// Undirected edges as vertex index pairs.
    pub edges: Vec<(usize, usize)>,
    /// Qubits per vertex color. Default: **2** (four colors).
    pub bits_per_color: usize,
    /// Coloring checked by the oracle demo, `bits_per_color` bits per
    /// vertex, least significant bit first.
    pub example_coloring: Vec<bool>,
    /// Number of valid colorings. Counted by brute force when absent (72
    /// for the default graph). Default: none.
    pub solutions: Option<u64>,
}

impl Default for ColoringConfig {
    fn default() -> Self {
        Self {
            vertex_count: 5,
            edges: vec![(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4)],
            bits_per_color: 2,
            example_coloring: vec![
                false, false, true, false, false, true, true, true, true, false,
            ],
            solutions: None,
        }
    }
}

impl ColoringConfig {
    pub fn problem(&self) -> Result<GraphColoring> {
        let problem =
            GraphColoring::new(self.vertex_count, self.edges.clone(), self.bits_per_color)?;
        Ok(match self.solutions {
            Some(count) => problem.with_solution_count(count),
            None => problem,
        })
    }
}

/// The ISBN demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsbnConfig {
    /// Ten digits; the missing one is negative.
    pub digits: Vec<i32>,
}

impl Default for IsbnConfig {
    fn default() -> Self {
        Self { digits: vec![0, 3, 0, 6, -1, 0, 6, 1, 5, 2] }
    }
}

impl IsbnConfig {
    pub fn problem(&self) -> Result<IsbnSearch> {
        IsbnSearch::new(&self.digits)
    }
}

/// The random-number demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomConfig {
    /// Default: **0**.
    pub min: u64,
    /// Default: **50**.
    pub max: u64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self { min: 0, max: 50 }
    }
}

impl DemoConfig {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`QsearchError::ConfigRead`] if the file cannot be read,
    /// [`QsearchError::ConfigParse`] if it is not valid JSON for this type,
    /// and any error from [`DemoConfig::validate`].
    pub fn from_json(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| QsearchError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: DemoConfig = serde_json::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that every section describes a runnable demo.
    ///
    /// - `simulator.max_qubits` must be in `1..=30`.
    /// - `search.max_attempts` must be at least 1.
    /// - The graph must be well formed and `example_coloring` must have
    ///   `vertex_count * bits_per_color` entries.
    /// - `coloring.solutions`, when set, must be between 1 and the size of
    ///   the search space.
    /// - The ISBN digits must have exactly one missing entry.
    /// - `random.min <= random.max`.
    pub fn validate(&self) -> Result<()> {
        if self.simulator.max_qubits == 0 || self.simulator.max_qubits > 30 {
            return Err(QsearchError::configuration("simulator.max_qubits must be in 1..=30"));
        }
        if self.search.max_attempts == 0 {
            return Err(QsearchError::configuration("search.max_attempts must be > 0"));
        }

        let width = self.coloring.problem()?.register_len();
        if self.coloring.example_coloring.len() != width {
            return Err(QsearchError::configuration(format!(
                "coloring.example_coloring must have {} entries, got {}",
                width,
                self.coloring.example_coloring.len()
            )));
        }
        if let Some(solutions) = self.coloring.solutions {
            SearchParameters::new(width, solutions)?;
        }

        isbn_check_constants(&self.isbn.digits)?;

        if self.random.min > self.random.max {
            return Err(QsearchError::configuration("random.min must not exceed random.max"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grover::grover_iterations;

    #[test]
    fn default_config_is_valid() {
        assert!(DemoConfig::default().validate().is_ok());
    }

    #[test]
    fn json_round_trip() -> Result<()> {
        let cfg = DemoConfig::default();
        let json = cfg.to_json_string()?;
        let back: DemoConfig = serde_json::from_str(&json)?;
        assert_eq!(cfg, back);
        Ok(())
    }

    #[test]
    fn partial_json_uses_defaults() -> Result<()> {
        let cfg: DemoConfig = serde_json::from_str(
            r#"{ "random": { "max": 7 }, "search": { "max_attempts": 3 } }"#,
        )?;
        assert_eq!(cfg.random, RandomConfig { min: 0, max: 7 });
        assert_eq!(cfg.search.max_attempts, 3);
        assert_eq!(cfg.coloring, ColoringConfig::default());
        Ok(())
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let mut cfg = DemoConfig::default();
        cfg.search.max_attempts = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn short_example_coloring_is_invalid() {
        let mut cfg = DemoConfig::default();
        cfg.coloring.example_coloring.pop();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn custom_graph_counts_its_own_solutions() -> Result<()> {
        // Path 0-1-2 with four colors: 4 * 3 * 3 = 36 colorings of 64.
        let cfg: DemoConfig = serde_json::from_str(
            r#"{ "coloring": {
                "vertex_count": 3,
                "edges": [[0, 1], [1, 2]],
                "bits_per_color": 2,
                "example_coloring": [false, false, true, false, false, false]
            } }"#,
        )?;
        assert_eq!(cfg.coloring.solutions, None);
        cfg.validate()?;

        let problem = cfg.coloring.problem()?;
        assert_eq!(problem.count_valid_colorings()?, 36);
        let expected = grover_iterations(&SearchParameters::new(6, 36)?);
        assert_eq!(problem.iterations()?, expected);
        assert_eq!(expected, 1);
        Ok(())
    }

    #[test]
    fn default_graph_count_matches_brute_force() -> Result<()> {
        let problem = ColoringConfig::default().problem()?;
        assert_eq!(problem.count_valid_colorings()?, 72);
        assert_eq!(problem.iterations()?, 3);
        Ok(())
    }

    #[test]
    fn too_many_solutions_is_invalid() {
        let mut cfg = DemoConfig::default();
        cfg.coloring.solutions = Some(2048);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_random_range_is_invalid() {
        let mut cfg = DemoConfig::default();
        cfg.random = RandomConfig { min: 5, max: 1 };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DemoConfig::from_json(Path::new("/nonexistent/qsearch.json"));
        assert!(matches!(err, Err(QsearchError::ConfigRead { .. })));
    }
}
