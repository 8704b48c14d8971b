//! Example: Grover search over 2 qubits.
//! Builds the marking oracle for |11>, wraps it in phase kickback, runs one
//! Grover iteration and measures. One iteration over four states finds the
//! marked one with certainty.

use qsearch::grover::{GroverDriver, success_probability, uniform_preparation};
use qsearch::oracles::{MarkingOracle, Oracle, ValueOracle};
use qsearch::{Simulator, Substrate, with_register};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("--- qsearch Example: Grover's Search (2 qubits - Find |11>) ---");

    let marked = 0b11;
    let oracle = ValueOracle::new(marked, 2)?;
    let num_iterations = 1;

    let mut sim = Simulator::seeded(2024);
    let outcome = with_register(&mut sim, 2, |sim, register| {
        // Show what the marking circuit looks like on concrete qubits.
        let preview = with_register(sim, 1 + oracle.scratch_len(), |_, aux| {
            oracle.marking_circuit(register, aux[0], &aux[1..])
        })?;
        println!("\nMarking circuit:\n{}", preview);

        let preparation = uniform_preparation(register);
        println!("Preparation:\n{}", preparation);

        let mut driver = GroverDriver::new();
        driver.run(sim, register, &preparation, &Oracle::Marking(&oracle), num_iterations)?;

        let probs = sim.probabilities(register)?;
        println!("Outcome probabilities after {} iteration(s): {:?}", num_iterations, probs);
        sim.measure(register)
    })?;

    println!("\nAnalysis:");
    println!("- Target state for search was |11>");
    println!("- Expected success probability: {:.3}", success_probability(4, 1, num_iterations)?);
    println!("- Measured state was {}", outcome);

    assert_eq!(outcome.to_u64(), marked, "Expected to measure the marked state");
    println!("- Success! Measured state matches the marked state |11>.");

    Ok(())
}
