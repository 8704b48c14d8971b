// tests/simulation_tests.rs

use qsearch::{
    CircuitBuilder, Control, Gate, Operation, QsearchError, Simulator, SimulatorConfig, Substrate,
    with_register,
};

use std::f64::consts::PI;

// Helper to check a distribution against expected probabilities
fn assert_probs(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "distribution length");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < 1e-9, "outcome {}: got {}, expected {} ({:?})", i, a, e, actual);
    }
}

#[test]
fn test_fresh_register_measures_zero() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(1);
    with_register(&mut sim, 4, |sim, reg| {
        let bits = sim.measure(reg)?;
        assert_eq!(bits.len(), 4);
        assert!(bits.is_all_zero());
        Ok(())
    })
}

#[test]
fn test_bell_pair_outcomes_agree() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(42);
    for _ in 0..20 {
        with_register(&mut sim, 2, |sim, reg| {
            sim.apply(&Operation::gate(Gate::Hadamard, reg[0]))?;
            sim.apply(&Operation::cnot(reg[0], reg[1]))?;
            assert_probs(&sim.probabilities(reg)?, &[0.5, 0.0, 0.0, 0.5]);
            let bits = sim.measure(reg)?;
            assert_eq!(bits.bits()[0], bits.bits()[1], "Bell pair outcomes must agree");
            Ok(())
        })?;
    }
    assert_eq!(sim.live_qubits(), 0);
    Ok(())
}

#[test]
fn test_controlled_on_zero() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(3);
    with_register(&mut sim, 2, |sim, reg| {
        // Control on |0> fires for the fresh register.
        sim.apply(&Operation::controlled(Gate::PauliX, vec![Control::zero(reg[0])], reg[1]))?;
        assert_probs(&sim.probabilities(reg)?, &[0.0, 0.0, 1.0, 0.0]);
        Ok(())
    })
}

#[test]
fn test_ry_rotation_probabilities() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(3);
    with_register(&mut sim, 1, |sim, reg| {
        sim.apply(&Operation::gate(Gate::Ry(PI / 3.0), reg[0]))?;
        let one = (PI / 6.0).sin().powi(2);
        assert_probs(&sim.probabilities(reg)?, &[1.0 - one, one]);
        Ok(())
    })
}

#[test]
fn test_circuit_then_adjoint_is_identity() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(8);
    with_register(&mut sim, 4, |sim, reg| {
        let circuit = CircuitBuilder::new()
            .each(Gate::Hadamard, &reg[..2])
            .add_op(Operation::gate(Gate::Ry(0.4), reg[2]))
            .add_op(Operation::gate(Gate::Phase(1.1), reg[0]))
            .add_op(Operation::controlled(
                Gate::PauliX,
                vec![Control::one(reg[0]), Control::zero(reg[2])],
                reg[3],
            ))
            .add_op(Operation::ModularMultiplyAdd {
                multiplier: 3,
                modulus: 3,
                input: reg[..2].to_vec(),
                accumulator: reg[2..].to_vec(),
                controls: Vec::new(),
            })
            .build();
        sim.apply_circuit(&circuit)?;
        sim.apply_circuit(&circuit.adjoint())?;
        assert!(sim.measure(reg)?.is_all_zero(), "adjoint must undo the circuit");
        Ok(())
    })
}

#[test]
fn test_modular_multiply_add() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(8);
    with_register(&mut sim, 8, |sim, reg| {
        let (x, acc) = reg.split_at(4);
        // x = 7, acc = 9; 9 + 6 * 7 = 51 = 4 * 11 + 7
        sim.apply_circuit(&CircuitBuilder::new().xor_constant(7, x).xor_constant(9, acc).build())?;
        sim.apply(&Operation::ModularMultiplyAdd {
            multiplier: 6,
            modulus: 11,
            input: x.to_vec(),
            accumulator: acc.to_vec(),
            controls: Vec::new(),
        })?;
        assert_eq!(sim.measure(x)?.to_u64(), 7);
        assert_eq!(sim.measure(acc)?.to_u64(), 7);
        Ok(())
    })
}

#[test]
fn test_capacity_exceeded() {
    let mut sim = Simulator::with_config(SimulatorConfig {
        seed: Some(1),
        max_qubits: 3,
        ..SimulatorConfig::default()
    });
    let result = with_register(&mut sim, 2, |sim, _| sim.allocate(2).map(|_| ()));
    assert!(matches!(result, Err(QsearchError::Allocation { requested: 2, live: 2, capacity: 3 })));
    assert_eq!(sim.live_qubits(), 0);
}

#[test]
fn test_released_qubit_is_invalid_operand() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(1);
    let reg = sim.allocate(1)?;
    let stale = reg[0];
    sim.release(reg)?;
    let result = sim.apply(&Operation::gate(Gate::Hadamard, stale));
    assert!(matches!(result, Err(QsearchError::InvalidOperand { .. })));
    Ok(())
}

#[test]
fn test_release_in_superposition_is_use_after_free() -> Result<(), QsearchError> {
    let mut sim = Simulator::seeded(1);
    let reg = sim.allocate(1)?;
    sim.apply(&Operation::gate(Gate::Hadamard, reg[0]))?;
    assert!(matches!(sim.release(reg), Err(QsearchError::UseAfterFree { .. })));
    Ok(())
}

#[test]
fn test_strict_mode_accepts_unitary_evolution() -> Result<(), QsearchError> {
    let mut sim = Simulator::with_config(SimulatorConfig {
        seed: Some(5),
        strict_normalization: true,
        ..SimulatorConfig::default()
    });
    with_register(&mut sim, 3, |sim, reg| {
        sim.apply_circuit(&CircuitBuilder::new().each(Gate::Hadamard, reg).build())?;
        sim.apply(&Operation::controlled(Gate::PauliZ, Control::all_ones(&reg[..2]), reg[2]))?;
        qsearch::validate_state(sim.state(), None)
    })
}
