// tests/lorenz63_test.rs
use approx::assert_abs_diff_eq;
use lorenz_chaos::analytics::PerturbationGrowth;
use lorenz_chaos::models::{Dynamics, Lorenz63, Lorenz63Params};
use lorenz_chaos::sim::ensemble::perturbed_ensemble;
use lorenz_chaos::sim::{integrate_ensemble, run_lorenz63, GridConfig, Lorenz63Config, TimeGrid};
use lorenz_chaos::solvers::Scheme;
use ndarray::{array, Array2};
use proptest::prelude::*;

#[test]
fn test_origin_derivative_is_exactly_zero() {
    for &(sigma, beta, rho) in &[(10.0, 8.0 / 3.0, 28.0), (50.0, 0.0, 0.0), (0.1, 7.5, 49.9)] {
        let model = Lorenz63::new(Lorenz63Params { sigma, beta, rho }).unwrap();
        let d = model.rhs(array![0.0, 0.0, 0.0].view(), 0.0);
        assert_eq!(d, array![0.0, 0.0, 0.0]);
    }
}

#[test]
fn test_small_step_matches_analytic_derivative() {
    let model = Lorenz63::default();
    let x0 = array![-6.1, 1.2, 32.5];
    let dt = 0.001;
    let expected = model.rhs(x0.view(), 0.0) * dt;

    let grid = TimeGrid::linspace(dt, 2).unwrap();
    let initial = x0.clone().insert_axis(ndarray::Axis(0));

    for scheme in [Scheme::Dopri5, Scheme::Dop853] {
        let cfg = GridConfig {
            scheme,
            max_step: dt,
            ..GridConfig::default()
        };
        let trajectory = integrate_ensemble(&model, initial.view(), &grid, &cfg).unwrap();
        let moved = &trajectory.state(0, 1) - &x0;
        for i in 0..3 {
            assert_abs_diff_eq!(moved[i], expected[i], epsilon = 1e-3);
        }
    }
}

#[test]
fn test_first_sample_is_initial_ensemble() {
    let cfg = Lorenz63Config {
        ensemble_size: 4,
        t_end: 1.0,
        ..Default::default()
    };
    let run = run_lorenz63(&cfg).unwrap();
    assert_eq!(run.trajectory.times()[0], 0.0);
    assert_eq!(run.trajectory.at_step(0), run.initial);
}

#[test]
fn test_zero_perturbation_members_coincide() {
    let cfg = Lorenz63Config {
        ensemble_size: 3,
        epsilon: 0.0,
        t_end: 3.0,
        ..Default::default()
    };
    let run = run_lorenz63(&cfg).unwrap();
    let first = run.trajectory.member(0);
    for n in 1..3 {
        assert_eq!(run.trajectory.member(n), first);
    }

    let growth = PerturbationGrowth::from_trajectory(&run.trajectory).unwrap();
    assert_eq!(growth.amplification(), None);
}

#[test]
fn test_repeated_runs_are_identical() {
    let cfg = Lorenz63Config {
        ensemble_size: 5,
        t_end: 4.0,
        ..Default::default()
    };
    let a = run_lorenz63(&cfg).unwrap();
    let b = run_lorenz63(&cfg).unwrap();
    assert_eq!(a.initial, b.initial);
    assert_eq!(a.trajectory.states(), b.trajectory.states());
}

#[test]
fn test_nearby_states_diverge() {
    let cfg = Lorenz63Config {
        ensemble_size: 5,
        epsilon: 0.01,
        t_end: 10.0,
        ..Default::default()
    };
    let run = run_lorenz63(&cfg).unwrap();
    let growth = PerturbationGrowth::from_trajectory(&run.trajectory).unwrap();

    let amplification = growth.amplification().unwrap();
    assert!(
        amplification > 10.0,
        "separation only grew by {}",
        amplification
    );
    let rate = growth.growth_rate(1.0).unwrap();
    assert!(rate > 0.0, "growth rate should be positive, got {}", rate);
}

#[test]
fn test_fixed_point_is_held_by_integrator() {
    let model = Lorenz63::default();
    let c_plus = model.fixed_points()[1];
    let initial = Array2::from_shape_vec((1, 3), c_plus.to_vec()).unwrap();
    let grid = TimeGrid::new(0.5, 10.0).unwrap();
    let trajectory =
        integrate_ensemble(&model, initial.view(), &grid, &GridConfig::default()).unwrap();

    for (a, b) in trajectory.final_states().iter().zip(c_plus.iter()) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-8);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_ensemble_generation_is_bit_reproducible(seed in any::<u64>(), members in 1usize..50) {
        let proto = array![-6.1, 1.2, 32.5];
        let a = perturbed_ensemble(proto.view(), 0.01, members, seed).unwrap();
        let b = perturbed_ensemble(proto.view(), 0.01, members, seed).unwrap();

        prop_assert_eq!(a.dim(), (members, 3));
        for (x, y) in a.iter().zip(b.iter()) {
            prop_assert_eq!(x.to_bits(), y.to_bits());
        }
    }
}
