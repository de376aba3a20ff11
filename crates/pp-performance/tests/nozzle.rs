//! Frozen and shifting expansion of a hydrogen/oxygen chamber.

use pp_core::units::{atm, k};
use pp_equilibrium::{Equilibrium, EquilibriumState, ProblemType};
use pp_performance::{ExitCondition, Mode, NozzleStates, PerformanceError, PerformanceEvaluator};
use pp_thermo::{Propellant, SpeciesDatabase};

fn tp_chamber(db: &SpeciesDatabase) -> EquilibriumState {
    let mut p = Propellant::new();
    p.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
    p.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
    let mut state = EquilibriumState::with_conditions(p, k(3000.0), atm(68.0));
    Equilibrium::new(db).solve(&mut state, ProblemType::Tp).unwrap();
    state
}

fn hp_chamber(db: &SpeciesDatabase) -> EquilibriumState {
    let mut p = Propellant::new();
    p.add_moles(db.find_propellant("H2(L)").unwrap(), 2.0).unwrap();
    p.add_moles(db.find_propellant("O2(L)").unwrap(), 1.0).unwrap();
    EquilibriumState::with_conditions(p, k(298.15), atm(68.0))
}

#[test]
fn frozen_supersonic_area_ratio_four() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let mut states = NozzleStates::new(tp_chamber(&db));
    let chamber_before = states.chamber.clone();

    let sol = eval
        .evaluate(&mut states, Mode::Frozen, ExitCondition::SupersonicAreaRatio(4.0))
        .unwrap();

    assert_eq!(states.chamber, chamber_before);
    assert!(sol.exit.isp.is_finite() && sol.exit.isp > 0.0);
    assert!(sol.exit.cf > 1.2 && sol.exit.cf < 2.0, "Cf = {}", sol.exit.cf);
    assert!((sol.exit.area_ratio - 4.0).abs() < 0.01, "Ae/At = {}", sol.exit.area_ratio);
    assert!(sol.exit.mach > 1.0);
    assert!(sol.exit.pressure < sol.throat.pressure && sol.throat.pressure < sol.chamber_pressure);
    assert!(sol.exit.ivac > sol.exit.isp);
    assert!((sol.throat.mach - 1.0).abs() < 1e-2);
    assert!((sol.throat.cstar - sol.exit.cstar).abs() < 1e-9);
    assert!(sol.exit.isp > sol.throat.isp);
}

#[test]
fn bad_area_ratio_leaves_states_untouched() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let mut states = NozzleStates::new(hp_chamber(&db));
    let before = states.clone();

    let err = eval
        .evaluate(&mut states, Mode::Frozen, ExitCondition::SupersonicAreaRatio(0.5))
        .unwrap_err();
    assert!(matches!(err, PerformanceError::BadAreaRatio { .. }));
    assert_eq!(states, before);

    let err = eval
        .evaluate(&mut states, Mode::Shifting, ExitCondition::Pressure(atm(90.0)))
        .unwrap_err();
    assert!(matches!(err, PerformanceError::BadExitPressure { .. }));
    assert_eq!(states, before);
}

#[test]
fn larger_area_ratio_expands_further() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let chamber = tp_chamber(&db);

    let mut last: Option<(f64, f64)> = None;
    for ae in [2.0, 4.0, 8.0, 16.0] {
        let mut states = NozzleStates::new(chamber.clone());
        let sol = eval
            .evaluate(&mut states, Mode::Frozen, ExitCondition::SupersonicAreaRatio(ae))
            .unwrap();
        if let Some((p, mach)) = last {
            assert!(sol.exit.pressure < p, "Ae/At {ae}: pressure did not fall");
            assert!(sol.exit.mach > mach, "Ae/At {ae}: mach did not rise");
        }
        last = Some((sol.exit.pressure, sol.exit.mach));
    }
}

#[test]
fn shifting_area_ratio_sweep() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let mut chamber = hp_chamber(&db);
    Equilibrium::new(&db).solve(&mut chamber, ProblemType::Hp).unwrap();

    let mut last: Option<(f64, f64)> = None;
    for ae in [1.5, 2.0, 4.0, 8.0, 16.0, 40.0] {
        let mut states = NozzleStates::new(chamber.clone());
        let sol = eval
            .evaluate(&mut states, Mode::Shifting, ExitCondition::SupersonicAreaRatio(ae))
            .unwrap();
        assert!((sol.exit.area_ratio / ae - 1.0).abs() < 1e-3, "Ae/At {ae}: got {}", sol.exit.area_ratio);
        assert!(sol.exit.mach > 1.0);
        assert!(states.exit.is_equilibrated());
        if let Some((p, mach)) = last {
            assert!(sol.exit.pressure < p, "Ae/At {ae}: pressure did not fall");
            assert!(sol.exit.mach > mach, "Ae/At {ae}: mach did not rise");
        }
        last = Some((sol.exit.pressure, sol.exit.mach));
    }
}

#[test]
fn shifting_beats_frozen_at_same_exit_pressure() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);

    let mut frozen_states = NozzleStates::new(hp_chamber(&db));
    let frozen = eval
        .evaluate(&mut frozen_states, Mode::Frozen, ExitCondition::Pressure(atm(1.0)))
        .unwrap();

    let mut shifting_states = NozzleStates::new(hp_chamber(&db));
    let shifting = eval
        .evaluate(&mut shifting_states, Mode::Shifting, ExitCondition::Pressure(atm(1.0)))
        .unwrap();

    assert!((frozen.exit.pressure - 1.0).abs() < 1e-12);
    assert!((shifting.exit.pressure - 1.0).abs() < 1e-12);
    // Recombination releases heat during the expansion.
    assert!(shifting.exit.isp > frozen.exit.isp);
    assert!(shifting.exit.temperature > frozen.exit.temperature);
    assert!(shifting_states.exit.is_equilibrated());
    assert!((shifting_states.exit.properties().entropy - shifting_states.chamber.properties().entropy).abs() < 5e-3);

    let isp_s = shifting.exit.isp_seconds();
    assert!(isp_s > 300.0 && isp_s < 450.0, "Isp = {isp_s} s");
}

#[test]
fn subsonic_area_ratio_stays_subsonic() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let mut states = NozzleStates::new(tp_chamber(&db));
    let sol = eval
        .evaluate(&mut states, Mode::Frozen, ExitCondition::SubsonicAreaRatio(2.0))
        .unwrap();
    assert!(sol.exit.mach < 1.0, "M = {}", sol.exit.mach);
    assert!(sol.exit.pressure > sol.throat.pressure);
}

#[test]
fn shifting_subsonic_area_ratio() {
    let db = SpeciesDatabase::standard();
    let eval = PerformanceEvaluator::new(&db);
    let mut states = NozzleStates::new(hp_chamber(&db));
    let sol = eval
        .evaluate(&mut states, Mode::Shifting, ExitCondition::SubsonicAreaRatio(2.0))
        .unwrap();
    assert!(sol.exit.mach < 1.0, "M = {}", sol.exit.mach);
    assert!(sol.exit.pressure > sol.throat.pressure && sol.exit.pressure < sol.chamber_pressure);
    assert!((sol.exit.area_ratio - 2.0).abs() < 1e-2, "Ae/At = {}", sol.exit.area_ratio);
    assert!(states.exit.is_equilibrated());
}
