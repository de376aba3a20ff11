//! The exit search lands on the requested area ratio.

use pp_core::units::{atm, k};
use pp_equilibrium::{Equilibrium, EquilibriumState, ProblemType};
use pp_performance::{ExitCondition, Mode, NozzleStates, PerformanceEvaluator};
use pp_thermo::{Propellant, SpeciesDatabase};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn frozen_exit_reproduces_area_ratio(ae in 1.5_f64..40.0) {
        let db = SpeciesDatabase::standard();
        let mut p = Propellant::new();
        p.add_moles(db.find_propellant("H2").unwrap(), 2.0).unwrap();
        p.add_moles(db.find_propellant("O2").unwrap(), 1.0).unwrap();
        let mut chamber = EquilibriumState::with_conditions(p, k(3000.0), atm(68.0));
        Equilibrium::new(&db).solve(&mut chamber, ProblemType::Tp).unwrap();

        let mut states = NozzleStates::new(chamber);
        let sol = PerformanceEvaluator::new(&db)
            .evaluate(&mut states, Mode::Frozen, ExitCondition::SupersonicAreaRatio(ae))
            .unwrap();
        prop_assert!((sol.exit.area_ratio / ae - 1.0).abs() < 1e-2, "{} vs {}", sol.exit.area_ratio, ae);
        prop_assert!(sol.exit.mach > 1.0);
        prop_assert!(sol.exit.pressure < sol.throat.pressure);
    }
}
