//! End-to-end scenarios and cross-backend properties.
use satkit::config::SolverConfig;
use satkit::verify::verify;
use satkit::{dp, dpll, resolution};
use satkit_formula::{CnfFormula, Lit};

fn lit(n: isize) -> Lit {
    Lit::from_dimacs(n)
}

fn solve_all(clauses: &[Vec<Lit>], var_count: usize) -> (bool, bool, bool, bool) {
    let dpll_sat = dpll::solve(clauses.to_vec(), var_count).is_some();
    let dp_sat = dp::solve(clauses.to_vec(), var_count).is_some();
    let res_sat = resolution::is_satisfiable(clauses.to_vec());
    let formula = CnfFormula::from(clauses.to_vec());
    let cdcl_sat = satkit::cdcl::solve(&formula, SolverConfig::default()).is_some();
    (dpll_sat, dp_sat, res_sat, cdcl_sat)
}

fn pigeonhole(pigeons: usize, holes: usize) -> Vec<Vec<Lit>> {
    let var = |pigeon: usize, hole: usize| -> Lit {
        // 1-based DIMACS variable numbering, row-major over (pigeon, hole).
        Lit::from_dimacs((pigeon * holes + hole + 1) as isize)
    };

    let mut clauses = Vec::new();
    for pigeon in 0..pigeons {
        clauses.push((0..holes).map(|hole| var(pigeon, hole)).collect());
    }
    for hole in 0..holes {
        for p1 in 0..pigeons {
            for p2 in (p1 + 1)..pigeons {
                clauses.push(vec![!var(p1, hole), !var(p2, hole)]);
            }
        }
    }
    clauses
}

#[test]
fn seed_1_sat_with_forced_polarity() {
    let clauses = vec![vec![lit(1), lit(2)], vec![lit(-1), lit(2)], vec![lit(1), lit(-2)]];
    let assignment = dpll::solve(clauses.clone(), 2).expect("expected SAT");
    assert!(assignment.contains(&lit(2)));
    assert!(assignment.contains(&lit(1)));
    assert!(verify(&clauses, &assignment));
}

#[test]
fn seed_2_unit_contradiction_is_unsat() {
    let clauses = vec![vec![lit(1)], vec![lit(-1)]];
    let (dpll_sat, dp_sat, res_sat, cdcl_sat) = solve_all(&clauses, 1);
    assert!(!dpll_sat && !dp_sat && !res_sat && !cdcl_sat);
}

#[test]
fn seed_3_unit_propagation_chain_is_sat() {
    let clauses = vec![vec![lit(1)], vec![lit(-1), lit(2)], vec![lit(-2), lit(3)]];
    let assignment = dpll::solve(clauses.clone(), 3).expect("expected SAT");
    assert!(assignment.contains(&lit(1)));
    assert!(assignment.contains(&lit(2)));
    assert!(assignment.contains(&lit(3)));
    assert!(verify(&clauses, &assignment));
}

#[test]
fn seed_4_propagation_forces_a_conflict() {
    let clauses = vec![vec![lit(1)], vec![lit(-1), lit(2)], vec![lit(-2)]];
    let (dpll_sat, dp_sat, res_sat, cdcl_sat) = solve_all(&clauses, 2);
    assert!(!dpll_sat && !dp_sat && !res_sat && !cdcl_sat);
}

#[test]
fn seed_6_pigeonhole_php_5_4_is_unsat() {
    let clauses = pigeonhole(5, 4);
    let var_count = 5 * 4;
    let (dpll_sat, dp_sat, res_sat, cdcl_sat) = solve_all(&clauses, var_count);
    assert!(!dpll_sat, "DPLL disagreed on PHP_5,4");
    assert!(!dp_sat, "DP disagreed on PHP_5,4");
    assert!(!res_sat, "resolution disagreed on PHP_5,4");
    assert!(!cdcl_sat, "CDCL disagreed on PHP_5,4");
}

/// Exhaustively checks every total assignment over a small variable count,
/// used to certify the brute-force oracle in the property tests below.
fn brute_force_satisfiable(clauses: &[Vec<Lit>], var_count: usize) -> bool {
    if var_count > 20 {
        panic!("brute force is only used for the var_count <= 12 property bound");
    }
    for assignment_bits in 0u32..(1 << var_count) {
        let satisfies_all = clauses.iter().all(|clause| {
            clause.iter().any(|&l| {
                let bit = (assignment_bits >> l.index()) & 1 == 1;
                bit == l.is_positive()
            })
        });
        if satisfies_all {
            return true;
        }
    }
    false
}

proptest::proptest! {
    #[test]
    fn soundness_of_sat_and_unsat_agree_with_brute_force(
        clauses in satkit_formula::cnf::strategy::vec_formula(1..10usize, 0..12, 1..4)
    ) {
        let var_count = clauses
            .iter()
            .flat_map(|clause| clause.iter().map(|l| l.index() + 1))
            .max()
            .unwrap_or(0);

        let dpll_sat = dpll::solve(clauses.clone(), var_count).is_some();
        let expected = brute_force_satisfiable(&clauses, var_count);
        proptest::prop_assert_eq!(dpll_sat, expected);
    }

    #[test]
    fn all_backends_agree_on_small_random_formulas(
        clauses in satkit_formula::cnf::strategy::vec_formula(1..8usize, 0..10, 1..4)
    ) {
        let var_count = clauses
            .iter()
            .flat_map(|clause| clause.iter().map(|l| l.index() + 1))
            .max()
            .unwrap_or(0);

        let (dpll_sat, dp_sat, res_sat, cdcl_sat) = solve_all(&clauses, var_count);
        proptest::prop_assert_eq!(dpll_sat, dp_sat);
        proptest::prop_assert_eq!(dpll_sat, res_sat);
        proptest::prop_assert_eq!(dpll_sat, cdcl_sat);
    }

    #[test]
    fn sat_assignments_always_verify(
        clauses in satkit_formula::cnf::strategy::vec_formula(1..8usize, 0..10, 1..4)
    ) {
        let var_count = clauses
            .iter()
            .flat_map(|clause| clause.iter().map(|l| l.index() + 1))
            .max()
            .unwrap_or(0);

        if let Some(assignment) = dpll::solve(clauses.clone(), var_count) {
            proptest::prop_assert!(verify(&clauses, &assignment));
        }
    }
}
