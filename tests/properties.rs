//! Algebraic properties of the labeling algorithms on random transition systems.

use proptest::prelude::*;

use ctl_rs::ctl::{CtlChecker, CtlFormula};
use ctl_rs::state::{State, StateSet};
use ctl_rs::transition::{TransitionSystem, TransitionSystemBuilder};

// ─── Strategies ────────────────────────────────────────────────────────────────

/// Random systems with up to 8 states over propositions `p` and `q`.
/// Deadlocks and self-loops are allowed.
fn arb_system() -> impl Strategy<Value = TransitionSystem> {
    (1u32..8)
        .prop_flat_map(|n| {
            (
                Just(n),
                prop::collection::vec((0..n, 0..n), 0..(3 * n as usize)),
                prop::collection::vec((any::<bool>(), any::<bool>()), n as usize),
            )
        })
        .prop_map(|(n, edges, labels)| {
            let mut builder = TransitionSystemBuilder::new().add_states(0..n);
            for (source, target) in edges {
                builder = builder.add_transition(source, target);
            }
            for (state, (p, q)) in labels.into_iter().enumerate() {
                if p {
                    builder = builder.add_label(state as u32, "p");
                }
                if q {
                    builder = builder.add_label(state as u32, "q");
                }
            }
            builder.build().unwrap()
        })
}

/// Random formulas; `r` never labels any state.
fn arb_formula() -> impl Strategy<Value = CtlFormula> {
    let leaf = prop_oneof![
        Just(CtlFormula::True),
        prop::sample::select(vec!["p", "q", "r"]).prop_map(|p| CtlFormula::atom(p)),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.and(b)),
            inner.clone().prop_map(CtlFormula::not),
            inner.clone().prop_map(CtlFormula::ex),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.eu(b)),
            inner.clone().prop_map(CtlFormula::eg),
            inner.clone().prop_map(CtlFormula::ef),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| a.au(b)),
            inner.prop_map(CtlFormula::af),
        ]
    })
}

// ─── Reference implementations ─────────────────────────────────────────────────

/// E[φ U ψ] by backward search from ψ through φ-states.
fn eu_by_search(ts: &TransitionSystem, sat_phi: &StateSet, sat_psi: &StateSet) -> StateSet {
    let mut result = sat_psi.clone();
    let mut stack: Vec<State> = sat_psi.iter().copied().collect();
    while let Some(s) = stack.pop() {
        for &pred in ts.predecessors(s) {
            if sat_phi.contains(&pred) && result.insert(pred) {
                stack.push(pred);
            }
        }
    }
    result
}

/// States reachable from `from` in one or more steps without leaving `within`.
fn reach_within(ts: &TransitionSystem, from: State, within: &StateSet) -> StateSet {
    let mut seen = StateSet::new();
    let mut stack = vec![from];
    while let Some(s) = stack.pop() {
        for &succ in ts.successors(s) {
            if within.contains(&succ) && seen.insert(succ) {
                stack.push(succ);
            }
        }
    }
    seen
}

/// EG φ: φ-states that reach, within φ, a state lying on a φ-cycle.
fn eg_by_cycles(ts: &TransitionSystem, sat_phi: &StateSet) -> StateSet {
    let on_cycle: StateSet = sat_phi
        .iter()
        .copied()
        .filter(|&s| reach_within(ts, s, sat_phi).contains(&s))
        .collect();
    sat_phi
        .iter()
        .copied()
        .filter(|&s| on_cycle.contains(&s) || !reach_within(ts, s, sat_phi).is_disjoint(&on_cycle))
        .collect()
}

// ─── Properties ────────────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn true_is_all_states(ts in arb_system()) {
        prop_assert_eq!(&CtlFormula::True.label(&ts), ts.states());
    }

    #[test]
    fn double_negation(ts in arb_system(), f in arb_formula()) {
        prop_assert_eq!(f.clone().not().not().label(&ts), f.label(&ts));
    }

    #[test]
    fn label_is_subset_of_states(ts in arb_system(), f in arb_formula()) {
        prop_assert!(f.label(&ts).is_subset(ts.states()));
    }

    #[test]
    fn derived_operators_match_definitions(ts in arb_system(), f in arb_formula()) {
        prop_assert_eq!(f.clone().ef().label(&ts), CtlFormula::True.eu(f.clone()).label(&ts));
        prop_assert_eq!(f.clone().af().label(&ts), CtlFormula::True.au(f.clone()).label(&ts));
        prop_assert_eq!(f.clone().ax().label(&ts), ts.universal_preimage(&f.label(&ts)));
        prop_assert_eq!(f.clone().ag().label(&ts), f.clone().not().ef().not().label(&ts));
    }

    #[test]
    fn au_matches_dual(ts in arb_system(), f1 in arb_formula(), f2 in arb_formula()) {
        // A[φ U ψ] ≡ ¬(E[¬ψ U (¬φ ∧ ¬ψ)] ∨ EG ¬ψ)
        let dual = f2.clone().not()
            .eu(f1.clone().not().and(f2.clone().not()))
            .or(f2.clone().not().eg())
            .not();
        prop_assert_eq!(f1.au(f2).label(&ts), dual.label(&ts));
    }

    #[test]
    fn eu_matches_search(ts in arb_system(), f1 in arb_formula(), f2 in arb_formula()) {
        let expected = eu_by_search(&ts, &f1.label(&ts), &f2.label(&ts));
        prop_assert_eq!(f1.eu(f2).label(&ts), expected);
    }

    #[test]
    fn eg_matches_cycles(ts in arb_system(), f in arb_formula()) {
        let expected = eg_by_cycles(&ts, &f.label(&ts));
        prop_assert_eq!(f.eg().label(&ts), expected);
    }

    #[test]
    fn eu_is_monotone(ts in arb_system(), f1 in arb_formula(), g in arb_formula(), f2 in arb_formula()) {
        // SAT(φ) ⊆ SAT(φ ∨ γ)
        let weaker = f1.clone().or(g);
        let sat = f1.eu(f2.clone()).label(&ts);
        let sat_weaker = weaker.eu(f2).label(&ts);
        prop_assert!(sat.is_subset(&sat_weaker));
    }

    #[test]
    fn steps_are_stable_at_fixpoint(ts in arb_system(), f1 in arb_formula(), f2 in arb_formula()) {
        let checker = CtlChecker::new(&ts);
        let sat1 = checker.check(&f1);
        let sat2 = checker.check(&f2);

        let eu = checker.check(&f1.clone().eu(f2.clone()));
        prop_assert_eq!(checker.eu_step(&sat1, &sat2, &eu), eu);

        let eg = checker.check(&f1.clone().eg());
        prop_assert_eq!(checker.eg_step(&eg), eg);

        let au = checker.check(&f1.au(f2));
        prop_assert_eq!(checker.au_step(&sat1, &sat2, &au), au);
    }

    #[test]
    fn deadlocks_never_satisfy_ex_or_eg(ts in arb_system(), f in arb_formula()) {
        let deadlocks = ts.deadlocks();
        prop_assert!(f.clone().ex().label(&ts).is_disjoint(&deadlocks));
        prop_assert!(f.eg().label(&ts).is_disjoint(&deadlocks));
    }

    #[test]
    fn unknown_atom_is_empty(ts in arb_system()) {
        prop_assert!(CtlFormula::atom("r").label(&ts).is_empty());
    }
}
