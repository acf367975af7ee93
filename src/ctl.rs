//! CTL (Computation Tree Logic) model checking.
//!
//! This module implements explicit-state labeling algorithms for CTL formulas.
//! CTL combines path quantifiers (A=all paths, E=exists path) with temporal operators
//! (X=next, F=future, G=globally, U=until).
//!
//! The formula type is closed over a minimal set of operators. Other common operators
//! (`false`, `∨`, `→`, `AX`, `AG`) are available as constructors that rewrite into it.

use std::fmt;

use log::{debug, trace};

use crate::state::{State, StateSet};
use crate::transition::TransitionSystem;

/// CTL formula abstract syntax tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CtlFormula {
    /// True
    True,
    /// Atomic proposition
    Atom(String),
    /// Conjunction
    And(Box<CtlFormula>, Box<CtlFormula>),
    /// Negation
    Not(Box<CtlFormula>),

    // CTL-specific operators (path quantifier + temporal operator)
    /// Exists Next: EX φ
    EX(Box<CtlFormula>),
    /// Exists Until: E[φ U ψ]
    EU(Box<CtlFormula>, Box<CtlFormula>),
    /// Exists Globally (Always): EG φ
    EG(Box<CtlFormula>),
    /// Exists Future (Eventually): EF φ ≡ E[true U φ]
    EF(Box<CtlFormula>),
    /// All Until: A[φ U ψ]
    AU(Box<CtlFormula>, Box<CtlFormula>),
    /// All Future (Eventually): AF φ ≡ A[true U φ]
    AF(Box<CtlFormula>),
}

impl CtlFormula {
    /// Constructors for convenience
    pub fn atom(s: impl Into<String>) -> Self {
        CtlFormula::Atom(s.into())
    }

    /// false ≡ ¬true
    pub fn falsity() -> Self {
        CtlFormula::True.not()
    }

    pub fn not(self) -> Self {
        CtlFormula::Not(Box::new(self))
    }

    pub fn and(self, other: Self) -> Self {
        CtlFormula::And(Box::new(self), Box::new(other))
    }

    /// φ ∨ ψ ≡ ¬(¬φ ∧ ¬ψ)
    pub fn or(self, other: Self) -> Self {
        self.not().and(other.not()).not()
    }

    /// φ → ψ ≡ ¬(φ ∧ ¬ψ)
    pub fn implies(self, other: Self) -> Self {
        self.and(other.not()).not()
    }

    pub fn ex(self) -> Self {
        CtlFormula::EX(Box::new(self))
    }

    /// AX φ ≡ ¬EX ¬φ
    pub fn ax(self) -> Self {
        self.not().ex().not()
    }

    pub fn ef(self) -> Self {
        CtlFormula::EF(Box::new(self))
    }

    pub fn af(self) -> Self {
        CtlFormula::AF(Box::new(self))
    }

    pub fn eg(self) -> Self {
        CtlFormula::EG(Box::new(self))
    }

    /// AG φ ≡ ¬EF ¬φ
    pub fn ag(self) -> Self {
        self.not().ef().not()
    }

    pub fn eu(self, other: Self) -> Self {
        CtlFormula::EU(Box::new(self), Box::new(other))
    }

    pub fn au(self, other: Self) -> Self {
        CtlFormula::AU(Box::new(self), Box::new(other))
    }

    /// Compute the set of states of `ts` satisfying this formula.
    ///
    /// # Examples
    ///
    /// ```
    /// use ctl_rs::ctl::CtlFormula;
    /// use ctl_rs::state::states;
    /// use ctl_rs::transition::TransitionSystemBuilder;
    ///
    /// let ts = TransitionSystemBuilder::new()
    ///     .add_states([0, 1, 2])
    ///     .add_transition(0, 1)
    ///     .add_transition(1, 2)
    ///     .add_transition(2, 1)
    ///     .add_label(0, "a")
    ///     .add_label(1, "b")
    ///     .add_label(2, "b")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(CtlFormula::atom("b").eg().label(&ts), states([1, 2]));
    /// assert_eq!(CtlFormula::atom("a").ef().label(&ts), states([0]));
    /// ```
    pub fn label(&self, ts: &TransitionSystem) -> StateSet {
        CtlChecker::new(ts).check(self)
    }

    /// Number of operator nodes in the formula tree.
    pub fn size(&self) -> usize {
        match self {
            CtlFormula::True | CtlFormula::Atom(_) => 1,
            CtlFormula::Not(phi) | CtlFormula::EX(phi) | CtlFormula::EG(phi) | CtlFormula::EF(phi) | CtlFormula::AF(phi) => {
                1 + phi.size()
            }
            CtlFormula::And(phi, psi) | CtlFormula::EU(phi, psi) | CtlFormula::AU(phi, psi) => 1 + phi.size() + psi.size(),
        }
    }
}

impl fmt::Display for CtlFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtlFormula::True => write!(f, "true"),
            CtlFormula::Atom(s) => write!(f, "{}", s),
            CtlFormula::And(phi, psi) => write!(f, "({} ∧ {})", phi, psi),
            CtlFormula::Not(phi) => write!(f, "¬{}", phi),
            CtlFormula::EX(phi) => write!(f, "EX {}", phi),
            CtlFormula::EU(phi, psi) => write!(f, "E[{} U {}]", phi, psi),
            CtlFormula::EG(phi) => write!(f, "EG {}", phi),
            CtlFormula::EF(phi) => write!(f, "EF {}", phi),
            CtlFormula::AU(phi, psi) => write!(f, "A[{} U {}]", phi, psi),
            CtlFormula::AF(phi) => write!(f, "AF {}", phi),
        }
    }
}

/// CTL model checker
///
/// Borrows the transition system; every query is a pure function of the formula and the system.
#[derive(Debug, Clone, Copy)]
pub struct CtlChecker<'a> {
    ts: &'a TransitionSystem,
}

impl<'a> CtlChecker<'a> {
    pub fn new(ts: &'a TransitionSystem) -> Self {
        CtlChecker { ts }
    }

    pub fn transition_system(&self) -> &'a TransitionSystem {
        self.ts
    }

    /// Compute the set of states satisfying a CTL formula.
    pub fn check(&self, formula: &CtlFormula) -> StateSet {
        match formula {
            CtlFormula::True => self.ts.states().clone(),
            CtlFormula::Atom(p) => {
                // Unknown propositions yield the empty set
                self.ts.satisfying(p)
            }
            CtlFormula::And(phi, psi) => {
                let sat_phi = self.check(phi);
                let sat_psi = self.check(psi);
                sat_phi.intersection(&sat_psi).copied().collect()
            }
            CtlFormula::Not(phi) => {
                let sat_phi = self.check(phi);
                self.complement(&sat_phi)
            }
            CtlFormula::EX(phi) => self.check_ex(phi),
            CtlFormula::EU(phi, psi) => self.check_eu(phi, psi),
            CtlFormula::EG(phi) => self.check_eg(phi),
            CtlFormula::EF(phi) => self.check_eu(&CtlFormula::True, phi),
            CtlFormula::AU(phi, psi) => self.check_au(phi, psi),
            CtlFormula::AF(phi) => self.check_au(&CtlFormula::True, phi),
        }
    }

    fn complement(&self, states: &StateSet) -> StateSet {
        self.ts.states().difference(states).copied().collect()
    }

    /// EX φ: States that have at least one successor satisfying φ
    ///
    /// SAT(EX φ) = preimage(SAT(φ))
    fn check_ex(&self, phi: &CtlFormula) -> StateSet {
        let sat_phi = self.check(phi);
        self.ts.preimage(&sat_phi)
    }

    /// E[φ U ψ]: States from which there exists a path where φ holds until ψ
    ///
    /// Least fixpoint: µZ. ψ ∨ (φ ∧ EX Z)
    fn check_eu(&self, phi: &CtlFormula, psi: &CtlFormula) -> StateSet {
        let sat_phi = self.check(phi);
        let sat_psi = self.check(psi);
        let mut z = sat_psi.clone();
        let mut iterations = 0;

        loop {
            iterations += 1;
            let new_z = self.eu_step(&sat_phi, &sat_psi, &z);
            trace!("EU iteration {}: |Z| = {} -> {}", iterations, z.len(), new_z.len());

            if new_z == z {
                debug!("E[{} U {}] converged after {} iterations, |SAT| = {}", phi, psi, iterations, z.len());
                return z;
            }
            z = new_z;
        }
    }

    /// One step of the EU fixpoint: `ψ ∪ (φ ∩ preimage(Z))`.
    pub fn eu_step(&self, sat_phi: &StateSet, sat_psi: &StateSet, z: &StateSet) -> StateSet {
        let ex_z = self.ts.preimage(z);
        let mut new_z: StateSet = sat_phi.intersection(&ex_z).copied().collect();
        new_z.extend(sat_psi.iter().copied());
        new_z
    }

    /// EG φ: States from which there exists a path where φ holds globally
    ///
    /// Greatest fixpoint: νZ. φ ∧ EX Z, computed by shrinking SAT(φ).
    fn check_eg(&self, phi: &CtlFormula) -> StateSet {
        let mut z = self.check(phi);
        let mut iterations = 0;

        loop {
            iterations += 1;
            let new_z = self.eg_step(&z);
            trace!("EG iteration {}: |Z| = {} -> {}", iterations, z.len(), new_z.len());

            if new_z == z {
                debug!("EG {} converged after {} iterations, |SAT| = {}", phi, iterations, z.len());
                return z;
            }
            z = new_z;
        }
    }

    /// One step of the EG fixpoint: keep the states of `Z` with a successor in `Z`.
    pub fn eg_step(&self, z: &StateSet) -> StateSet {
        z.iter()
            .copied()
            .filter(|&s| !self.ts.successors(s).is_disjoint(z))
            .collect()
    }

    /// A[φ U ψ]: States from which on all paths φ holds until ψ
    ///
    /// Least fixpoint: µZ. ψ ∨ (φ ∧ AX Z)
    ///
    /// Equal to ¬(E[¬ψ U (¬φ ∧ ¬ψ)] ∨ EG ¬ψ). States without successors satisfy AX Z
    /// vacuously, which keeps both characterizations in agreement.
    fn check_au(&self, phi: &CtlFormula, psi: &CtlFormula) -> StateSet {
        let sat_phi = self.check(phi);
        let sat_psi = self.check(psi);
        let mut z = sat_psi.clone();
        let mut iterations = 0;

        loop {
            iterations += 1;
            let new_z = self.au_step(&sat_phi, &sat_psi, &z);
            trace!("AU iteration {}: |Z| = {} -> {}", iterations, z.len(), new_z.len());

            if new_z == z {
                debug!("A[{} U {}] converged after {} iterations, |SAT| = {}", phi, psi, iterations, z.len());
                return z;
            }
            z = new_z;
        }
    }

    /// One step of the AU fixpoint: `ψ ∪ (φ ∩ universal_preimage(Z))`.
    pub fn au_step(&self, sat_phi: &StateSet, sat_psi: &StateSet, z: &StateSet) -> StateSet {
        let ax_z = self.ts.universal_preimage(z);
        let mut new_z: StateSet = sat_phi.intersection(&ax_z).copied().collect();
        new_z.extend(sat_psi.iter().copied());
        new_z
    }

    /// Check if a formula holds in the given state
    pub fn holds_at(&self, state: State, formula: &CtlFormula) -> bool {
        self.check(formula).contains(&state)
    }

    /// Check if a formula holds in every state of the system
    pub fn holds_everywhere(&self, formula: &CtlFormula) -> bool {
        self.check(formula).len() == self.ts.num_states()
    }

    /// Get states where formula is violated (formula is false)
    pub fn violations(&self, formula: &CtlFormula) -> StateSet {
        let sat = self.check(formula);
        self.complement(&sat)
    }
}
