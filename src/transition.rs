//! Explicit transition systems (Kripke structures).
//!
//! A [`TransitionSystem`] is a finite set of states, a transition relation over them,
//! and a labeling that assigns a set of atomic propositions to each state.
//! Successor and predecessor indices are derived once at construction and never change,
//! since the system exposes no mutation after it is built.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use log::debug;

use crate::state::{State, StateSet};

/// Where a dangling state reference was found during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Source or target of the transition `(source, target)`.
    Transition(State, State),
    /// Key of the labeling function.
    Label,
}

/// Error type for transition system construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionSystemError {
    /// A transition or label refers to a state that is not part of the system.
    UnknownState { state: State, context: Context },
}

impl fmt::Display for TransitionSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionSystemError::UnknownState {
                state,
                context: Context::Transition(source, target),
            } => write!(f, "Transition ({} -> {}) refers to unknown state {}", source, target, state),
            TransitionSystemError::UnknownState {
                state,
                context: Context::Label,
            } => write!(f, "Label assigned to unknown state {}", state),
        }
    }
}

impl std::error::Error for TransitionSystemError {}

/// A finite transition system (Kripke structure).
///
/// Invariant: `successors` and `predecessors` are exact inverses of each other and of
/// `transitions`, and every state has an entry (possibly empty) in both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSystem {
    states: StateSet,
    transitions: BTreeSet<(State, State)>,
    /// Atomic propositions per state. States without propositions have no entry.
    labels: BTreeMap<State, BTreeSet<String>>,
    successors: BTreeMap<State, StateSet>,
    predecessors: BTreeMap<State, StateSet>,
}

impl TransitionSystem {
    /// Create a transition system and build its adjacency indices.
    ///
    /// Fails if a transition or a label refers to a state outside `states`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::{BTreeMap, BTreeSet};
    /// use ctl_rs::state::{states, State};
    /// use ctl_rs::transition::TransitionSystem;
    ///
    /// let s = State::new;
    /// let ts = TransitionSystem::new(
    ///     states([0, 1]),
    ///     BTreeSet::from([(s(0), s(1)), (s(1), s(1))]),
    ///     BTreeMap::from([(s(1), BTreeSet::from(["done".to_string()]))]),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(ts.successors(s(0)), &states([1]));
    /// assert_eq!(ts.predecessors(s(1)), &states([0, 1]));
    /// ```
    pub fn new(
        states: StateSet,
        transitions: BTreeSet<(State, State)>,
        labels: BTreeMap<State, BTreeSet<String>>,
    ) -> Result<Self, TransitionSystemError> {
        for &(source, target) in transitions.iter() {
            for state in [source, target] {
                if !states.contains(&state) {
                    return Err(TransitionSystemError::UnknownState {
                        state,
                        context: Context::Transition(source, target),
                    });
                }
            }
        }
        if let Some(&state) = labels.keys().find(|&s| !states.contains(s)) {
            return Err(TransitionSystemError::UnknownState {
                state,
                context: Context::Label,
            });
        }

        let successors = Self::index(&states, transitions.iter().copied());
        let predecessors = Self::index(&states, transitions.iter().map(|&(source, target)| (target, source)));

        debug!(
            "TransitionSystem::new(states = {}, transitions = {}, labeled = {})",
            states.len(),
            transitions.len(),
            labels.len()
        );

        Ok(TransitionSystem {
            states,
            transitions,
            labels,
            successors,
            predecessors,
        })
    }

    /// Build an adjacency index with an (initially empty) entry for every state.
    fn index(states: &StateSet, edges: impl Iterator<Item = (State, State)>) -> BTreeMap<State, StateSet> {
        let mut index: BTreeMap<State, StateSet> = states.iter().map(|&s| (s, StateSet::new())).collect();
        for (from, to) in edges {
            // Both endpoints were validated, so the entry exists.
            if let Some(adjacent) = index.get_mut(&from) {
                adjacent.insert(to);
            }
        }
        index
    }

    /// Get all states (universe)
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// Get the transition relation
    pub fn transitions(&self) -> &BTreeSet<(State, State)> {
        &self.transitions
    }

    pub fn contains(&self, state: State) -> bool {
        self.states.contains(&state)
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Atomic propositions holding in `state`.
    ///
    /// Empty for unlabeled states and for states outside the system.
    pub fn labels(&self, state: State) -> &BTreeSet<String> {
        static EMPTY: BTreeSet<String> = BTreeSet::new();
        self.labels.get(&state).unwrap_or(&EMPTY)
    }

    /// States reachable in exactly one step from `state`.
    pub fn successors(&self, state: State) -> &StateSet {
        static EMPTY: StateSet = StateSet::new();
        self.successors.get(&state).unwrap_or(&EMPTY)
    }

    /// States that reach `state` in exactly one step.
    pub fn predecessors(&self, state: State) -> &StateSet {
        static EMPTY: StateSet = StateSet::new();
        self.predecessors.get(&state).unwrap_or(&EMPTY)
    }

    /// Get all atomic proposition names used by the labeling.
    pub fn propositions(&self) -> BTreeSet<&str> {
        self.labels.values().flatten().map(|p| p.as_str()).collect()
    }

    /// States labeled with the atomic proposition `prop`.
    pub fn satisfying(&self, prop: &str) -> StateSet {
        self.labels
            .iter()
            .filter(|(_, props)| props.contains(prop))
            .map(|(&s, _)| s)
            .collect()
    }

    /// States without outgoing transitions.
    pub fn deadlocks(&self) -> StateSet {
        self.successors
            .iter()
            .filter(|(_, succ)| succ.is_empty())
            .map(|(&s, _)| s)
            .collect()
    }

    /// Compute the successor states of `from`.
    ///
    /// Returns the set of states reachable in one step from `from`.
    pub fn image(&self, from: &StateSet) -> StateSet {
        from.iter().flat_map(|&s| self.successors(s).iter().copied()).collect()
    }

    /// Compute the predecessor states of `to`: `{ s | succ(s) ∩ to ≠ ∅ }`.
    ///
    /// Returns the set of states that can reach `to` in one step.
    pub fn preimage(&self, to: &StateSet) -> StateSet {
        to.iter().flat_map(|&s| self.predecessors(s).iter().copied()).collect()
    }

    /// Compute the universal predecessors of `to`: `{ s | succ(s) ⊆ to }`.
    ///
    /// States without successors are included vacuously.
    pub fn universal_preimage(&self, to: &StateSet) -> StateSet {
        self.successors
            .iter()
            .filter(|(_, succ)| succ.is_subset(to))
            .map(|(&s, _)| s)
            .collect()
    }

    /// Compute the states reachable from `from` (including `from` itself).
    pub fn reachable_from(&self, from: &StateSet) -> StateSet {
        let mut reached: StateSet = from.intersection(&self.states).copied().collect();
        loop {
            let new_states = self.image(&reached);
            if new_states.is_subset(&reached) {
                return reached;
            }
            reached.extend(new_states);
        }
    }
}

/// Incremental construction of a [`TransitionSystem`].
///
/// ```
/// use ctl_rs::state::State;
/// use ctl_rs::transition::TransitionSystemBuilder;
///
/// let ts = TransitionSystemBuilder::new()
///     .add_states([0, 1, 2])
///     .add_transition(0, 1)
///     .add_transition(1, 2)
///     .add_label(2, "goal")
///     .build()
///     .unwrap();
///
/// assert_eq!(ts.num_transitions(), 2);
/// assert!(ts.labels(State::new(2)).contains("goal"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransitionSystemBuilder {
    states: StateSet,
    transitions: BTreeSet<(State, State)>,
    labels: BTreeMap<State, BTreeSet<String>>,
}

impl TransitionSystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(mut self, state: u32) -> Self {
        self.states.insert(State::new(state));
        self
    }

    pub fn add_states(mut self, states: impl IntoIterator<Item = u32>) -> Self {
        self.states.extend(states.into_iter().map(State::new));
        self
    }

    /// Add a transition. Endpoints are not declared implicitly.
    pub fn add_transition(mut self, source: u32, target: u32) -> Self {
        self.transitions.insert((State::new(source), State::new(target)));
        self
    }

    /// Add an atomic proposition to the label of `state`.
    pub fn add_label(mut self, state: u32, prop: impl Into<String>) -> Self {
        self.labels.entry(State::new(state)).or_default().insert(prop.into());
        self
    }

    pub fn add_labels<P: Into<String>>(mut self, state: u32, props: impl IntoIterator<Item = P>) -> Self {
        self.labels
            .entry(State::new(state))
            .or_default()
            .extend(props.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<TransitionSystem, TransitionSystemError> {
        TransitionSystem::new(self.states, self.transitions, self.labels)
    }
}
