//! State identifiers.
//!
//! A [`State`] is an opaque handle for one node of a Kripke structure.
//! The engine only relies on identity and equality; the ordering exists so that
//! satisfaction sets iterate deterministically.

use std::collections::BTreeSet;
use std::fmt;

/// A state of a transition system.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct State(u32);

impl State {
    pub const fn new(id: u32) -> Self {
        State(id)
    }

    /// Returns the raw identifier.
    pub const fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for State {
    fn from(id: u32) -> Self {
        State(id)
    }
}

impl From<State> for u32 {
    fn from(state: State) -> Self {
        state.0
    }
}

/// A set of states, e.g. the satisfaction set of a formula.
pub type StateSet = BTreeSet<State>;

/// Collects raw identifiers into a [`StateSet`].
///
/// ```
/// use ctl_rs::state::{states, State};
///
/// let set = states([2, 0, 1]);
/// assert_eq!(set.iter().next(), Some(&State::new(0)));
/// ```
pub fn states<I>(ids: I) -> StateSet
where
    I: IntoIterator<Item = u32>,
{
    ids.into_iter().map(State::new).collect()
}
