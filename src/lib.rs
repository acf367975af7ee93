//! # ctl-rs: Explicit-state CTL model checking in Rust
//!
//! **`ctl-rs`** computes, for a formula of Computation Tree Logic (CTL), the exact set of states
//! of a finite Kripke structure that satisfy it.
//!
//! ## What is CTL?
//!
//! CTL quantifies over the branching paths of a transition system.
//! Every temporal operator pairs a path quantifier (**E** = on some path, **A** = on all paths)
//! with a temporal modality (**X** = next, **F** = eventually, **G** = globally, **U** = until).
//! Satisfaction sets are computed bottom-up: boolean operators are set operations,
//! and temporal operators are least or greatest fixpoints over the transition relation.
//!
//! ## Key Features
//!
//! - **Immutable Kripke structures**: A [`TransitionSystem`][crate::transition::TransitionSystem] validates its input and builds
//!   successor/predecessor indices once, at construction.
//! - **Closed formula type**: [`CtlFormula`][crate::ctl::CtlFormula] is an enum over the core operators
//!   (`true`, atoms, `∧`, `¬`, `EX`, `EU`, `EG`, `EF`, `AU`, `AF`); derived operators such as `AX` and `AG`
//!   are provided as constructors that rewrite into it.
//! - **Fixpoint engine**: [`CtlChecker`][crate::ctl::CtlChecker] evaluates formulas with the classic labeling algorithms.
//! - **Graphviz I/O**: The [`dot`] module reads systems from DOT files and renders satisfaction sets.
//!
//! ## Basic Usage
//!
//! ```rust
//! use ctl_rs::ctl::CtlFormula;
//! use ctl_rs::state::states;
//! use ctl_rs::transition::TransitionSystemBuilder;
//!
//! // 1. Build the Kripke structure
//! let ts = TransitionSystemBuilder::new()
//!     .add_states([0, 1, 2])
//!     .add_transition(0, 1)
//!     .add_transition(1, 2)
//!     .add_transition(2, 1)
//!     .add_label(0, "a")
//!     .add_labels(1, ["b"])
//!     .add_labels(2, ["b"])
//!     .build()
//!     .unwrap();
//!
//! // 2. Build a formula: EG b
//! let f = CtlFormula::atom("b").eg();
//!
//! // 3. Compute its satisfaction set
//! assert_eq!(f.label(&ts), states([1, 2]));
//! ```
//!
//! ## Core Components
//!
//! - **[`transition`]**: The [`TransitionSystem`][crate::transition::TransitionSystem] and its builder.
//! - **[`ctl`]**: CTL formulas and the model checker.
//! - **[`dot`]**: Reading and writing DOT files.

pub mod ctl;
pub mod dot;
pub mod state;
pub mod transition;

pub use ctl::{CtlChecker, CtlFormula};
pub use state::{State, StateSet};
pub use transition::{TransitionSystem, TransitionSystemBuilder, TransitionSystemError};
