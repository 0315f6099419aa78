//! # Intrinsic Math
//!
//! Numerical utilities for the Intrinsic valuation engine.
//!
//! This crate provides:
//!
//! - **Solvers**: Bracketing root-finding algorithms (Bisection, Brent)
//! - **Fades**: Linear glide paths between a starting and a target value
//!
//! ## Design Philosophy
//!
//! - **Guaranteed Termination**: Every iterative routine has an explicit iteration budget
//! - **Typed Failures**: A missing bracket or an unconverged root is an error, never a guess
//! - **Pure Functions**: No hidden state between calls

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod fade;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::fade::{linear_fade, LinearFade};
    pub use crate::solvers::{
        bisection, brent, BisectionSolver, BracketSolver, BrentSolver, SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
