//Rust hates greek characters
#![allow(uncommon_codepoints)]
#![allow(confusable_idents)]

//! <h1 align="center" margin=0px>
//! splitcone
//! </h1>
//! <p align="center">
//! First-order operator splitting solver for convex cone programs.
//! </p>
//!
//! splitcone solves problems of the form
//!
//! ```text
//! minimize        cᵀx
//! subject to      Ax + s = b
//!                 s ∈ 𝒦
//! ```
//!
//! with decision variables `x ∈ ℝⁿ`, slacks `s ∈ ℝᵐ` and data
//! `A ∈ ℝᵐˣⁿ`, `b ∈ ℝᵐ`, `c ∈ ℝⁿ`.  The convex set `𝒦` is a product of
//! the supported cones: the zero cone (equality constraints), the
//! nonnegative orthant and second-order cones.
//!
//! The solver applies Douglas-Rachford splitting with over-relaxation to
//! the homogeneous self-dual embedding of the primal-dual pair, so a
//! single iteration either converges to an optimal primal-dual pair or
//! produces a certificate of primal or dual infeasibility.

pub mod algebra;
pub mod solver;
