//! Error response model for the cutover control plane.
//!
//! Every operator-facing failure is rendered as an RFC 9457 Problem Details
//! document. The crate itself is framework-agnostic; enable the `axum`
//! feature to return a [`Problem`] directly from a handler.

pub mod problem;

pub use problem::{APPLICATION_PROBLEM_JSON, Problem, ProblemField};
