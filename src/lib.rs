//! goose-eval: run a trained GOOSE planning policy against a PDDL
//! domain/problem pair.
//!
//! The planner image is pulled on first use and cached. Each run packages the
//! model parameters with their options descriptor into a zip bundle and hands
//! it to the planner.

pub mod artifact;
pub mod cli;
pub mod core;
pub mod telemetry;
pub mod transport;
