//! ringwatch-core: synthetic transaction graphs with planted rings,
//! per-account signal aggregation and heuristic risk scoring.
//!
//! Pipeline:
//!   RandomSource → GraphGenerator → Dataset → signals::aggregate
//!     → RiskScorer::analyze → DeskView (handed to the renderer)
//!
//! `Desk` wires the stages into an interactive session.

pub mod config;
pub mod dataset;
pub mod desk;
pub mod error;
pub mod event;
pub mod generator;
pub mod rng;
pub mod scoring;
pub mod signals;
pub mod types;
pub mod view;
