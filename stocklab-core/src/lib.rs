//! StockLab Core — replenishment decision engine and domain types.
//!
//! This crate contains the heart of the planner:
//! - Domain types (product snapshots, stock history, metrics, scores,
//!   actions, order recommendations)
//! - Sales velocity estimation from irregular stock snapshots
//! - Derived inventory-health metrics
//! - Four-factor weighted priority scoring with explainable reasons
//! - Fixed-order action classification
//! - Template-driven order quantity planning
//!
//! Everything is a pure function of its inputs; batching, parallelism, and
//! I/O live in `stocklab-runner`.

pub mod domain;
pub mod engine;
pub mod template;
