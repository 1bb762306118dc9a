//! The moving parts of a rest cycle.
//!
//! The `RestScheduler` owns one `cycle::CycleLoop`, which starts at most one
//! `session::SessionLoop` at a time. Only the Session Loop writes `stats`.

pub mod cycle;
pub mod session;
pub mod stats;
