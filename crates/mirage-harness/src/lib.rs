//! Deterministic simulation harness for Mirage.
//!
//! Provides a virtual-clock, seeded-RNG [`Environment`] implementation and a
//! recording presenter, so the same runtime that drives production frontends
//! can be exercised in tests without wall-clock waits: the clock moves only
//! through [`SimEnv::advance`], and a given seed plus tick schedule always
//! reproduces the same run.
//!
//! [`Environment`]: mirage_core::env::Environment

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod recording;
mod sim;
mod sim_env;

pub use recording::RecordingPresenter;
pub use sim::Sim;
pub use sim_env::{SimEnv, SimInstant};
