//! Host-facing facade for the Hunyuan 3D generation plugin.
//!
//! The host runtime builds a [`NodeConfig`] from its widgets, hands it to
//! a [`Generator`], and drives [`Generator::generate`] (or
//! [`batch::run_batch`]) with a cancellation token and an event observer.
//! Everything the host needs crosses this boundary as plain data — no
//! host lifecycle assumptions live below it.

pub mod batch;
pub mod config;
pub mod error;
pub mod generate;

pub use batch::{run_batch, BatchOptions, BatchSummary};
pub use config::NodeConfig;
pub use error::NodeError;
pub use generate::{Generator, GenerationOutcome};
