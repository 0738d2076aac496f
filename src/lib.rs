#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::return_self_not_must_use
)]

pub mod artifacts;
pub mod cli;
pub mod completion;
pub mod config;
pub mod context;
pub mod dataset;
pub mod error;
pub mod harness;
pub mod http;
pub mod ingest;
pub mod memory;
pub mod qa;
pub mod retrieval;

pub use config::BenchConfig;
pub use dataset::LocomoDataset;
pub use error::{BenchError, Result};
