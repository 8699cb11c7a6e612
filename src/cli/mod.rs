//! Command Line Interface (CLI) layer for landsat-stac.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for the single-product, collection
//! and batch flows. It wires user-provided options to the underlying
//! library functionality exposed via `landsat_stac::api`.
//!
//! If you are embedding landsat-stac into another application, prefer using
//! the high-level `landsat_stac::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
