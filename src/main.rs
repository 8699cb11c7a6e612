//! landsat-stac CLI entrypoint.
//!
//! Provides a thin wrapper over the `cli` module: parse args, dispatch to
//! the item, collection or batch flow, and exit with appropriate status.
//! For programmatic use, prefer the library API (`landsat_stac::api`).

use clap::Parser;

mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::CliArgs::parse();
    cli::run(args)
}
