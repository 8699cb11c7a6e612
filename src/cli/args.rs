use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "landsat-stac",
    version,
    about = "Create STAC metadata for Landsat Collection 2 products"
)]
pub struct CliArgs {
    /// Enable logging (DEBUG level unless RUST_LOG is set)
    #[arg(long, global = true, default_value_t = false)]
    pub log: bool,

    /// JSON file with conversion parameters; flags below override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Conversion flags shared by every subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ConversionFlags {
    /// Prefer the geometry of the USGS STAC record (TM/ETM+/MSS only)
    #[arg(long, default_value_t = false)]
    pub usgs_geometry: bool,

    /// Fail on missing USGS records or unmapped USGS assets instead of skipping
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Do not attach raster:bands to band assets
    #[arg(long, default_value_t = false)]
    pub no_raster_bands: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an Item from an MTL (and ANG) file
    Item {
        /// Input `_MTL.xml` or `_MTL.txt` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory; the Item is written as `{id}.json`
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        flags: ConversionFlags,
    },
    /// Create an Item by reshaping the USGS STAC record(s) next to an MTL file
    UsgsItem {
        /// Input `_MTL.xml` or `_MTL.txt` file
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory; the Item is written as `{id}.json`
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        flags: ConversionFlags,
    },
    /// Create the Collection 2 Level-1 (MSS) Collection from a sample MSS product
    Collection {
        /// MTL file of an MSS product with its USGS `_stac.json`
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory; the Collection is written as `collection.json`
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        flags: ConversionFlags,
    },
    /// Convert every product in a directory
    Batch {
        /// Directory containing `_MTL.xml` / `_MTL.txt` files
        #[arg(long)]
        input_dir: PathBuf,

        /// Output directory for the Items
        #[arg(long)]
        output_dir: PathBuf,

        /// Reshape USGS STAC records instead of reading MTL/ANG files
        #[arg(long, default_value_t = false)]
        usgs: bool,

        /// Stop at the first failing product
        #[arg(long, default_value_t = false)]
        fail_fast: bool,

        #[command(flatten)]
        flags: ConversionFlags,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn batch_flags_parse() {
        let args = CliArgs::try_parse_from([
            "landsat-stac",
            "--log",
            "batch",
            "--input-dir",
            "in",
            "--output-dir",
            "out",
            "--usgs",
            "--strict",
        ])
        .unwrap();
        assert!(args.log);
        match args.command {
            Command::Batch {
                usgs,
                fail_fast,
                flags,
                ..
            } => {
                assert!(usgs);
                assert!(!fail_fast);
                assert!(flags.strict);
                assert!(!flags.usgs_geometry);
            }
            _ => panic!("expected batch"),
        }
    }
}
