use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;

use landsat_stac::api::{
    convert_directory_to_path, convert_to_path, create_collection_to_path,
};
use landsat_stac::{ConversionParams, HrefReader, ItemSource};

use super::args::{CliArgs, Command, ConversionFlags};
use super::errors::AppError;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_params(
    config: Option<&Path>,
    flags: &ConversionFlags,
) -> Result<ConversionParams, AppError> {
    let mut params = match config {
        Some(path) => {
            ConversionParams::from_json_file(path).map_err(|source| AppError::Config {
                path: path.display().to_string(),
                source,
            })?
        }
        None => ConversionParams::default(),
    };
    params.use_usgs_geometry |= flags.usgs_geometry;
    params.strict |= flags.strict;
    if flags.no_raster_bands {
        params.raster_bands = false;
    }
    Ok(params)
}

fn mtl_href(input: &Path) -> Result<String, AppError> {
    let href = input.to_string_lossy().to_string();
    if !(href.ends_with("_MTL.xml") || href.ends_with("_MTL.txt")) {
        return Err(AppError::NotAnMtlFile { path: href });
    }
    if !input.is_file() {
        return Err(AppError::MissingInput { path: href });
    }
    Ok(href)
}

fn convert_single(
    input: &PathBuf,
    output: &PathBuf,
    source: ItemSource,
    params: &ConversionParams,
) -> Result<(), AppError> {
    let href = mtl_href(input)?;
    info!("Converting {} ({} source)", href, source);
    let written = convert_to_path(&href, output, source, params, &HrefReader::new())?;
    info!("Successfully converted: {:?} -> {:?}", input, written);
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        init_logging();
    }
    let config = args.config.as_deref();

    match args.command {
        Command::Item {
            input,
            output,
            flags,
        } => {
            let params = load_params(config, &flags)?;
            convert_single(&input, &output, ItemSource::Mtl, &params)?;
        }
        Command::UsgsItem {
            input,
            output,
            flags,
        } => {
            let params = load_params(config, &flags)?;
            convert_single(&input, &output, ItemSource::Usgs, &params)?;
        }
        Command::Collection {
            input,
            output,
            flags,
        } => {
            let params = load_params(config, &flags)?;
            let href = mtl_href(&input)?;
            let (collection, path) =
                create_collection_to_path(&href, &output, &params, &HrefReader::new())?;
            info!(
                "Wrote collection {} with {} item assets to {:?}",
                collection.id,
                collection.item_assets.len(),
                path
            );
        }
        Command::Batch {
            input_dir,
            output_dir,
            usgs,
            fail_fast,
            flags,
        } => {
            let params = load_params(config, &flags)?;
            if !input_dir.is_dir() {
                return Err(AppError::MissingInputDir {
                    path: input_dir.display().to_string(),
                }
                .into());
            }
            let source = if usgs {
                ItemSource::Usgs
            } else {
                ItemSource::Mtl
            };

            info!("Starting batch conversion from directory: {:?}", input_dir);
            info!("Output directory: {:?}", output_dir);

            let report = convert_directory_to_path(
                &input_dir,
                &output_dir,
                source,
                &params,
                &HrefReader::new(),
                !fail_fast,
            )?;

            info!("Batch conversion complete!");
            info!("Processed: {}", report.processed);
            info!("Skipped: {}", report.skipped);
            info!("Errors: {}", report.errors);
            if report.errors > 0 {
                return Err(AppError::BatchFailed {
                    errors: report.errors,
                }
                .into());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("params.json");
        std::fs::write(&config, r#"{ "strict": true }"#).unwrap();
        let flags = ConversionFlags {
            usgs_geometry: true,
            no_raster_bands: true,
            ..ConversionFlags::default()
        };

        let params = load_params(Some(&config), &flags).unwrap();
        assert!(params.strict);
        assert!(params.use_usgs_geometry);
        assert!(!params.raster_bands);
    }

    #[test]
    fn mtl_href_checks_name_before_existence() {
        assert!(matches!(
            mtl_href(Path::new("/nowhere/scene_ANG.txt")),
            Err(AppError::NotAnMtlFile { .. })
        ));
        assert!(matches!(
            mtl_href(Path::new("/nowhere/scene_MTL.xml")),
            Err(AppError::MissingInput { .. })
        ));
    }
}
