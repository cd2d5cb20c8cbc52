//! Define map subcommand
use super::{parse_geo_uri, write_output};
use crate::color::palette_color;
use crate::compass::Target;
use crate::config::Config;
use crate::Location;
use log::info;
use std::path::PathBuf;
use structopt::StructOpt;

/// Render markers for the targets, and the current location if known, in a fitted view
#[derive(Debug, StructOpt)]
pub struct MapOpts {
    /// current location as a geo URI
    #[structopt(long, parse(try_from_str = parse_geo_uri))]
    from: Option<Location>,
    /// geo URIs of the locations to show, drawn in the configured palette colors
    #[structopt(name = "TARGET", required = true, parse(try_from_str = parse_geo_uri))]
    targets: Vec<Location>,
    /// name of file to output image data to, if "-" is used we will write to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

pub fn map_command(config: Config, opts: MapOpts) -> Result<(), Box<dyn std::error::Error>> {
    let map_drawer = config.get_map_rendering_handler()?;
    let targets: Vec<Target> = opts
        .targets
        .into_iter()
        .enumerate()
        .map(|(i, loc)| Target::new(loc, palette_color(config.palette(), i)))
        .collect();
    info!("drawing map with {} target(s)", targets.len());

    let image_data = map_drawer.draw_map(opts.from.as_ref(), &targets)?;
    write_output(opts.output, &image_data)?;

    Ok(())
}
