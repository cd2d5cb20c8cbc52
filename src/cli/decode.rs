//! Define decode subcommand
use super::parse_geo_uri;
use crate::config::Config;
use crate::Location;
use structopt::StructOpt;

/// Show the location stored in a geo URI
#[derive(Debug, StructOpt)]
pub struct DecodeOpts {
    /// geo URI to decode, e.g. geo:-33.8688,151.2093;u=20
    #[structopt(name = "URI", parse(try_from_str = parse_geo_uri))]
    location: Location,
}

pub fn decode_command(config: Config, opts: DecodeOpts) -> Result<(), Box<dyn std::error::Error>> {
    let location = opts.location;
    println!("Latitude:  {:.6}", location.latitude());
    println!("Longitude: {:.6}", location.longitude());
    if let Some(altitude) = location.altitude() {
        println!("Altitude:  {:.1}m", altitude);
    }
    if let Some(accuracy) = location.accuracy() {
        println!(
            "Accuracy:  within {}",
            config.units().accuracy_string(accuracy as f64)
        );
    }

    Ok(())
}
