//! Define encode subcommand
use crate::geo_uri;
use crate::message::{append_location, check_length};
use crate::Location;
use structopt::StructOpt;

/// Write a location as a geo URI, optionally appended to a message
#[derive(Debug, StructOpt)]
pub struct EncodeOpts {
    /// latitude in decimal degrees (-90 to 90)
    #[structopt(name = "LATITUDE", allow_hyphen_values = true)]
    latitude: f64,
    /// longitude in decimal degrees (-180 to 180)
    #[structopt(name = "LONGITUDE", allow_hyphen_values = true)]
    longitude: f64,
    /// altitude in meters
    #[structopt(short, long, allow_hyphen_values = true)]
    altitude: Option<f64>,
    /// radius of uncertainty in meters
    #[structopt(short = "u", long)]
    accuracy: Option<f32>,
    /// message text the URI gets appended to
    #[structopt(short, long)]
    message: Option<String>,
}

pub fn encode_command(opts: EncodeOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut location = Location::new(opts.latitude, opts.longitude)?;
    if let Some(altitude) = opts.altitude {
        location = location.with_altitude(altitude);
    }
    if let Some(accuracy) = opts.accuracy {
        location = location.with_accuracy(accuracy);
    }

    match opts.message {
        Some(text) => {
            let message = append_location(&text, &location);
            check_length(&message)?;
            println!("{}", message);
        }
        None => println!("{}", geo_uri::encode(&location)),
    }
    Ok(())
}
