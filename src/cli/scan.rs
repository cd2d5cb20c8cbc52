//! Define scan subcommand
use super::parse_geo_uri;
use crate::config::Config;
use crate::message::{find_geo_uri, parse_message};
use crate::Location;
use log::{info, warn};
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use structopt::StructOpt;

/// Find the locations shared in a text message
#[derive(Debug, StructOpt)]
pub struct ScanOpts {
    /// file containing the message body, if "-" is used or omitted we read from stdin
    #[structopt(name = "FILE", parse(from_os_str))]
    file: Option<PathBuf>,
    /// only report the first location in the message
    #[structopt(long)]
    first: bool,
    /// report the distance and bearing to each location from this geo URI
    #[structopt(long, parse(try_from_str = parse_geo_uri))]
    from: Option<Location>,
}

pub fn scan_command(config: Config, opts: ScanOpts) -> Result<(), Box<dyn std::error::Error>> {
    let mut body = String::new();
    match &opts.file {
        Some(path) if path.to_string_lossy() != "-" => {
            File::open(path)?.read_to_string(&mut body)?;
        }
        _ => {
            io::stdin().read_to_string(&mut body)?;
        }
    }
    // a trailing newline isn't part of the message
    let body = body.trim_end_matches(|c| c == '\n' || c == '\r');

    if opts.first {
        match find_geo_uri(body) {
            Some(loc) => print_location(&config, opts.from.as_ref(), &loc),
            None => warn!("no location found in message"),
        }
        return Ok(());
    }

    let message = parse_message(body);
    info!(
        "found {} location(s) in {} part(s)",
        message.locations().count(),
        message.parts().len()
    );
    for part in message.parts() {
        if let Some(text) = part.text() {
            println!("{}", text);
        }
        if let Some(loc) = part.location() {
            print_location(&config, opts.from.as_ref(), loc);
        }
    }

    Ok(())
}

fn print_location(config: &Config, from: Option<&Location>, loc: &Location) {
    let units = config.units();
    let mut line = format!("  -> {}", loc);
    if let Some(accuracy) = loc.accuracy() {
        line.push_str(&format!(" within {}", units.accuracy_string(accuracy as f64)));
    }
    if let Some(from) = from {
        line.push_str(&format!(
            ", {} at {:.0} degrees",
            units.distance_string(from.distance_to(loc)),
            from.bearing_to(loc)
        ));
    }
    println!("{}", line);
}
