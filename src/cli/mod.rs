//! Define the application's command line interface
use crate::config::Config;
use crate::geo_uri;
use crate::units::DistanceUnits;
use crate::{Error, Location};
use simplelog::LevelFilter;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use structopt::StructOpt;

mod compass;
use compass::{compass_command, CompassOpts};
mod compose;
use compose::{compose_command, ComposeOpts};
mod decode;
use decode::{decode_command, DecodeOpts};
mod encode;
use encode::{encode_command, EncodeOpts};
mod map;
use map::{map_command, MapOpts};
mod scan;
use scan::{scan_command, ScanOpts};

/// Share locations as geo URIs and find your way to the locations others share
#[derive(Debug, StructOpt)]
#[structopt(name = "geoshare")]
pub struct Cli {
    /// Set logging level to debug, use a second time (e.g. -vv) to set logging to trace
    #[structopt(short, long, parse(from_occurrences))]
    verbose: i32,
    /// Suppress info logging messages use a second time (e.g. -qq) to hide warnings
    #[structopt(short, long, parse(from_occurrences))]
    quiet: i32,
    /// Display distances in "metric" or "imperial" units, overrides the config file
    #[structopt(long)]
    units: Option<DistanceUnits>,
    #[structopt(subcommand)]
    cmd: Command,
}

impl Cli {
    /// Return the verbose flag counts as a log level filter
    pub fn verbosity(&self, default: LevelFilter) -> LevelFilter {
        if self.quiet == 1 {
            LevelFilter::Warn
        } else if self.quiet > 1 {
            LevelFilter::Error
        } else if self.verbose == 1 {
            LevelFilter::Debug
        } else if self.verbose > 1 {
            LevelFilter::Trace
        } else {
            default
        }
    }

    pub fn units(&self) -> Option<DistanceUnits> {
        self.units
    }

    /// Consume options struct and return the result of subcommand execution
    pub fn execute_subcommand(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        self.cmd.execute(config)
    }
}

#[derive(Debug, StructOpt)]
pub enum Command {
    /// Point compass needles at one or more locations and render them as an image
    #[structopt(name = "compass")]
    Compass(CompassOpts),
    /// Append the best available location fix to a message
    #[structopt(name = "compose")]
    Compose(ComposeOpts),
    /// Show the location stored in a geo URI
    #[structopt(name = "decode")]
    Decode(DecodeOpts),
    /// Write a location as a geo URI
    #[structopt(name = "encode")]
    Encode(EncodeOpts),
    /// Render the current location and targets as map markers
    #[structopt(name = "map")]
    Map(MapOpts),
    /// Find the locations shared in a message
    #[structopt(name = "scan")]
    Scan(ScanOpts),
}

impl Command {
    /// Consume enum variant and return the result of the command's execution
    fn execute(self, config: Config) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Command::Compass(opts) => compass_command(config, opts),
            Command::Compose(opts) => compose_command(opts),
            Command::Decode(opts) => decode_command(config, opts),
            Command::Encode(opts) => encode_command(opts),
            Command::Map(opts) => map_command(config, opts),
            Command::Scan(opts) => scan_command(config, opts),
        }
    }
}

fn parse_geo_uri(src: &str) -> Result<Location, Error> {
    geo_uri::decode(src).ok_or_else(|| Error::InvalidGeoUri(src.to_string()))
}

/// Write image data to the named file, "-" or no file at all writes to stdout
fn write_output(output: Option<PathBuf>, data: &[u8]) -> io::Result<()> {
    match output {
        Some(path) if path.to_string_lossy() != "-" => {
            let mut fp = File::create(path)?;
            fp.write_all(data)
        }
        _ => write_to_stdout(data),
    }
}

fn write_to_stdout(data: &[u8]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::from_iter_safe(args).unwrap()
    }

    #[test]
    fn test_verbosity() {
        let cli = parse(&["geoshare", "decode", "geo:1,2"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Info);
        let cli = parse(&["geoshare", "-vv", "decode", "geo:1,2"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Trace);
        let cli = parse(&["geoshare", "-q", "-v", "decode", "geo:1,2"]);
        assert_eq!(cli.verbosity(LevelFilter::Info), LevelFilter::Warn);
    }

    #[test]
    fn test_units_override() {
        let cli = parse(&["geoshare", "--units", "imperial", "decode", "geo:1,2"]);
        assert_eq!(cli.units(), Some(DistanceUnits::Imperial));
        assert!(Cli::from_iter_safe(&["geoshare", "--units", "cubits", "decode", "geo:1,2"]).is_err());
    }

    #[test]
    fn test_geo_uri_arguments() {
        assert!(parse_geo_uri("geo:-33.8688,151.2093").is_ok());
        match parse_geo_uri("geo:north") {
            Err(Error::InvalidGeoUri(uri)) => assert_eq!(uri, "geo:north"),
            other => panic!("unexpected result {:?}", other),
        }
        assert!(Cli::from_iter_safe(&["geoshare", "map", "geo:1,2", "geo:x"]).is_err());
    }
}
