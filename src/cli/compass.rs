//! Define compass subcommand
use super::{parse_geo_uri, write_output};
use crate::color::palette_color;
use crate::compass::{CompassEngine, SensorAccuracy, SensorKind, SensorSample, Target};
use crate::config::Config;
use crate::{Error, Location};
use log::{debug, info};
use std::path::PathBuf;
use std::str::FromStr;
use structopt::StructOpt;

/// upper bound on smoothing steps while waiting for the needles to settle
const MAX_SETTLE_STEPS: usize = 200;

/// Point a needle at each target from the current location and render the compass
#[derive(Debug, StructOpt)]
pub struct CompassOpts {
    /// current location as a geo URI
    #[structopt(long, parse(try_from_str = parse_geo_uri))]
    from: Location,
    /// geo URIs of the locations to point at, drawn in the configured palette colors
    #[structopt(name = "TARGET", required = true, parse(try_from_str = parse_geo_uri))]
    targets: Vec<Location>,
    /// direction the device is facing in degrees clockwise from north
    #[structopt(long, allow_hyphen_values = true, conflicts_with_all = &["gravity", "magnetic"])]
    heading: Option<f32>,
    /// accelerometer reading as x,y,z in m/s^2 (requires --magnetic)
    #[structopt(long, allow_hyphen_values = true, requires = "magnetic")]
    gravity: Option<SensorVector>,
    /// magnetic field reading as x,y,z in micro tesla (requires --gravity)
    #[structopt(long, allow_hyphen_values = true, requires = "gravity")]
    magnetic: Option<SensorVector>,
    /// name of file to output image data to, if "-" is used we will write to stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,
}

/// Three comma separated sensor axis values
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorVector([f32; 3]);

impl FromStr for SensorVector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| v.trim().parse::<f32>())
            .collect::<Result<Vec<f32>, _>>()
            .map_err(|e| Error::Other(format!("invalid sensor vector '{}': {}", s, e)))?;
        match values.as_slice() {
            [x, y, z] => Ok(SensorVector([*x, *y, *z])),
            _ => Err(Error::Other(format!(
                "invalid sensor vector '{}': expected 3 values",
                s
            ))),
        }
    }
}

pub fn compass_command(config: Config, opts: CompassOpts) -> Result<(), Box<dyn std::error::Error>> {
    let renderer = config.get_compass_rendering_handler()?;
    let targets = opts
        .targets
        .into_iter()
        .enumerate()
        .map(|(i, loc)| Target::new(loc, palette_color(config.palette(), i)))
        .collect();
    let mut engine = CompassEngine::new(targets);
    engine.set_current_location(&opts.from);

    let steps = match (opts.gravity, opts.magnetic) {
        (Some(gravity), Some(magnetic)) => {
            let accel =
                SensorSample::new(SensorKind::Accelerometer, SensorAccuracy::High, gravity.0);
            let field =
                SensorSample::new(SensorKind::MagneticField, SensorAccuracy::High, magnetic.0);
            // the same readings are replayed so the smoothing can catch up
            let update = |e: &mut CompassEngine| {
                let changed = e.on_sensor_sample(&accel);
                e.on_sensor_sample(&field) || changed
            };
            settle(update, &mut engine)
        }
        _ => {
            let heading = opts.heading.unwrap_or(0.0);
            settle(|e| e.apply_heading(heading), &mut engine)
        }
    };
    debug!("needles settled after {} updates", steps);

    match engine.heading() {
        Some(heading) => info!("facing {:.1} degrees", heading),
        None => {
            return Err(Box::new(Error::Other(
                "sensor readings are too weak to work out a heading".to_string(),
            )))
        }
    }
    for (i, tracked) in engine.targets().iter().enumerate() {
        info!(
            "target {} ({}) {} away, bearing {:.1}, needle at {:.1}",
            i + 1,
            tracked.target().color(),
            config.units().distance_string(tracked.distance() as f64),
            tracked.bearing(),
            tracked.rotation()
        );
    }

    let image_data = renderer.draw_compass(&engine, config.units())?;
    write_output(opts.output, &image_data)?;

    Ok(())
}

/// Repeat an update until the needles stop moving, returning the number of updates
fn settle<F>(mut update: F, engine: &mut CompassEngine) -> usize
where
    F: FnMut(&mut CompassEngine) -> bool,
{
    let mut steps = 0;
    while steps < MAX_SETTLE_STEPS && update(engine) {
        steps += 1;
    }
    steps
}
