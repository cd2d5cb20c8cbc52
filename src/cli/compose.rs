//! Define compose subcommand
use super::parse_geo_uri;
use crate::fix::{FixCollector, FixStatus};
use crate::message::{append_location, check_length, has_geo_uri};
use crate::{Error, Location, Provider};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use structopt::StructOpt;

/// Append the best of the supplied location fixes to a message
///
/// Fixes are replayed `--interval` seconds apart in the order GPS then network, the same way
/// they would arrive from a device that has both providers enabled. Fixes arriving after
/// `--timeout` are ignored. Text that already contains a geo URI is passed through unchanged.
#[derive(Debug, StructOpt)]
pub struct ComposeOpts {
    /// message text, the location is appended after a single space
    #[structopt(name = "TEXT", default_value = "")]
    text: String,
    /// a GPS fix given as a geo URI, can be used more than once
    #[structopt(long, number_of_values = 1, parse(try_from_str = parse_geo_uri))]
    gps: Vec<Location>,
    /// a network fix given as a geo URI, can be used more than once
    #[structopt(long, number_of_values = 1, parse(try_from_str = parse_geo_uri))]
    network: Vec<Location>,
    /// seconds to wait for a satisfactory fix
    #[structopt(long, default_value = "60")]
    timeout: u32,
    /// seconds between consecutive fixes
    #[structopt(long, default_value = "1")]
    interval: u32,
}

pub fn compose_command(opts: ComposeOpts) -> Result<(), Box<dyn std::error::Error>> {
    let message = if has_geo_uri(&opts.text) {
        info!("message already contains a location, sending it as is");
        opts.text
    } else {
        let location = collect_fix(
            opts.gps,
            opts.network,
            Duration::seconds(opts.timeout as i64),
            Duration::seconds(opts.interval as i64),
            Utc::now(),
        )?
        .ok_or_else(|| Error::Other("no location fix available".to_string()))?;
        info!("sharing {} fix {}", location.provider(), location);
        append_location(&opts.text, &location)
    };
    check_length(&message)?;

    println!("{}", message);
    Ok(())
}

/// Feed the fixes to a collector as if they arrived `interval` apart from `start`
///
/// Returns the collector's result, which is the best fix so far once the timeout passes.
fn collect_fix(
    gps: Vec<Location>,
    network: Vec<Location>,
    timeout: Duration,
    interval: Duration,
    start: DateTime<Utc>,
) -> Result<Option<Location>, Error> {
    let mut collector = FixCollector::start(!gps.is_empty(), !network.is_empty(), start, timeout)?;

    let fixes = gps
        .into_iter()
        .map(|loc| loc.with_provider(Provider::Gps))
        .chain(network.into_iter().map(|loc| loc.with_provider(Provider::Network)));
    let mut arrival = start;
    for fix in fixes {
        arrival = arrival + interval;
        if let FixStatus::Complete(best) = collector.poll(arrival) {
            return Ok(best);
        }
        let fix = fix.with_time(arrival);
        debug!("received {} fix {}", fix.provider(), fix);
        if let FixStatus::Complete(best) = collector.on_location(fix) {
            return Ok(best);
        }
    }

    // nothing else will arrive, the request ends at its deadline
    match collector.poll(start + timeout) {
        FixStatus::Complete(best) => Ok(best),
        FixStatus::Pending => Ok(collector.best().cloned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.ymd(2010, 8, 1).and_hms(12, 0, 0)
    }

    fn fix(lat: f64, accuracy: f32) -> Location {
        Location::new(lat, 144.9).unwrap().with_accuracy(accuracy)
    }

    fn opts(text: &str, gps: Vec<Location>) -> ComposeOpts {
        ComposeOpts {
            text: text.to_string(),
            gps,
            network: Vec::new(),
            timeout: 60,
            interval: 1,
        }
    }

    #[test]
    fn test_accurate_gps_fix_ends_collection() {
        let gps = vec![fix(-37.0, 80.0), fix(-37.1, 20.0), fix(-37.2, 5.0)];
        let best = collect_fix(gps, Vec::new(), Duration::seconds(60), Duration::seconds(1), start())
            .unwrap()
            .unwrap();
        assert_eq!(best.latitude(), -37.1);
        assert_eq!(best.provider(), Provider::Gps);
        assert_eq!(best.time(), Some(start() + Duration::seconds(2)));
    }

    #[test]
    fn test_best_fix_used_when_fixes_run_out() {
        let gps = vec![fix(-37.0, 300.0), fix(-37.1, 90.0), fix(-37.2, 120.0)];
        let network = vec![fix(-37.3, 900.0)];
        let best = collect_fix(gps, network, Duration::seconds(60), Duration::seconds(1), start())
            .unwrap()
            .unwrap();
        assert_eq!(best.latitude(), -37.1);
        assert_eq!(best.accuracy(), Some(90.0));
    }

    #[test]
    fn test_fixes_after_timeout_are_ignored() {
        let gps = vec![fix(-37.0, 80.0), fix(-37.1, 20.0)];
        let best = collect_fix(gps, Vec::new(), Duration::seconds(15), Duration::seconds(10), start())
            .unwrap()
            .unwrap();
        assert_eq!(best.latitude(), -37.0);

        // nothing arrives before the deadline
        let gps = vec![fix(-37.0, 10.0)];
        let best = collect_fix(gps, Vec::new(), Duration::seconds(5), Duration::seconds(10), start());
        assert_eq!(best.unwrap(), None);
    }

    #[test]
    fn test_no_providers() {
        match collect_fix(Vec::new(), Vec::new(), Duration::seconds(60), Duration::seconds(1), start()) {
            Err(Error::NoLocationProvider) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(compose_command(opts("where are you?", Vec::new())).is_err());
    }

    #[test]
    fn test_message_with_location_is_sent_as_is() {
        // no fixes are needed when the text already has a location
        assert!(compose_command(opts("meet at geo:1,2", Vec::new())).is_ok());
    }

    #[test]
    fn test_message_too_long() {
        let long = "a".repeat(150);
        assert!(compose_command(opts(&long, vec![fix(-37.0, 10.0)])).is_err());
        let shared = format!("{} geo:1,2", "a".repeat(160));
        assert!(compose_command(opts(&shared, Vec::new())).is_err());
        assert!(compose_command(opts("short", vec![fix(-37.0, 10.0)])).is_ok());
    }
}
