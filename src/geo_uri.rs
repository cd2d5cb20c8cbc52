//! Encode and decode locations as RFC 5870 geo URIs
//!
//! Only the subset used in text messages is supported:
//! `geo:<lat>,<lon>[,<alt>][;u=<accuracy>]`. Other URI parameters are accepted and ignored.
use crate::gps::{Location, Provider};
use log::trace;
use std::str::FromStr;

static SCHEME: &str = "geo:";
/// decimal places written for latitude and longitude
const COORDINATE_PLACES: u32 = 6;
/// decimal places written for altitude and accuracy
const METRE_PLACES: u32 = 3;

/// Return the location encoded as a geo URI
pub fn encode(location: &Location) -> String {
    let mut uri = format!(
        "{}{},{}",
        SCHEME,
        format_fixed(location.latitude(), COORDINATE_PLACES),
        format_fixed(location.longitude(), COORDINATE_PLACES)
    );
    if let Some(altitude) = location.altitude() {
        uri.push(',');
        uri.push_str(&format_fixed(altitude, METRE_PLACES));
    }
    if let Some(accuracy) = location.accuracy() {
        uri.push_str(";u=");
        uri.push_str(&format_fixed(accuracy as f64, METRE_PLACES));
    }
    uri
}

/// Format a real number with at most `places` decimal places
///
/// The magnitude is scaled to an integer and rounded half up, trailing zeros of the fraction
/// are removed along with the decimal point when nothing is left after it.
pub fn format_fixed(value: f64, places: u32) -> String {
    let scaled = (value.abs() * 10f64.powi(places as i32)).round() as u64;
    if scaled == 0 {
        return "0".to_string();
    }

    let digits = format!("{:0width$}", scaled, width = places as usize + 1);
    let (integer, fraction) = digits.split_at(digits.len() - places as usize);
    let fraction = fraction.trim_end_matches('0');

    let mut output = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        output.push('-');
    }
    output.push_str(integer);
    if !fraction.is_empty() {
        output.push('.');
        output.push_str(fraction);
    }
    output
}

/// Parse a geo URI, returning None if it is not a valid location
pub fn decode(text: &str) -> Option<Location> {
    let text = text.to_lowercase();
    if !text.starts_with(SCHEME) || text.len() <= SCHEME.len() {
        return None;
    }

    let mut segments = text[SCHEME.len()..].split(';');
    let mut location = parse_coordinates(segments.next()?)?;
    for attribute in segments {
        location = apply_attribute(location, attribute);
    }
    Some(location)
}

/// Parse the comma separated latitude, longitude and optional altitude
fn parse_coordinates(text: &str) -> Option<Location> {
    let fields: Vec<&str> = text.split(',').collect();
    if fields.len() < 2 || fields.len() > 3 {
        return None;
    }

    let latitude = parse_real(fields[0])?;
    let longitude = parse_real(fields[1])?;
    let mut location = Location::new(latitude, longitude)
        .ok()?
        .with_provider(Provider::GeoUri);
    if let Some(altitude) = fields.get(2) {
        location = location.with_altitude(parse_real(altitude)?);
    }
    Some(location)
}

/// Apply a single `key=value` URI parameter, anything unusable is skipped
fn apply_attribute(location: Location, attribute: &str) -> Location {
    let (key, value) = match attribute.find('=') {
        Some(pos) => (&attribute[..pos], &attribute[pos + 1..]),
        None => return location,
    };

    match key {
        "u" => match parse_real(value) {
            Some(accuracy) if accuracy >= 0.0 => location.with_accuracy(accuracy as f32),
            _ => {
                trace!("ignoring invalid uncertainty value in geo URI: {}", value);
                location
            }
        },
        _ => {
            trace!("ignoring unsupported geo URI parameter: {}", attribute);
            location
        }
    }
}

/// Parse a finite real number, surrounding spaces are allowed
fn parse_real(text: &str) -> Option<f64> {
    f64::from_str(text.trim()).ok().filter(|v| v.is_finite())
}
