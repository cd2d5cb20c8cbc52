//! Keep compass needles pointed at targets as orientation and location updates arrive
//!
//! All state changes happen in the sensor and location callbacks, which the host delivers one
//! at a time. Renderers only read the latest state.
use crate::color::Color;
use crate::gps::Location;
use log::trace;
use nalgebra::Vector3;

pub mod orientation;

/// Rotation changes smaller than this (degrees) are ignored
const DEAD_BAND: f32 = 0.001;
/// Changes larger than this (degrees) are damped
const DAMPING_THRESHOLD: f32 = 1.0;
/// Fraction of a large change applied per sample
const DAMPING_FACTOR: f32 = 0.2;

/// A location to point at and the color its needle is drawn in
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    location: Location,
    color: Color,
}

impl Target {
    pub fn new(location: Location, color: Color) -> Self {
        Target { location, color }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// A target with the needle state derived from sensor and location updates
#[derive(Clone, Debug)]
pub struct TrackedTarget {
    target: Target,
    /// smoothed needle rotation in degrees (-180..180)
    rotation: f32,
    /// bearing from the current location in degrees (0..360)
    bearing: f32,
    /// distance from the current location in meters
    distance: f32,
}

impl TrackedTarget {
    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn bearing(&self) -> f32 {
        self.bearing
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Kind of sensor that produced a sample
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorKind {
    Accelerometer,
    MagneticField,
    Other,
}

/// Accuracy reported alongside a sensor sample
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SensorAccuracy {
    Unreliable,
    Low,
    Medium,
    High,
}

/// A raw 3 axis reading in device coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub accuracy: SensorAccuracy,
    pub values: [f32; 3],
}

impl SensorSample {
    pub fn new(kind: SensorKind, accuracy: SensorAccuracy, values: [f32; 3]) -> Self {
        SensorSample {
            kind,
            accuracy,
            values,
        }
    }
}

/// Computes smoothed needle rotations for an ordered list of targets
#[derive(Debug)]
pub struct CompassEngine {
    targets: Vec<TrackedTarget>,
    gravity: Option<Vector3<f32>>,
    geomagnetic: Option<Vector3<f32>>,
    heading: Option<f32>,
    location_known: bool,
}

impl CompassEngine {
    pub fn new(targets: Vec<Target>) -> Self {
        CompassEngine {
            targets: targets
                .into_iter()
                .map(|target| TrackedTarget {
                    target,
                    rotation: 0.0,
                    bearing: 0.0,
                    distance: 0.0,
                })
                .collect(),
            gravity: None,
            geomagnetic: None,
            heading: None,
            location_known: false,
        }
    }

    /// Targets in display order
    pub fn targets(&self) -> &[TrackedTarget] {
        &self.targets
    }

    /// Whether a current location fix has been applied
    pub fn location_known(&self) -> bool {
        self.location_known
    }

    /// Last heading derived from the sensors, in degrees (0..360)
    pub fn heading(&self) -> Option<f32> {
        self.heading
    }

    /// Recompute bearings and distances to every target from a new fix
    pub fn set_current_location(&mut self, fix: &Location) {
        for tracked in self.targets.iter_mut() {
            let target = tracked.target.location();
            tracked.bearing = fix.bearing_to(target) as f32;
            tracked.distance = fix.distance_to(target) as f32;
        }
        self.location_known = true;
        trace!("current location updated to {}", fix);
    }

    /// Handle an orientation sample, returns true if the needles need to be redrawn
    pub fn on_sensor_sample(&mut self, sample: &SensorSample) -> bool {
        if sample.accuracy == SensorAccuracy::Unreliable {
            return false;
        }
        if !sample.values.iter().all(|v| v.is_finite()) {
            trace!("discarding non finite {:?} sample", sample.kind);
            return false;
        }

        let values = Vector3::from(sample.values);
        match sample.kind {
            SensorKind::Accelerometer => self.gravity = Some(values),
            SensorKind::MagneticField => self.geomagnetic = Some(values),
            SensorKind::Other => return false,
        }

        let (gravity, geomagnetic) = match (&self.gravity, &self.geomagnetic) {
            (Some(g), Some(m)) => (g, m),
            _ => return false,
        };
        let rotation = match orientation::rotation_matrix(gravity, geomagnetic) {
            Some(r) => r,
            None => return false,
        };

        self.apply_heading(orientation::heading(&rotation))
    }

    /// Move each needle towards its target for the given heading
    ///
    /// Returns true if any needle rotation changed.
    pub fn apply_heading(&mut self, heading: f32) -> bool {
        if !heading.is_finite() {
            return false;
        }
        self.heading = Some(heading);

        let mut changed = false;
        for tracked in self.targets.iter_mut() {
            let mut diff = wrap_degrees(tracked.bearing - heading - tracked.rotation);
            if diff.abs() < DEAD_BAND {
                continue;
            }
            if diff.abs() > DAMPING_THRESHOLD {
                diff *= DAMPING_FACTOR;
            }
            tracked.rotation = wrap_degrees(tracked.rotation + diff);
            changed = true;
        }
        changed
    }
}

/// Wrap an angle in degrees into (-180, 180]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}
