//! Collect a current location fix from the GPS and network providers with a timeout
use crate::gps::{Location, Provider};
use crate::Error;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};

/// GPS fixes are accepted as final once they are at least this accurate (meters)
const GPS_ACCURACY_TARGET: f32 = 50.0;

/// Progress of a fix request
#[derive(Clone, Debug, PartialEq)]
pub enum FixStatus {
    /// still waiting on at least one provider
    Pending,
    /// finished, with the best fix received (if any)
    Complete(Option<Location>),
}

/// Tracks fixes from the enabled providers until each one is satisfied or time runs out
#[derive(Debug)]
pub struct FixCollector {
    best: Option<Location>,
    waiting_for_gps: bool,
    waiting_for_network: bool,
    deadline: DateTime<Utc>,
    finished: bool,
}

impl FixCollector {
    /// Start waiting on the enabled providers, fails if neither is enabled
    pub fn start(
        gps_enabled: bool,
        network_enabled: bool,
        now: DateTime<Utc>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if !gps_enabled && !network_enabled {
            return Err(Error::NoLocationProvider);
        }
        debug!(
            "requesting location (gps: {}, network: {}, timeout: {}ms)",
            gps_enabled,
            network_enabled,
            timeout.num_milliseconds()
        );
        Ok(FixCollector {
            best: None,
            waiting_for_gps: gps_enabled,
            waiting_for_network: network_enabled,
            deadline: now + timeout,
            finished: false,
        })
    }

    /// Best fix seen so far
    pub fn best(&self) -> Option<&Location> {
        self.best.as_ref()
    }

    /// Feed a fix from one of the providers
    pub fn on_location(&mut self, fix: Location) -> FixStatus {
        if self.finished {
            return self.status();
        }

        match fix.provider() {
            Provider::Network => self.waiting_for_network = false,
            Provider::Gps => {
                if fix.accuracy().map_or(false, |a| a < GPS_ACCURACY_TARGET) {
                    self.waiting_for_gps = false;
                }
            }
            _ => {}
        }

        let replace = match &self.best {
            None => true,
            Some(best) => match (best.accuracy(), fix.accuracy()) {
                (None, _) => true,
                (Some(best), Some(new)) => new < best,
                (Some(_), None) => false,
            },
        };
        if replace {
            self.best = Some(fix);
        }

        if !self.waiting_for_gps && !self.waiting_for_network {
            self.finished = true;
            info!("location request satisfied");
        }
        self.status()
    }

    /// Check the timeout, completing with whatever fix is available once it has passed
    pub fn poll(&mut self, now: DateTime<Utc>) -> FixStatus {
        if !self.finished && now >= self.deadline {
            self.finished = true;
            info!("location request timed out, using best available fix");
        }
        self.status()
    }

    fn status(&self) -> FixStatus {
        if self.finished {
            FixStatus::Complete(self.best.clone())
        } else {
            FixStatus::Pending
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.ymd(2010, 7, 1).and_hms(9, 30, 0)
    }

    fn fix(provider: Provider, accuracy: Option<f32>) -> Location {
        let loc = Location::new(-37.8, 144.9).unwrap().with_provider(provider);
        match accuracy {
            Some(a) => loc.with_accuracy(a),
            None => loc,
        }
    }

    #[test]
    fn test_requires_a_provider() {
        assert!(FixCollector::start(false, false, now(), Duration::seconds(30)).is_err());
    }

    #[test]
    fn test_network_only_completes_on_first_fix() {
        let mut collector = FixCollector::start(false, true, now(), Duration::seconds(30)).unwrap();
        let status = collector.on_location(fix(Provider::Network, Some(800.0)));
        assert_eq!(status, FixStatus::Complete(Some(fix(Provider::Network, Some(800.0)))));
    }

    #[test]
    fn test_waits_for_accurate_gps() {
        let mut collector = FixCollector::start(true, true, now(), Duration::seconds(30)).unwrap();
        assert_eq!(collector.on_location(fix(Provider::Network, Some(500.0))), FixStatus::Pending);
        assert_eq!(collector.on_location(fix(Provider::Gps, Some(80.0))), FixStatus::Pending);
        assert_eq!(collector.best().unwrap().accuracy(), Some(80.0));

        // a less accurate fix does not replace the best one
        collector.on_location(fix(Provider::Network, Some(300.0)));
        assert_eq!(collector.best().unwrap().accuracy(), Some(80.0));

        let status = collector.on_location(fix(Provider::Gps, Some(12.0)));
        assert_eq!(status, FixStatus::Complete(Some(fix(Provider::Gps, Some(12.0)))));
    }

    #[test]
    fn test_fix_without_accuracy_is_replaced() {
        let mut collector = FixCollector::start(true, false, now(), Duration::seconds(30)).unwrap();
        collector.on_location(fix(Provider::Gps, None));
        collector.on_location(fix(Provider::Gps, Some(120.0)));
        assert_eq!(collector.best().unwrap().accuracy(), Some(120.0));
        collector.on_location(fix(Provider::Gps, None));
        assert_eq!(collector.best().unwrap().accuracy(), Some(120.0));
    }

    #[test]
    fn test_timeout_uses_partial_result() {
        let mut collector = FixCollector::start(true, false, now(), Duration::seconds(30)).unwrap();
        assert_eq!(collector.poll(now() + Duration::seconds(10)), FixStatus::Pending);
        collector.on_location(fix(Provider::Gps, Some(90.0)));
        let status = collector.poll(now() + Duration::seconds(30));
        assert_eq!(status, FixStatus::Complete(Some(fix(Provider::Gps, Some(90.0)))));

        let mut collector = FixCollector::start(true, true, now(), Duration::seconds(5)).unwrap();
        assert_eq!(collector.poll(now() + Duration::seconds(6)), FixStatus::Complete(None));
    }
}
