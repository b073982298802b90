//! RecordRoute aggregation
//!
//! A [`RouteRecorder`] collects points while the client stream is open and is
//! consumed by [`RouteRecorder::finish`] once it closes, so a summary can only
//! be produced once.

use crate::common::{geo, Result};
use crate::guide::store::FeatureStore;
use crate::proto::{Point, RouteSummary};
use std::time::Instant;

pub struct RouteRecorder<'a> {
    store: &'a FeatureStore,
    point_count: i32,
    feature_count: i32,
    /// Unrounded metres; rounded once in the summary
    distance: f64,
    previous: Option<Point>,
    started: Option<Instant>,
}

impl<'a> RouteRecorder<'a> {
    pub fn new(store: &'a FeatureStore) -> Self {
        Self {
            store,
            point_count: 0,
            feature_count: 0,
            distance: 0.0,
            previous: None,
            started: None,
        }
    }

    /// Record the next point of the route, received now.
    pub fn record(&mut self, point: Point) -> Result<()> {
        self.record_at(point, Instant::now())
    }

    /// Record the next point of the route, received at `at`.
    ///
    /// An out-of-range point is rejected and leaves the totals untouched.
    pub fn record_at(&mut self, point: Point, at: Instant) -> Result<()> {
        geo::validate_point(&point)?;

        self.point_count = self.point_count.saturating_add(1);
        if !self.store.get_feature(&point).name.is_empty() {
            self.feature_count = self.feature_count.saturating_add(1);
        }
        if let Some(previous) = &self.previous {
            self.distance += geo::distance(previous, &point);
        }
        self.previous = Some(point);
        if self.started.is_none() {
            self.started = Some(at);
        }
        Ok(())
    }

    pub fn point_count(&self) -> i32 {
        self.point_count
    }

    /// Summarize the route, treating now as the end of the stream.
    pub fn finish(self) -> RouteSummary {
        self.finish_at(Instant::now())
    }

    /// Summarize the route with the stream closed at `ended`.
    pub fn finish_at(self, ended: Instant) -> RouteSummary {
        let elapsed_time = match self.started {
            Some(started) if self.point_count > 1 => {
                i32::try_from(ended.saturating_duration_since(started).as_secs()).unwrap_or(i32::MAX)
            }
            _ => 0,
        };

        RouteSummary {
            point_count: self.point_count,
            feature_count: self.feature_count,
            distance: geo::metres(self.distance),
            elapsed_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::Feature;
    use std::time::Duration;

    fn pt(latitude: i32, longitude: i32) -> Point {
        Point {
            latitude,
            longitude,
        }
    }

    fn store() -> FeatureStore {
        FeatureStore::load(vec![
            Feature {
                name: "ten".into(),
                location: Some(pt(10, 10)),
            },
            Feature {
                name: "".into(),
                location: Some(pt(20, 20)),
            },
            Feature {
                name: "north".into(),
                location: Some(pt(10_000_000, 0)),
            },
        ])
    }

    #[test]
    fn test_empty_route() {
        let store = store();
        let summary = RouteRecorder::new(&store).finish();
        assert_eq!(summary, RouteSummary::default());
    }

    #[test]
    fn test_single_point_has_no_elapsed_time() {
        let store = store();
        let start = Instant::now();
        let mut recorder = RouteRecorder::new(&store);
        recorder.record_at(pt(10, 10), start).unwrap();

        let summary = recorder.finish_at(start + Duration::from_secs(30));
        assert_eq!(
            summary,
            RouteSummary {
                point_count: 1,
                feature_count: 1,
                distance: 0,
                elapsed_time: 0,
            }
        );
    }

    #[test]
    fn test_two_points() {
        let store = store();
        let start = Instant::now();
        let mut recorder = RouteRecorder::new(&store);
        recorder.record_at(pt(10, 10), start).unwrap();
        recorder
            .record_at(pt(20, 20), start + Duration::from_secs(1))
            .unwrap();

        let summary = recorder.finish_at(start + Duration::from_millis(2_500));
        assert_eq!(summary.point_count, 2);
        // Only (10, 10) carries a name
        assert_eq!(summary.feature_count, 1);
        assert_eq!(
            summary.distance,
            geo::metres(geo::distance(&pt(10, 10), &pt(20, 20)))
        );
        assert_eq!(summary.elapsed_time, 2);
    }

    #[test]
    fn test_distance_accumulates_before_rounding() {
        let store = store();
        let mut recorder = RouteRecorder::new(&store);
        let route = [pt(0, 0), pt(10_000_000, 0), pt(10_000_000, 10_000_000), pt(0, 0)];
        for p in route.iter().cloned() {
            recorder.record(p).unwrap();
        }

        let expected: f64 = route.windows(2).map(|w| geo::distance(&w[0], &w[1])).sum();
        let summary = recorder.finish();
        assert_eq!(summary.point_count, 4);
        assert_eq!(summary.feature_count, 1);
        assert_eq!(summary.distance, geo::metres(expected));
    }

    #[test]
    fn test_invalid_point_rejected() {
        let store = store();
        let mut recorder = RouteRecorder::new(&store);
        recorder.record(pt(10, 10)).unwrap();
        assert!(recorder.record(pt(0, 1_800_000_001)).is_err());
        assert_eq!(recorder.point_count(), 1);
    }
}
