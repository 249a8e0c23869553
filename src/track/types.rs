// Core data types for parsed GPS tracks

use itertools::Itertools;

use crate::errors::GpxSplitError;

/// Mean earth radius used for haversine distances, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A single recorded position along a track
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: Option<f64>,
    /// RFC 3339 timestamp, when the file records one
    pub time: Option<String>,
}

impl TrackPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// Great-circle distance to `other` in meters
    pub fn distance_to(&self, other: &TrackPoint) -> f64 {
        haversine_distance(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}

/// Ordered sequence of points parsed from a GPX file.
///
/// A `Track` is created once from the raw file contents and never mutated
/// afterwards; screens share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    pub name: Option<String>,
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(name: Option<String>, points: Vec<TrackPoint>) -> Self {
        Self { name, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Distance from the first point to every point, in meters.
    ///
    /// The result has one entry per point and starts at `0.0`.
    pub fn cumulative_distances_m(&self) -> Vec<f64> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let mut distances = Vec::with_capacity(self.points.len());
        distances.push(0.0);
        let mut total = 0.0;
        for (prev, cur) in self.points.iter().tuple_windows() {
            total += prev.distance_to(cur);
            distances.push(total);
        }
        distances
    }

    pub fn total_distance_m(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(prev, cur)| prev.distance_to(cur))
            .sum()
    }

    /// Project the points onto a plane where one unit on both axes covers the
    /// same ground distance.
    ///
    /// Uses an equirectangular projection: longitudes are scaled by the
    /// cosine of the track's mean latitude. Returns `[x, y]` pairs in the
    /// order of the track points.
    pub fn projected_points(&self) -> Vec<[f64; 2]> {
        if self.points.is_empty() {
            return Vec::new();
        }
        let mean_lat =
            self.points.iter().map(|p| p.latitude).sum::<f64>() / self.points.len() as f64;
        let x_scale = mean_lat.to_radians().cos();
        self.points
            .iter()
            .map(|p| [p.longitude * x_scale, p.latitude])
            .collect()
    }

    /// Split the track into two segments at `index`.
    ///
    /// The point at `index` ends the first segment and starts the second one.
    pub fn split_at(&self, index: usize) -> Result<(Track, Track), GpxSplitError> {
        if index >= self.points.len() {
            return Err(GpxSplitError::InvalidSplitIndex {
                index,
                len: self.points.len(),
            });
        }
        let first = Track::new(self.name.clone(), self.points[..=index].to_vec());
        let second = Track::new(self.name.clone(), self.points[index..].to_vec());
        Ok((first, second))
    }
}

pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().asin()
}
