use gpx::{Gpx, Waypoint};
use log::{debug, info};

use super::types::{Track, TrackPoint};
use crate::errors::GpxSplitError;

/// Parse the raw contents of a GPX file into a [`Track`].
///
/// Points of every track segment are concatenated in document order. Files
/// that carry no track points fall back to their route points, and a file
/// without either is rejected.
pub fn parse_gpx(raw: &str) -> Result<Track, GpxSplitError> {
    let gpx = gpx::read(raw.as_bytes()).map_err(|e| GpxSplitError::GpxParse {
        reason: e.to_string(),
    })?;

    let name = track_name(&gpx);
    let mut points: Vec<TrackPoint> = gpx
        .tracks
        .iter()
        .flat_map(|track| track.segments.iter())
        .flat_map(|segment| segment.points.iter())
        .map(to_track_point)
        .collect();

    if points.is_empty() {
        debug!("No track points found, falling back to route points");
        points = gpx
            .routes
            .iter()
            .flat_map(|route| route.points.iter())
            .map(to_track_point)
            .collect();
    }

    if points.is_empty() {
        return Err(GpxSplitError::EmptyTrack);
    }

    info!(
        "Parsed GPX track {:?} with {} points",
        name.as_deref().unwrap_or("<unnamed>"),
        points.len()
    );
    Ok(Track::new(name, points))
}

fn track_name(gpx: &Gpx) -> Option<String> {
    gpx.tracks
        .iter()
        .find_map(|t| t.name.clone())
        .or_else(|| gpx.routes.iter().find_map(|r| r.name.clone()))
        .or_else(|| gpx.metadata.as_ref().and_then(|m| m.name.clone()))
}

fn to_track_point(waypoint: &Waypoint) -> TrackPoint {
    let point = waypoint.point();
    TrackPoint {
        latitude: point.y(),
        longitude: point.x(),
        elevation: waypoint.elevation,
        time: waypoint.time.as_ref().and_then(|t| t.format().ok()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpxsplit-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <name>Morning Ride</name>
    <trkseg>
      <trkpt lat="45.0700" lon="7.6800"><ele>240.0</ele><time>2024-05-01T07:00:00Z</time></trkpt>
      <trkpt lat="45.0710" lon="7.6810"><ele>242.5</ele><time>2024-05-01T07:00:10Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="45.0720" lon="7.6820"><ele>245.0</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    const ROUTE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpxsplit-tests" xmlns="http://www.topografix.com/GPX/1/1">
  <rte>
    <name>Planned Loop</name>
    <rtept lat="46.0" lon="8.0"></rtept>
    <rtept lat="46.1" lon="8.1"></rtept>
  </rte>
</gpx>"#;

    const EMPTY_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="gpxsplit-tests" xmlns="http://www.topografix.com/GPX/1/1">
</gpx>"#;

    #[test]
    fn test_parse_track_segments_in_order() {
        let track = parse_gpx(TRACK_GPX).unwrap();
        assert_eq!(track.name.as_deref(), Some("Morning Ride"));
        assert_eq!(track.len(), 3);
        assert!((track.points[0].latitude - 45.07).abs() < 1e-9);
        assert!((track.points[0].longitude - 7.68).abs() < 1e-9);
        assert_eq!(track.points[1].elevation, Some(242.5));
        assert!((track.points[2].latitude - 45.072).abs() < 1e-9);
    }

    #[test]
    fn test_parse_keeps_timestamps() {
        let track = parse_gpx(TRACK_GPX).unwrap();
        let time = track.points[0].time.as_deref().unwrap();
        assert!(time.starts_with("2024-05-01T07:00:00"), "got {}", time);
        assert!(track.points[2].time.is_none());
    }

    #[test]
    fn test_parse_falls_back_to_routes() {
        let track = parse_gpx(ROUTE_GPX).unwrap();
        assert_eq!(track.name.as_deref(), Some("Planned Loop"));
        assert_eq!(track.len(), 2);
    }

    #[test]
    fn test_parse_empty_file_is_rejected() {
        match parse_gpx(EMPTY_GPX) {
            Err(GpxSplitError::EmptyTrack) => {}
            other => panic!("Expected EmptyTrack error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_garbage_reports_reason() {
        let err = parse_gpx("this is not xml").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}
