use serde::Deserialize;
use thiserror::Error;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair. Construction does not validate ranges;
/// callers check [`Coordinate::in_range`] before doing anything with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn in_range(self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle (haversine) distance between two coordinates, in kilometres.
///
/// Symmetric, non-negative, and zero for identical coordinates. Both grid
/// indexes rank candidates with this same metric.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// A static reference location from one of the bundled grid datasets.
#[derive(Debug, Clone, Deserialize)]
pub struct GridPoint {
    #[serde(alias = "grid")]
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl GridPoint {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// A grid point ranked against one query. Lives only for the duration of a
/// single lookup; the shared [`GridIndex`] collection is never written to.
#[derive(Debug, Clone, Copy)]
pub struct Nearest<'a> {
    pub point: &'a GridPoint,
    pub distance_km: f64,
}

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dataset contains no points")]
    Empty,

    #[error("grid dataset is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// An immutable collection of reference grid points with nearest-point
/// lookup. Loaded once at service construction and shared read-only across
/// concurrent calls.
#[derive(Debug)]
pub struct GridIndex {
    points: Vec<GridPoint>,
    coverage_km: f64,
}

impl GridIndex {
    /// An empty dataset is a configuration error, not a runtime input error.
    pub fn new(points: Vec<GridPoint>, coverage_km: f64) -> Result<Self, GridError> {
        if points.is_empty() {
            return Err(GridError::Empty);
        }
        Ok(Self { points, coverage_km })
    }

    pub fn from_json(json: &str, coverage_km: f64) -> Result<Self, GridError> {
        let points: Vec<GridPoint> = serde_json::from_str(json)?;
        Self::new(points, coverage_km)
    }

    /// Maximum distance at which a query is still considered covered.
    pub fn coverage_km(&self) -> f64 {
        self.coverage_km
    }

    /// Linear scan keeping the running minimum. The strict comparison keeps
    /// the earliest-loaded point when two candidates are equidistant.
    pub fn nearest(&self, query: Coordinate) -> Nearest<'_> {
        let mut best = Nearest {
            point: &self.points[0],
            distance_km: distance_km(query, self.points[0].coordinate()),
        };

        for point in &self.points[1..] {
            let d = distance_km(query, point.coordinate());
            if d < best.distance_km {
                best = Nearest { point, distance_km: d };
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, lat: f64, lng: f64) -> GridPoint {
        GridPoint {
            id: id.to_string(),
            name: id.to_string(),
            lat,
            lng,
        }
    }

    #[test]
    fn distance_is_zero_for_identical_coordinates() {
        let a = Coordinate::new(22.3, 114.2);
        assert_eq!(distance_km(a, a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(22.2828, 114.1588);
        let b = Coordinate::new(22.4501, 114.1694);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn distance_matches_known_reference() {
        // Central to Tai Po is roughly 18.6 km.
        let central = Coordinate::new(22.2828, 114.1588);
        let tai_po = Coordinate::new(22.4501, 114.1694);
        let d = distance_km(central, tai_po);
        assert!(d > 18.0 && d < 19.5, "unexpected distance {d}");
    }

    #[test]
    fn nearest_picks_the_closest_point() {
        let index = GridIndex::new(
            vec![
                point("far", 22.5, 114.3),
                point("near", 22.3, 114.2),
                point("mid", 22.4, 114.25),
            ],
            10.0,
        )
        .unwrap();

        let hit = index.nearest(Coordinate::new(22.31, 114.21));
        assert_eq!(hit.point.id, "near");
    }

    #[test]
    fn nearest_is_deterministic() {
        let index = GridIndex::new(
            vec![point("a", 22.3, 114.2), point("b", 22.4, 114.1)],
            10.0,
        )
        .unwrap();

        let query = Coordinate::new(22.33, 114.18);
        let first = index.nearest(query).point.id.clone();
        for _ in 0..10 {
            assert_eq!(index.nearest(query).point.id, first);
        }
    }

    #[test]
    fn tie_break_prefers_earliest_loaded_point() {
        // Two points sharing the same coordinates are exactly equidistant
        // from any query; geometric mirror pairs are not, once rounded to
        // f64. A farther point is loaded first so the scan has to pass it.
        let index = GridIndex::new(
            vec![
                point("far", 22.5, 114.3),
                point("first", 22.3, 114.2),
                point("second", 22.3, 114.2),
            ],
            10.0,
        )
        .unwrap();

        let hit = index.nearest(Coordinate::new(22.31, 114.21));
        assert_eq!(hit.point.id, "first");
    }

    #[test]
    fn empty_dataset_is_a_construction_error() {
        let err = GridIndex::new(vec![], 10.0).unwrap_err();
        assert!(matches!(err, GridError::Empty));
    }

    #[test]
    fn malformed_dataset_is_a_construction_error() {
        let err = GridIndex::from_json("not json", 10.0).unwrap_err();
        assert!(matches!(err, GridError::Malformed(_)));
    }

    #[test]
    fn coordinate_range_check() {
        assert!(Coordinate::new(22.3, 114.2).in_range());
        assert!(Coordinate::new(-90.0, 180.0).in_range());
        assert!(!Coordinate::new(90.5, 114.2).in_range());
        assert!(!Coordinate::new(22.3, -180.5).in_range());
    }
}
