use serde::{Deserialize, Serialize};

use crate::geometry::point::{Point, Size};
use crate::visit::VisitRecord;

pub const DEFAULT_LAT_PADDING: f64 = 0.008;
pub const DEFAULT_LON_PADDING: f64 = 0.012;
pub const DEFAULT_MARGIN: f32 = 30.0;
/// Spans at or below this are degenerate and project with a unit denominator.
pub const MIN_SPAN: f64 = 1e-9;

/// Bounding-box padding and surface margins used by the projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    pub lat_padding: f64,
    pub lon_padding: f64,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            lat_padding: DEFAULT_LAT_PADDING,
            lon_padding: DEFAULT_LON_PADDING,
            margin_x: DEFAULT_MARGIN,
            margin_y: DEFAULT_MARGIN,
        }
    }
}

/// Padded geographic bounding box of a set of visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Bounds of every finite `(lat, lon)` pair, padded on each side.
    /// Returns `None` when no finite coordinate is present.
    pub fn from_coordinates<I>(coordinates: I, lat_padding: f64, lon_padding: f64) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        coordinates
            .into_iter()
            .filter(|(lat, lon)| lat.is_finite() && lon.is_finite())
            .fold(None, |bounds: Option<GeoBounds>, (lat, lon)| {
                Some(match bounds {
                    None => GeoBounds {
                        min_lat: lat,
                        max_lat: lat,
                        min_lon: lon,
                        max_lon: lon,
                    },
                    Some(b) => GeoBounds {
                        min_lat: b.min_lat.min(lat),
                        max_lat: b.max_lat.max(lat),
                        min_lon: b.min_lon.min(lon),
                        max_lon: b.max_lon.max(lon),
                    },
                })
            })
            .map(|bounds| bounds.padded(lat_padding, lon_padding))
    }

    fn padded(self, lat_padding: f64, lon_padding: f64) -> Self {
        let lat_padding = sanitize_padding(lat_padding);
        let lon_padding = sanitize_padding(lon_padding);
        Self {
            min_lat: self.min_lat - lat_padding,
            max_lat: self.max_lat + lat_padding,
            min_lon: self.min_lon - lon_padding,
            max_lon: self.max_lon + lon_padding,
        }
    }

    /// Latitude extent used as the projection denominator.
    pub fn lat_span(&self) -> f64 {
        effective_span(self.max_lat - self.min_lat)
    }

    /// Longitude extent used as the projection denominator.
    pub fn lon_span(&self) -> f64 {
        effective_span(self.max_lon - self.min_lon)
    }
}

fn sanitize_padding(padding: f64) -> f64 {
    if padding.is_finite() {
        padding.abs()
    } else {
        0.0
    }
}

fn effective_span(span: f64) -> f64 {
    if span.is_finite() && span > MIN_SPAN {
        span
    } else {
        1.0
    }
}

/// Maps geographic coordinates onto a surface of a given logical size.
///
/// Higher latitudes land nearer the top. The projector is a pure value; the
/// renderer and the hit-tester each build one per call from the same inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    bounds: GeoBounds,
    size: Size,
    margin_x: f32,
    margin_y: f32,
}

impl Projector {
    pub fn new(visits: &[VisitRecord], size: Size, options: &ProjectionOptions) -> Option<Self> {
        let bounds = GeoBounds::from_coordinates(
            visits
                .iter()
                .map(|visit| (visit.latitude, visit.longitude)),
            options.lat_padding,
            options.lon_padding,
        )?;
        Some(Self::with_bounds(bounds, size, options))
    }

    pub fn with_bounds(bounds: GeoBounds, size: Size, options: &ProjectionOptions) -> Self {
        Self {
            bounds,
            size,
            margin_x: options.margin_x,
            margin_y: options.margin_y,
        }
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn size(&self) -> Size {
        self.size
    }

    fn drawable_width(&self) -> f64 {
        f64::from((self.size.width - 2.0 * self.margin_x).max(0.0))
    }

    fn drawable_height(&self) -> f64 {
        f64::from((self.size.height - 2.0 * self.margin_y).max(0.0))
    }

    pub fn project(&self, latitude: f64, longitude: f64) -> Point {
        let x = (longitude - self.bounds.min_lon) / self.bounds.lon_span() * self.drawable_width()
            + f64::from(self.margin_x);
        let y = (1.0 - (latitude - self.bounds.min_lat) / self.bounds.lat_span())
            * self.drawable_height()
            + f64::from(self.margin_y);
        Point::new(x as f32, y as f32)
    }

    /// Inverse of [`Projector::project`]. A collapsed drawable axis maps to the
    /// middle of the bounds.
    pub fn unproject(&self, point: Point) -> (f64, f64) {
        let width = self.drawable_width();
        let height = self.drawable_height();
        let longitude = if width > 0.0 {
            (f64::from(point.x) - f64::from(self.margin_x)) / width * self.bounds.lon_span()
                + self.bounds.min_lon
        } else {
            (self.bounds.min_lon + self.bounds.max_lon) / 2.0
        };
        let latitude = if height > 0.0 {
            (1.0 - (f64::from(point.y) - f64::from(self.margin_y)) / height)
                * self.bounds.lat_span()
                + self.bounds.min_lat
        } else {
            (self.bounds.min_lat + self.bounds.max_lat) / 2.0
        };
        (latitude, longitude)
    }

    /// Projected center of every visit with finite coordinates, keyed by its
    /// index in `visits`. Order follows the input.
    pub fn project_visits(&self, visits: &[VisitRecord]) -> Vec<(usize, Point)> {
        visits
            .iter()
            .enumerate()
            .filter(|(_, visit)| visit.has_finite_coordinates())
            .map(|(index, visit)| (index, self.project(visit.latitude, visit.longitude)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(id: i64, latitude: f64, longitude: f64) -> VisitRecord {
        VisitRecord::new(id, format!("visit {id}"), latitude, longitude)
    }

    fn seoul_visits() -> Vec<VisitRecord> {
        vec![
            visit(1, 37.5656, 126.9254),
            visit(2, 37.5347, 127.0023),
            visit(3, 37.5858, 126.9823),
        ]
    }

    #[test]
    fn projection_is_deterministic() {
        let visits = seoul_visits();
        let size = Size::new(360.0, 280.0);
        let first = Projector::new(&visits, size, &ProjectionOptions::default()).unwrap();
        let second = Projector::new(&visits, size, &ProjectionOptions::default()).unwrap();
        assert_eq!(first.project_visits(&visits), second.project_visits(&visits));
    }

    #[test]
    fn higher_latitude_projects_nearer_the_top() {
        let visits = seoul_visits();
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let north = projector.project(37.5858, 126.9823);
        let south = projector.project(37.5347, 127.0023);
        assert!(north.y < south.y);
        assert!(south.x > north.x);
    }

    #[test]
    fn padded_extremes_stay_inside_margins() {
        let visits = seoul_visits();
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        for (_, point) in projector.project_visits(&visits) {
            assert!(point.x > DEFAULT_MARGIN && point.x < 360.0 - DEFAULT_MARGIN);
            assert!(point.y > DEFAULT_MARGIN && point.y < 280.0 - DEFAULT_MARGIN);
        }
    }

    #[test]
    fn identical_latitudes_project_to_finite_interior_points() {
        let visits = vec![visit(1, 37.55, 126.92), visit(2, 37.55, 127.00)];
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let points = projector.project_visits(&visits);
        assert_eq!(points.len(), 2);
        for (_, point) in points {
            assert!(point.is_finite());
            assert!(point.x > 0.0 && point.x < 360.0);
            assert!(point.y > 0.0 && point.y < 280.0);
        }
    }

    #[test]
    fn identical_longitudes_project_to_finite_interior_points() {
        let visits = vec![visit(1, 37.54, 126.98), visit(2, 37.58, 126.98)];
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let points = projector.project_visits(&visits);
        assert_eq!(points.len(), 2);
        for (_, point) in &points {
            assert!(point.is_finite());
            assert!(point.x > 0.0 && point.x < 360.0);
            assert!(point.y > 0.0 && point.y < 280.0);
        }
        assert_eq!(points[0].1.x, points[1].1.x);
        assert!(points[1].1.y < points[0].1.y);
    }

    #[test]
    fn zero_span_without_padding_does_not_divide_by_zero() {
        let visits = vec![visit(1, 37.55, 126.92), visit(2, 37.55, 126.92)];
        let options = ProjectionOptions {
            lat_padding: 0.0,
            lon_padding: 0.0,
            ..Default::default()
        };
        let projector = Projector::new(&visits, Size::new(360.0, 280.0), &options).unwrap();
        let point = projector.project(37.55, 126.92);
        assert!(point.is_finite());
        assert_eq!(point, Point::new(DEFAULT_MARGIN, 280.0 - DEFAULT_MARGIN));
    }

    #[test]
    fn empty_input_has_no_projector() {
        assert!(Projector::new(&[], Size::new(100.0, 100.0), &ProjectionOptions::default())
            .is_none());
    }

    #[test]
    fn non_finite_coordinates_are_skipped() {
        let visits = vec![visit(1, f64::NAN, 126.92), visit(2, 37.55, 127.0)];
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let points = projector.project_visits(&visits);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].0, 1);
        assert!(points[0].1.is_finite());
    }

    #[test]
    fn unproject_inverts_project() {
        let visits = seoul_visits();
        let projector =
            Projector::new(&visits, Size::new(360.0, 280.0), &ProjectionOptions::default())
                .unwrap();
        let point = projector.project(37.5656, 126.9254);
        let (lat, lon) = projector.unproject(point);
        assert!((lat - 37.5656).abs() < 1e-4);
        assert!((lon - 126.9254).abs() < 1e-4);
    }

    #[test]
    fn tiny_surface_collapses_onto_the_margin() {
        let visits = seoul_visits();
        let projector =
            Projector::new(&visits, Size::new(40.0, 40.0), &ProjectionOptions::default())
                .unwrap();
        let point = projector.project(37.5656, 126.9254);
        assert_eq!(point, Point::new(DEFAULT_MARGIN, DEFAULT_MARGIN));
    }
}
