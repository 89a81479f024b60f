use wayline_core::geopoint::GeoPoint;

/// Axis-aligned box around a set of points, for fit-bounds calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl Bounds {
    pub fn containing(points: impl IntoIterator<Item = GeoPoint>) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;

        for point in points {
            bounds = Some(match bounds {
                None => Bounds {
                    south_west: point,
                    north_east: point,
                },
                Some(current) => Bounds {
                    south_west: GeoPoint::new(
                        current.south_west.lat.min(point.lat),
                        current.south_west.lng.min(point.lng),
                    ),
                    north_east: GeoPoint::new(
                        current.north_east.lat.max(point.lat),
                        current.north_east.lng.max(point.lng),
                    ),
                },
            });
        }

        bounds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
}

/// The on-screen map the session renders into. The engine only relies on
/// this primitive set and is agnostic to the concrete map library behind it.
pub trait MapSurface {
    fn clear(&mut self);
    fn add_marker(&mut self, position: GeoPoint, label: &str, popup: Option<&str>);
    fn draw_route_line(&mut self, geometry: &[GeoPoint], style: &RouteStyle);
    fn fit_bounds(&mut self, bounds: &Bounds);
}
